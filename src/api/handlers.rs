//! API handlers
//!
//! Each user route validates its input, makes its store call(s) through the
//! gateway and maps the outcome onto a JSON envelope.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::api::response::{ApiError, MessageResponse, UserResponse, UsersResponse};
use crate::api::AppState;
use crate::types::{from_json_object, now, parse_user_id, NewUser, User, UserPatch};
use crate::Error;

const INVALID_ID: &str = "Invalid ID";
const INVALID_BODY: &str = "Invalid request body";
const USER_NOT_FOUND: &str = "User not found";

/// Health check with store status
pub async fn health(State(state): State<AppState>) -> Response {
    let backend = state.gateway.backend_name();

    match state.gateway.ping().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            backend,
            message: None,
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, backend, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    version: env!("CARGO_PKG_VERSION"),
                    backend,
                    message: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// List users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state
        .gateway
        .list_users()
        .await
        .map_err(|e| ApiError::store(e, StatusCode::NOT_FOUND, "Users are not exist"))?;

    Ok(Json(UsersResponse::success(users)))
}

/// Create a user; the server assigns the id and both timestamps
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let input: NewUser = decode_body(payload)?;

    let user = User::create(input, now());

    state.gateway.insert_user(&user).await.map_err(|e| {
        ApiError::store(e, StatusCode::BAD_REQUEST, "Error in the user insertion")
    })?;

    tracing::info!(id = %user.id, "User created");
    Ok(Json(UserResponse::success(user)))
}

/// Fetch one user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&id).map_err(|_| ApiError::new(StatusCode::NOT_FOUND, INVALID_ID))?;

    let user = state
        .gateway
        .get_user(&id)
        .await
        .map_err(|e| ApiError::store(e, StatusCode::NOT_FOUND, USER_NOT_FOUND))?;

    Ok(Json(UserResponse::success(user)))
}

/// Overlay the body onto an existing user and store the result
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&id).map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, INVALID_ID))?;
    let patch: UserPatch = decode_body(payload)?;

    let mut user = state.gateway.get_user(&id).await.map_err(|e| match e {
        Error::UserNotFound(_) => ApiError::new(StatusCode::BAD_REQUEST, USER_NOT_FOUND),
        other => ApiError::store(other, StatusCode::BAD_REQUEST, USER_NOT_FOUND),
    })?;

    if patch.is_empty() {
        tracing::debug!(%id, "Empty update body; refreshing updated_at only");
    }

    user.apply(patch);
    user.touch(now());

    state.gateway.replace_user(&user).await.map_err(|e| {
        ApiError::store(e, StatusCode::BAD_REQUEST, "Error in the user updation")
    })?;

    Ok(Json(UserResponse::success(user)))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_user_id(&id).map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, INVALID_ID))?;

    state.gateway.delete_user(&id).await.map_err(|e| {
        ApiError::store(e, StatusCode::BAD_REQUEST, "Error in the user deletion")
    })?;

    tracing::info!(%id, "User deleted");
    Ok(Json(MessageResponse::success("User deleted successfully")))
}

/// Bare 404 for any unmatched path or method
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn decode_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        ApiError::new(StatusCode::BAD_REQUEST, INVALID_BODY)
    })?;

    from_json_object(value).map_err(|err| {
        tracing::debug!(error = %err, "Rejected request body");
        ApiError::new(StatusCode::BAD_REQUEST, INVALID_BODY)
    })
}
