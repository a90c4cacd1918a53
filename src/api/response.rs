//! JSON envelopes shared by every user route

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::types::User;
use crate::Error;

pub const SUCCESS: &str = "success";
pub const FAILED: &str = "failed";

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub status: &'static str,
    pub users: Vec<User>,
}

impl UsersResponse {
    pub fn success(users: Vec<User>) -> Self {
        Self {
            status: SUCCESS,
            users,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    pub user: User,
}

impl UserResponse {
    pub fn success(user: User) -> Self {
        Self {
            status: SUCCESS,
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn success(message: &'static str) -> Self {
        Self {
            status: SUCCESS,
            message,
        }
    }

    pub fn failed(message: &'static str) -> Self {
        Self {
            status: FAILED,
            message,
        }
    }
}

/// Failure rendered as `{"status":"failed","message":...}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    /// Map a store failure to the route's designated status and message.
    /// An unreachable or slow store overrides both, since the request itself
    /// was fine.
    pub fn store(err: Error, status: StatusCode, message: &'static str) -> Self {
        match err {
            Error::Unavailable(ref reason) => {
                tracing::error!(%reason, "Store unavailable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
            }
            Error::Timeout(budget_ms) => {
                tracing::error!(budget_ms, "Store timed out");
                Self::new(StatusCode::GATEWAY_TIMEOUT, "Store request timed out")
            }
            other => {
                tracing::warn!(error = %other, %status, reply = message, "Store operation failed");
                Self::new(status, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageResponse::failed(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_route_status() {
        let err = ApiError::store(
            Error::storage("write rejected"),
            StatusCode::BAD_REQUEST,
            "Error in the user insertion",
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Error in the user insertion");
    }

    #[test]
    fn unreachable_store_is_503() {
        let err = ApiError::store(
            Error::unavailable("server selection timeout"),
            StatusCode::NOT_FOUND,
            "Users are not exist",
        );
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::store(Error::Timeout(10), StatusCode::BAD_REQUEST, "x");
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn envelope_shape() {
        let value = serde_json::to_value(MessageResponse::failed("Invalid ID")).unwrap();
        assert_eq!(value, serde_json::json!({"status": "failed", "message": "Invalid ID"}));
    }
}
