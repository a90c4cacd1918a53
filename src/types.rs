//! Core types for user-registry

use bson::oid::ObjectId;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// User ID type
pub type UserId = ObjectId;

/// Parse a user id from its 24-character hex form.
pub fn parse_user_id(raw: &str) -> Result<UserId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| Error::InvalidId(raw.to_string()))
}

/// Current time at the store's resolution (milliseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Decode a request body that must be a JSON object. Arrays and scalars are
/// rejected even when the target type could be filled from them.
pub fn from_json_object<T: DeserializeOwned>(value: Value) -> Result<T> {
    if !value.is_object() {
        return Err(Error::InvalidRequest(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A user record as exposed over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(with = "hex_id")]
    pub id: UserId,
    pub name: String,
    pub address: String,
    pub age: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record with a server-assigned id.
    pub fn create(input: NewUser, at: DateTime<Utc>) -> Self {
        let at = at.trunc_subsecs(3);
        Self {
            id: ObjectId::new(),
            name: input.name,
            address: input.address,
            age: input.age,
            created_at: at,
            updated_at: at,
        }
    }

    /// Overlay the fields present in `patch`.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
    }

    /// Refresh `updated_at`. Always moves forward by at least one millisecond.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        let at = at.trunc_subsecs(3);
        let floor = self.updated_at + Duration::milliseconds(1);
        self.updated_at = at.max(floor);
    }
}

/// Body of `POST /api/users`. Missing fields take their zero value; `id` and
/// timestamps are ignored if a client sends them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
    pub address: String,
    pub age: i64,
}

/// Body of `PUT /api/users/:id`. Omitted or null fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub age: Option<i64>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.age.is_none()
    }
}

mod hex_id {
    use bson::oid::ObjectId;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::parse_str(&raw).map_err(de::Error::custom)
    }
}
