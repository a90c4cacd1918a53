//! Error types for user-registry

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid user id: {0}")]
    InvalidId(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation timed out after {0} ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Error::Unavailable(msg.into())
    }

    /// True when the store could not be reached at all, as opposed to
    /// rejecting the operation.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable(_) | Error::Timeout(_))
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                Error::Unavailable(err.to_string())
            }
            _ => Error::Storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_covers_timeouts() {
        assert!(Error::Timeout(5).is_unavailable());
        assert!(Error::unavailable("no server").is_unavailable());
        assert!(!Error::storage("duplicate key").is_unavailable());
        assert!(!Error::UserNotFound("abc".into()).is_unavailable());
    }

    #[test]
    fn timeout_message_names_the_budget() {
        assert_eq!(
            Error::Timeout(250).to_string(),
            "Store operation timed out after 250 ms"
        );
    }
}
