use thiserror::Error;
use tonic::Status;

use crate::notifier::NotifyError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Event notification failed: {0}")]
    Notification(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Errors the caller cannot fix by changing the request
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            UserError::PasswordHash(_)
                | UserError::Database(_)
                | UserError::Notification(_)
                | UserError::Serialization(_)
        )
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for UserError {
    fn from(err: serde_json::Error) -> Self {
        UserError::Serialization(err.to_string())
    }
}

impl From<NotifyError> for UserError {
    fn from(err: NotifyError) -> Self {
        UserError::Notification(err.to_string())
    }
}

impl From<validator::ValidationErrors> for UserError {
    fn from(err: validator::ValidationErrors) -> Self {
        UserError::InvalidArgument(err.to_string())
    }
}

impl From<UserError> for Status {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::NotFound(_) => Status::not_found(err.to_string()),
            UserError::InvalidArgument(_) => Status::invalid_argument(err.to_string()),
            UserError::Timeout(_) => Status::deadline_exceeded(err.to_string()),
            UserError::PasswordHash(_)
            | UserError::Database(_)
            | UserError::Notification(_)
            | UserError::Serialization(_) => {
                tracing::error!(error = %err, "Internal error");
                Status::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_status_codes() {
        let cases = [
            (UserError::NotFound("42".into()), Code::NotFound),
            (UserError::InvalidArgument("id must not be empty".into()), Code::InvalidArgument),
            (UserError::Timeout("find user".into()), Code::DeadlineExceeded),
            (UserError::PasswordHash("salt".into()), Code::Internal),
            (UserError::Database("connection reset".into()), Code::Internal),
            (UserError::Notification("broker down".into()), Code::Internal),
            (UserError::Serialization("bad utf-8".into()), Code::Internal),
        ];

        for (err, code) in cases {
            let status: Status = err.into();
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn test_status_message_keeps_cause() {
        let status: Status = UserError::NotFound("abc".into()).into();
        assert_eq!(status.message(), "User not found: abc");
    }

    #[test]
    fn test_is_internal() {
        assert!(UserError::Database("x".into()).is_internal());
        assert!(!UserError::NotFound("x".into()).is_internal());
        assert!(!UserError::Timeout("x".into()).is_internal());
    }
}
