use thiserror::Error;

use crate::models::UserStatus;

/// Centralized error types for the application
///
/// Every fallible operation in the core returns this enum so handlers can
/// decide, at the point where the action started, what the user gets to see.
/// Uses `thiserror` for automatic error conversion and display formatting.
///
/// # Example
///
/// ```no_run
/// use forestcore::core::error::AppError;
///
/// fn explain(err: &AppError) -> &'static str {
///     if err.is_not_found() {
///         "no such resident"
///     } else {
///         "try again later"
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// The identifier has no row in the record store
    #[error("User {0} not found")]
    NotFound(i64),

    /// The record store answered, but refused or garbled the request
    #[error("Record store error: {0}")]
    Store(String),

    /// HTTP transport errors (record store API, token endpoint)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential loading or token exchange failed
    #[error("Auth error: {0}")]
    Auth(String),

    /// Malformed user-supplied arguments; the message is shown to the user as is
    #[error("{0}")]
    Validation(String),

    /// Moderation target is no longer pending
    #[error("User {id} is already {status}")]
    AlreadyModerated { id: i64, status: UserStatus },

    /// Configuration could not be assembled
    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Telegram API errors
    #[cfg(feature = "telegram")]
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

impl AppError {
    /// True when the record store simply has no such identifier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// True for failures of an external collaborator (store, network, Telegram).
    pub fn is_transport(&self) -> bool {
        match self {
            AppError::Store(_) | AppError::Http(_) | AppError::Auth(_) | AppError::Io(_) => true,
            #[cfg(feature = "telegram")]
            AppError::Telegram(_) => true,
            _ => false,
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(Box::new(err))
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguishable_from_transport() {
        let not_found = AppError::NotFound(999);
        assert!(not_found.is_not_found());
        assert!(!not_found.is_transport());

        let store = AppError::Store("503 Service Unavailable".to_string());
        assert!(!store.is_not_found());
        assert!(store.is_transport());
    }

    #[test]
    fn test_validation_displays_message_verbatim() {
        let err = AppError::Validation("❌ Укажите роль".to_string());
        assert_eq!(err.to_string(), "❌ Укажите роль");
    }

    #[test]
    fn test_already_moderated_mentions_status() {
        let err = AppError::AlreadyModerated {
            id: 42,
            status: UserStatus::Approved,
        };
        assert_eq!(err.to_string(), "User 42 is already approved");
    }
}
