//! Top-level error wrapper types.

use crate::{CommandError, ConfigError, JsonError, PlatformError, StorageError};

/// Every error a reactrole crate can surface.
///
/// # Examples
///
/// ```
/// use reactrole_error::{ConfigError, ReactroleError};
///
/// let err: ReactroleError = ConfigError::new("bad data_file").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReactroleErrorKind {
    /// Persisted state error
    #[from(StorageError)]
    Storage(StorageError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Chat platform error
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Administrative command error
    #[from(CommandError)]
    Command(CommandError),
}

/// Reactrole error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reactrole Error: {}", _0)]
pub struct ReactroleError(Box<ReactroleErrorKind>);

impl ReactroleError {
    /// Create a new error from a kind.
    pub fn new(kind: ReactroleErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReactroleErrorKind {
        &self.0
    }
}

impl<T> From<T> for ReactroleError
where
    T: Into<ReactroleErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for reactrole operations.
pub type ReactroleResult<T> = std::result::Result<T, ReactroleError>;
