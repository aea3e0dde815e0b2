//! JSON error types.

/// Rendering persisted state as JSON failed.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// The serializer's message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Wrap a serializer failure at the caller's location.
    ///
    /// ```
    /// use reactrole_error::{JsonError, ReactroleError};
    ///
    /// let err: ReactroleError = JsonError::new("Failed to render state: key must be a string").into();
    /// assert!(err.to_string().contains("Failed to render state"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
