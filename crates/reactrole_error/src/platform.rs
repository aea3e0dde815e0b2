//! Chat platform error types.
//!
//! Every call into the chat platform (role creation, message edits, reactions,
//! direct messages) reports failures through [`PlatformError`].

/// Platform error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// The platform API rejected or failed the call.
    #[display("Platform API error during {operation}: {message}")]
    Api {
        /// Operation that was attempted
        operation: String,
        /// Message reported by the platform client
        message: String,
    },

    /// A referenced channel, message, role or user does not exist.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// The emoji token cannot be turned into a reaction.
    #[display("Invalid emoji: {_0}")]
    InvalidEmoji(String),

    /// The bot lacks the permission needed for an operation.
    #[display("Insufficient permissions: {_0}")]
    InsufficientPermissions(String),

    /// Connection to the platform failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// Error kind
    pub kind: PlatformErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use reactrole_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::InvalidEmoji(":nope:".into()));
    /// assert!(err.to_string().contains("Invalid emoji"));
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`PlatformErrorKind::Api`] error.
    #[track_caller]
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Api {
            operation: operation.into(),
            message: message.into(),
        })
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
