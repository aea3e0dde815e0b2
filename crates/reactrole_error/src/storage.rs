//! Storage error types for the persisted role state.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the directory holding the state file
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write the state file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read the state file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to move the temporary file over the state file
    #[display("Failed to replace state file: {}", _0)]
    Rename(String),
    /// State file exists but cannot be parsed
    #[display("Corrupt state: {}", _0)]
    Corrupt(String),
    /// State could not be serialized
    #[display("Failed to serialize state: {}", _0)]
    Serialize(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use reactrole_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Corrupt("expected value at line 1".to_string()));
/// assert!(format!("{}", err).contains("Corrupt state"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the error means the durable state could not be parsed.
    pub fn is_corrupt(&self) -> bool {
        matches!(self.kind, StorageErrorKind::Corrupt(_))
    }
}
