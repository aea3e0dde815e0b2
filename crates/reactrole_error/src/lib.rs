//! Error types for the reactrole bot.
//!
//! This crate provides the error types shared by every reactrole crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use reactrole_error::{ReactroleResult, StorageError, StorageErrorKind};
//!
//! fn load() -> ReactroleResult<String> {
//!     Err(StorageError::new(StorageErrorKind::FileRead("role_data.json".into())))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod error;
mod json;
mod platform;
mod storage;

pub use command::{CommandError, CommandErrorKind};
pub use config::ConfigError;
pub use error::{ReactroleError, ReactroleErrorKind, ReactroleResult};
pub use json::JsonError;
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use storage::{StorageError, StorageErrorKind};
