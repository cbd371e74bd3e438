//! Shared error types for the engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for smelter operations
///
/// Transformer abstention is not an error; a fix that cannot be proven safe
/// simply returns nothing. These variants cover malformed input and
/// programmer errors surfaced by the transaction applier.
#[derive(Debug, Error)]
pub enum SmelterError {
    /// The parser produced no tree for a unit
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A transaction referenced a unit id missing from the snapshot
    #[error("Unknown source unit {index}")]
    UnknownUnit { index: usize },

    /// An edit span fell outside its unit or off a character boundary
    #[error("Invalid span {start}..{end} in {path}")]
    InvalidSpan {
        path: PathBuf,
        start: usize,
        end: usize,
    },

    /// Two edits of one transaction overlap inside the same unit
    #[error("Overlapping edits in {path}")]
    OverlappingEdits { path: PathBuf },

    /// A created unit collides with an existing path
    #[error("Source unit already exists: {path}")]
    DuplicateUnit { path: PathBuf },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, SmelterError>;
