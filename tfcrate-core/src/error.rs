//! Error types for tfcrate

use std::fmt;
use thiserror::Error;

/// Which structural part of an incoming transform was missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedKind {
    /// No parent frame id, or an empty one
    MissingParentFrame,
    /// No child frame id, or an empty one
    MissingChildFrame,
    /// No translation substructure
    MissingTranslation,
    /// No rotation substructure
    MissingRotation,
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MalformedKind::MissingParentFrame => "missing parent frame",
            MalformedKind::MissingChildFrame => "missing child frame",
            MalformedKind::MissingTranslation => "missing translation",
            MalformedKind::MissingRotation => "missing rotation",
        };
        f.write_str(text)
    }
}

/// Main error type for tfcrate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed transform: {0}")]
    MalformedTransform(MalformedKind),

    #[error("Transform store lock poisoned")]
    LockPoisoned,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for tfcrate operations
pub type Result<T> = std::result::Result<T, Error>;
