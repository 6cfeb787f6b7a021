//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while reading or writing messages
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Write error: {message}")]
    Write { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for IoError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            IoError::Io(err.into())
        } else {
            IoError::Parse {
                message: err.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, IoError>;
