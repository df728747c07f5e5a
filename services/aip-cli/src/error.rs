//! CLI-specific error types

use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

/// Failures that happen before a call reaches the client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("read image file error: {path}: {source}")]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result alias using CLI Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// General-error object, in the same shape the client uses.
    pub fn to_json(&self) -> Value {
        match self {
            Error::ImageRead { .. } => json!({
                "error_code": "SDK102",
                "error_msg": "read image file error",
            }),
            Error::Usage(msg) => json!({
                "error_code": -1,
                "error_msg": msg,
            }),
        }
    }
}
