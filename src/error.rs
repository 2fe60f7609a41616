// src/error.rs
use thiserror::Error;

/// Errors produced by an assembly run.
///
/// The first three variants are precondition violations: they are raised before
/// any index or graph is built and abort the run.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("no reads supplied to the assembler")]
    EmptyInput,

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("read {read_id} has length {length}, shorter than the required {required}")]
    InputTooShort {
        read_id: usize,
        length: usize,
        required: usize,
    },

    #[error("invalid read record '{record}': {reason}")]
    InvalidRead { record: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssemblyError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        AssemblyError::InvalidConfiguration { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
