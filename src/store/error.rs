//! Storage error types, backend agnostic.

use miette::Diagnostic;
use thiserror::Error;

/// Todo storage errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("storage backend failure: {message}")]
    #[diagnostic(code(todoapp::store::backend))]
    Backend { message: String },
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
