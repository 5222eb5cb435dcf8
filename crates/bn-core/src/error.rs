//! Base error type shared by the `bn-*` crates.
//!
//! Sub-crates define their own error enums for their own failure modes and
//! wrap this one where a `bn-core` check can fail underneath them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `bn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
