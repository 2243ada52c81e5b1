// src/error.rs

//! Error types for portdeps

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can stop an operation outright
///
/// Most problems met while walking a recipe corpus are not errors at all:
/// they are recorded as diagnostics and the walk carries on. This type covers
/// the few cases where there is nothing sensible left to do.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No provided names found in any recipe under {}", .0.display())]
    EmptyIndex(PathBuf),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
