//! @ai:module:intent Define error types for the outline processor
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use crate::diagnostic::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all outline processing operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid outline path {0}: name must end with \".oln.py\"")]
    InvalidOutlinePath(PathBuf),

    #[error("Critical parse error at line {}: {}", .critical.line, .critical.message)]
    Aborted {
        critical: Diagnostic,
        /// Ignorable diagnostics raised before the critical one.
        diagnostics: Vec<Diagnostic>,
    },

    #[error("Unknown output backend: {0}")]
    UnknownBackend(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
