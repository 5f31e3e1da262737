// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::socket::SocketError;

#[derive(Error, Debug)]
pub enum ExectesterError {
    /// A parameter-set invariant was violated; nothing has been run yet.
    #[error("(paramSetValidationError) {0}")]
    ParamSetValidation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Socket(#[from] SocketError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ExectesterError>;
