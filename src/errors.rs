// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskmailError {
    /// Malformed user input (switches, exit code lists, addresses).
    ///
    /// Reported to the user without a stack of context; never triggers a
    /// notification.
    #[error("{0}")]
    Argument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialisation error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskmailError {
    pub fn argument(msg: impl Into<String>) -> Self {
        TaskmailError::Argument(msg.into())
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, TaskmailError::Argument(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskmailError>;
