//! Error types for armonizador

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ArmonizadorError {
    #[error("no method for '{0}'")]
    UnknownSelector(String),
    #[error("bad arguments for message '{selector}': {reason}")]
    BadArguments { selector: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ArmonizadorError>;
