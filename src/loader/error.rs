// ABOUTME: Error types for loader resolution and value conversion
// ABOUTME: Conversion failures carry the offending input for scenario authors

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Unknown loader: {name}")]
    UnknownLoader { name: String },

    #[error("Invalid JSON '{input}': {source}")]
    InvalidJson {
        input: String,
        source: serde_json::Error,
    },

    #[error("Invalid integer '{input}': {source}")]
    InvalidInt { input: String, source: ParseIntError },

    #[error("Invalid float '{input}': {source}")]
    InvalidFloat {
        input: String,
        source: ParseFloatError,
    },

    #[error("Float '{input}' is not a finite number")]
    NonFiniteFloat { input: String },
}

pub type Result<T> = std::result::Result<T, LoaderError>;
