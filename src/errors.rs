/*!
 * Error types for the ttml2srt application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while resolving TTML time expressions
#[derive(Error, Debug)]
pub enum TimeExpressionError {
    /// Error when a raw timestamp string matches none of the known grammars
    #[error("Unrecognized time expression: '{0}'")]
    UnrecognizedTimeExpression(String),

    /// Error when a tick-based expression is found but no tick rate is configured
    #[error("Time expression '{0}' uses ticks but the document declares no tick rate")]
    MissingTickRate(String),

    /// Error when a numeric field is malformed or out of range after classification
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Errors that can occur while reading a TTML document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Error when the XML itself cannot be parsed
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// Error when the document has no tt root element
    #[error("Document has no <tt> root element")]
    MissingRoot,

    /// Error when the XML prolog declares an encoding other than UTF-8
    #[error("Source is not declared as utf-8 (found '{0}')")]
    UnsupportedEncoding(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from time expression resolution
    #[error("Time expression error: {0}")]
    Time(#[from] TimeExpressionError),

    /// Error from TTML document parsing
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
