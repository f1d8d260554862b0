//! Error types for the gridcalc service.
//!
//! - [`GridError`] - everything the core (reader, validator, reducers) can report
//! - [`ServerError`] - HTTP adapter errors, wrapping [`GridError`]
//! - [`ConfigError`] - configuration loading errors
//!
//! `GridError` converts into `ServerError` via `From`, so `?` works across the
//! core/adapter boundary. The status code each error maps to lives in
//! [`ServerError::status_code`].

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// =============================================================================
// Core Errors
// =============================================================================

/// Errors raised while reading, validating or reducing a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// The input is not well-formed CSV (for example invalid UTF-8).
    #[error("malformed csv at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    /// The underlying stream failed while rows were being pulled.
    #[error("error reading file: {0}")]
    Read(#[source] std::io::Error),

    /// Not a single row was read.
    #[error("csv is empty")]
    EmptyInput,

    /// The rows do not form a proper grid.
    #[error("{0}")]
    ShapeMismatch(Shape),

    /// A cell could not be parsed as a base-10 integer.
    #[error("invalid number {value:?}")]
    InvalidNumber { value: String },
}

impl GridError {
    pub fn invalid_number(value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            value: value.into(),
        }
    }

    /// True for errors caused by the uploaded data rather than the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Read(_))
    }
}

/// Expected versus actual dimensions of a rejected grid.
///
/// The message always reports the expected shape as `W x W`, the convention
/// existing clients match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// Width of the first row.
    pub expected_width: usize,
    /// Rows seen when the mismatch was detected, offending row included.
    pub rows: usize,
    /// Width of the offending row, when a single row was the culprit.
    pub row_width: Option<usize>,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.expected_width;
        write!(
            f,
            "csv with incomplete matrix. Expected {}x{}, Got: {}x{}",
            w, w, self.rows, w
        )?;
        if let Some(found) = self.row_width {
            write!(f, " (row {} has {} cells)", self.rows, found)?;
        }
        Ok(())
    }
}

/// An operation name that is not one of the five known ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation {0:?}, expected one of echo, invert, flatten, sum, multiply")]
pub struct ParseOperationError(pub String);

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP adapter errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The uploaded file could not be obtained from the request.
    #[error("error {message}")]
    FileAccess { status: StatusCode, message: String },

    /// The core rejected the upload.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Socket level failure (bind, accept).
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else that is the service's fault.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn file_access(message: impl Into<String>) -> Self {
        Self::FileAccess {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::FileAccess { status, .. } => *status,
            Self::Grid(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Grid(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status_code(), format!("{}\n", self)).into_response()
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while assembling the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for core operations.
pub type GridResult<T> = Result<T, GridError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
