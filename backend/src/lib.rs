//! # gridcalc - CSV matrix operations over HTTP
//!
//! Upload a comma-separated grid of cells and get it back echoed, transposed,
//! flattened, summed or multiplied.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV bytes  │────▶│  RowReader  │────▶│ Rectangular │────▶│ GridReducer │──▶ text
//! │  (upload)   │     │   (lazy)    │     │    Rows     │     │ (operation) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use gridcalc::{run_bytes, Operation};
//!
//! let out = run_bytes(Operation::Invert, b"1,2\n3,4\n").unwrap();
//! assert_eq!(out, "1,3\n2,4\n");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Server configuration
//! - [`parser`] - Lazy CSV row reader
//! - [`validation`] - Streaming rectangularity checks
//! - [`transform`] - Reducers, big-integer arithmetic and the pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod config;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, GridError, GridResult, ParseOperationError, ServerError, ServerResult, Shape};

pub use config::ServerConfig;

pub use parser::{Row, RowReader};

pub use validation::{RectangularRows, RowState};

pub use transform::{
    matrix_to_string,
    multiply_row,
    parse_cell,
    run_bytes,
    run_operation,
    run_path,
    sum_row,
    Accumulator,
    GridReducer,
    Operation,
};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
