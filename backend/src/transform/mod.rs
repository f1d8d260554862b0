//! Grid transformation.
//!
//! - Arith: arbitrary-precision cell parsing and accumulation
//! - Reducers: echo, transpose, flatten, sum and product strategies
//! - Pipeline: reader + validator + reducer behind one entry point

pub mod arith;
pub mod pipeline;
pub mod reducers;

pub use arith::{multiply_row, parse_cell, sum_row, Accumulator, Fold};
pub use pipeline::{run_bytes, run_operation, run_path, Operation};
pub use reducers::{matrix_to_string, Arithmetic, Echo, Flatten, GridReducer, Transpose};
