//! Single entry point for every operation.
//!
//! ```text
//! bytes ──▶ RowReader ──▶ RectangularRows ──▶ GridReducer ──▶ String
//! ```
//!
//! The pipeline either returns the complete output or the first error; no
//! partial output ever escapes.
//!
//! # Example
//!
//! ```rust
//! use gridcalc::transform::pipeline::{run_bytes, Operation};
//!
//! let out = run_bytes(Operation::Sum, b"1,2\n3,4\n").unwrap();
//! assert_eq!(out, "10\n");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult, ParseOperationError};
use crate::parser::RowReader;
use crate::validation::RectangularRows;

use super::reducers::{Arithmetic, Echo, Flatten, GridReducer, Transpose};

/// The five things the service can do with a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Echo,
    Invert,
    Flatten,
    Sum,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Echo,
        Operation::Invert,
        Operation::Flatten,
        Operation::Sum,
        Operation::Multiply,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Echo => "echo",
            Operation::Invert => "invert",
            Operation::Flatten => "flatten",
            Operation::Sum => "sum",
            Operation::Multiply => "multiply",
        }
    }

    /// HTTP route serving this operation.
    pub fn route(self) -> &'static str {
        match self {
            Operation::Echo => "/echo",
            Operation::Invert => "/invert",
            Operation::Flatten => "/flatten",
            Operation::Sum => "/sum",
            Operation::Multiply => "/multiply",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::Echo => "Return the parsed grid, one row per line",
            Operation::Invert => "Transpose the grid (rows become columns)",
            Operation::Flatten => "All cells on one line, row-major",
            Operation::Sum => "Sum of every cell",
            Operation::Multiply => "Product of every cell",
        }
    }

    /// Fresh reducer for one run.
    pub fn reducer(self) -> Box<dyn GridReducer + Send> {
        match self {
            Operation::Echo => Box::<Echo>::default(),
            Operation::Invert => Box::<Transpose>::default(),
            Operation::Flatten => Box::<Flatten>::default(),
            Operation::Sum => Box::new(Arithmetic::sum()),
            Operation::Multiply => Box::new(Arithmetic::product()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" => Ok(Operation::Echo),
            "invert" => Ok(Operation::Invert),
            "flatten" => Ok(Operation::Flatten),
            "sum" => Ok(Operation::Sum),
            "multiply" => Ok(Operation::Multiply),
            _ => Err(ParseOperationError(s.to_string())),
        }
    }
}

/// Read, validate and reduce `input` with the chosen operation.
pub fn run_operation<R: Read>(operation: Operation, input: R) -> GridResult<String> {
    let mut reducer = operation.reducer();
    for row in RectangularRows::new(RowReader::new(input)) {
        reducer.accept(row?)?;
    }
    Ok(reducer.finish())
}

/// [`run_operation`] over an in-memory upload.
pub fn run_bytes(operation: Operation, bytes: &[u8]) -> GridResult<String> {
    run_operation(operation, bytes)
}

/// [`run_operation`] over a file on disk. Failing to open it is a read error.
pub fn run_path(operation: Operation, path: &Path) -> GridResult<String> {
    let file = File::open(path).map_err(GridError::Read)?;
    run_operation(operation, BufReader::new(file))
}
