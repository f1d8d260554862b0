//! Grid reducers.
//!
//! Every operation is a [`GridReducer`]: it is fed validated rows one at a
//! time and renders its output once input is exhausted. Only [`Transpose`]
//! keeps the rows around; the others hold just their output or a running
//! total.

use crate::error::GridResult;
use crate::parser::Row;

use super::arith::Accumulator;

/// A strategy consuming a validated grid into one output string.
pub trait GridReducer {
    /// Feed the next row, in input order.
    fn accept(&mut self, row: Row) -> GridResult<()>;

    /// Render the output. Always ends with a single newline.
    fn finish(self: Box<Self>) -> String;
}

/// Render a grid as CSV lines, cells joined by commas.
pub fn matrix_to_string(matrix: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in matrix {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Re-serializes each row as it arrives.
#[derive(Debug, Default)]
pub struct Echo {
    out: String,
}

impl GridReducer for Echo {
    fn accept(&mut self, row: Row) -> GridResult<()> {
        self.out.push_str(&row.join(","));
        self.out.push('\n');
        Ok(())
    }

    fn finish(self: Box<Self>) -> String {
        self.out
    }
}

/// Swaps rows and columns.
///
/// Output rows are allocated lazily the first time a column index shows up.
/// The validator guarantees equal widths, so every output row ends up with one
/// cell per input row.
#[derive(Debug, Default)]
pub struct Transpose {
    columns: Vec<Vec<String>>,
}

impl GridReducer for Transpose {
    fn accept(&mut self, row: Row) -> GridResult<()> {
        for (i, cell) in row.into_iter().enumerate() {
            if self.columns.len() <= i {
                self.columns.push(Vec::new());
            }
            self.columns[i].push(cell);
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> String {
        matrix_to_string(&self.columns)
    }
}

/// All cells in row-major order on a single line.
#[derive(Debug, Default)]
pub struct Flatten {
    out: String,
    started: bool,
}

impl GridReducer for Flatten {
    fn accept(&mut self, row: Row) -> GridResult<()> {
        for cell in row {
            if self.started {
                self.out.push(',');
            }
            self.out.push_str(&cell);
            self.started = true;
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> String {
        self.out.push('\n');
        self.out
    }
}

/// Sum or product of every cell.
#[derive(Debug)]
pub struct Arithmetic {
    acc: Accumulator,
}

impl Arithmetic {
    pub fn sum() -> Self {
        Self {
            acc: Accumulator::sum(),
        }
    }

    pub fn product() -> Self {
        Self {
            acc: Accumulator::product(),
        }
    }
}

impl GridReducer for Arithmetic {
    fn accept(&mut self, row: Row) -> GridResult<()> {
        self.acc.fold_row(row.cells())
    }

    fn finish(self: Box<Self>) -> String {
        let mut out = self.acc.into_decimal();
        out.push('\n');
        out
    }
}
