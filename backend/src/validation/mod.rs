//! Rectangularity validation.
//!
//! [`RectangularRows`] wraps a row iterator and checks the grid shape as rows
//! stream past, so a bad row deep into a large upload fails without the file
//! ever being buffered.
//!
//! # Rules
//!
//! - The first row fixes the expected width `W`.
//! - Any later row whose width differs from `W` fails immediately.
//! - A row arriving after `W` rows fails immediately, so only `W x W` grids
//!   get through.
//! - At end of input, zero rows is [`GridError::EmptyInput`] and fewer than
//!   `W` rows is [`GridError::ShapeMismatch`].
//!
//! # Example
//!
//! ```rust
//! use gridcalc::parser::RowReader;
//! use gridcalc::validation::RectangularRows;
//!
//! let rows = RectangularRows::new(RowReader::new("1,2\n3,4\n".as_bytes()));
//! assert_eq!(rows.filter_map(Result::ok).count(), 2);
//! ```

use std::iter::FusedIterator;

use crate::error::{GridError, GridResult, Shape};
use crate::parser::Row;

/// Shape bookkeeping for one validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowState {
    /// Width of the first row, 0 until one has been seen.
    pub expected_width: usize,
    pub row_count: usize,
}

impl RowState {
    /// Account for one more row of the given width.
    pub fn observe(&mut self, width: usize) -> GridResult<()> {
        self.row_count += 1;

        if self.row_count == 1 {
            self.expected_width = width;
            return Ok(());
        }

        if width != self.expected_width {
            return Err(self.mismatch(Some(width)));
        }

        if self.row_count > self.expected_width {
            return Err(self.mismatch(None));
        }

        Ok(())
    }

    /// End-of-input checks.
    pub fn finish(&self) -> GridResult<()> {
        if self.row_count == 0 || self.expected_width == 0 {
            return Err(GridError::EmptyInput);
        }

        if self.row_count < self.expected_width {
            return Err(self.mismatch(None));
        }

        Ok(())
    }

    fn mismatch(&self, row_width: Option<usize>) -> GridError {
        GridError::ShapeMismatch(Shape {
            expected_width: self.expected_width,
            rows: self.row_count,
            row_width,
        })
    }
}

/// Iterator adapter yielding only rows that keep the grid rectangular.
///
/// The first error (from the inner iterator or from a shape check) is yielded
/// once and ends the iteration.
pub struct RectangularRows<I> {
    rows: I,
    state: RowState,
    done: bool,
}

impl<I> RectangularRows<I>
where
    I: Iterator<Item = GridResult<Row>>,
{
    pub fn new(rows: I) -> Self {
        Self {
            rows,
            state: RowState::default(),
            done: false,
        }
    }

    pub fn state(&self) -> RowState {
        self.state
    }
}

impl<I> Iterator for RectangularRows<I>
where
    I: Iterator<Item = GridResult<Row>>,
{
    type Item = GridResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let checked = match self.rows.next() {
            Some(Ok(row)) => self.state.observe(row.width()).map(|()| row),
            Some(Err(e)) => Err(e),
            None => {
                self.done = true;
                return self.state.finish().err().map(Err);
            }
        };

        if checked.is_err() {
            self.done = true;
        }
        Some(checked)
    }
}

impl<I> FusedIterator for RectangularRows<I> where I: Iterator<Item = GridResult<Row>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RowReader;

    fn validate(input: &str) -> GridResult<usize> {
        let mut count = 0;
        for row in RectangularRows::new(RowReader::new(input.as_bytes())) {
            row?;
            count += 1;
        }
        Ok(count)
    }

    fn shape_of(err: GridError) -> Shape {
        match err {
            GridError::ShapeMismatch(shape) => shape,
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_square_grid_passes() {
        assert_eq!(validate("1,2,3\n4,5,6\n7,8,9\n").unwrap(), 3);
    }

    #[test]
    fn test_empty_input() {
        let err = validate("").unwrap_err();
        assert!(matches!(err, GridError::EmptyInput));

        let err = validate("\n\n").unwrap_err();
        assert!(matches!(err, GridError::EmptyInput));
    }

    #[test]
    fn test_short_last_row() {
        let err = validate("1,2,3\n4,5,6\n7,8\n").unwrap_err();
        let shape = shape_of(err);
        assert_eq!(shape.expected_width, 3);
        assert_eq!(shape.rows, 3);
        assert_eq!(shape.row_width, Some(2));
    }

    #[test]
    fn test_long_row() {
        let err = validate("1,2\n3,4,5\n").unwrap_err();
        assert_eq!(shape_of(err).row_width, Some(3));
    }

    #[test]
    fn test_too_few_rows() {
        let err = validate("1,2,3\n4,5,6\n").unwrap_err();
        let msg = err.to_string();
        assert_eq!(msg, "csv with incomplete matrix. Expected 3x3, Got: 2x3");
    }

    #[test]
    fn test_single_row_of_width_three() {
        let err = validate("1,2,3\n").unwrap_err();
        assert!(err.to_string().contains("csv with incomplete matrix"));
    }

    #[test]
    fn test_extra_row_rejected() {
        let err = validate("1,2\n3,4\n5,6\n").unwrap_err();
        let shape = shape_of(err);
        assert_eq!(shape.rows, 3);
        assert_eq!(shape.row_width, None);
        assert_eq!(
            shape.to_string(),
            "csv with incomplete matrix. Expected 2x2, Got: 3x2"
        );
    }

    #[test]
    fn test_extra_row_fails_before_rest_of_input() {
        let input = "1\n2\n3\n";
        let mut rows = RectangularRows::new(RowReader::new(input.as_bytes()));
        assert!(rows.next().unwrap().is_ok());
        assert!(matches!(rows.next(), Some(Err(GridError::ShapeMismatch(_)))));
        assert!(rows.next().is_none());
        assert_eq!(rows.state().row_count, 2);
    }

    #[test]
    fn test_bad_row_stops_iteration() {
        let input = "1,2\n3\n5,6\n";
        let mut rows = RectangularRows::new(RowReader::new(input.as_bytes()));
        assert!(rows.next().unwrap().is_ok());
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
        assert_eq!(rows.state().row_count, 2);
    }

    #[test]
    fn test_reader_errors_pass_through() {
        let bytes: &[u8] = &[b'1', b'\n', 0xC3, b'\n'];
        let mut rows = RectangularRows::new(RowReader::new(bytes));
        let mut saw_malformed = false;
        for row in rows.by_ref() {
            if let Err(GridError::MalformedInput { .. }) = row {
                saw_malformed = true;
            }
        }
        assert!(saw_malformed);
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_row_state_finish() {
        let mut state = RowState::default();
        assert!(matches!(state.finish(), Err(GridError::EmptyInput)));
        state.observe(1).unwrap();
        assert!(state.finish().is_ok());
    }
}
