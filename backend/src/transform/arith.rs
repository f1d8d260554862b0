//! Arbitrary-precision cell arithmetic.
//!
//! Cells are parsed into [`BigInt`] so sums and products never overflow, no
//! matter how large the grid or the individual values are.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::error::{GridError, GridResult};

/// Parse a cell as a base-10 integer.
///
/// Accepts an optional `+` or `-` followed by ASCII digits. Everything else,
/// including empty cells, surrounding whitespace and decimals, is
/// [`GridError::InvalidNumber`].
pub fn parse_cell(cell: &str) -> GridResult<BigInt> {
    let (negative, digits) = match cell.as_bytes().first() {
        Some(b'-') => (true, &cell[1..]),
        Some(b'+') => (false, &cell[1..]),
        _ => (false, cell),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GridError::invalid_number(cell));
    }

    let magnitude =
        BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| GridError::invalid_number(cell))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// How an [`Accumulator`] combines cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    Sum,
    Product,
}

/// Running total over every cell of a grid.
#[derive(Debug, Clone)]
pub struct Accumulator {
    fold: Fold,
    value: BigInt,
}

impl Accumulator {
    /// Starts at 0.
    pub fn sum() -> Self {
        Self {
            fold: Fold::Sum,
            value: BigInt::zero(),
        }
    }

    /// Starts at 1.
    pub fn product() -> Self {
        Self {
            fold: Fold::Product,
            value: BigInt::one(),
        }
    }

    pub fn fold(&self) -> Fold {
        self.fold
    }

    /// Parse `cell` and fold it in.
    ///
    /// A product that has reached zero stays zero: the cell is still parsed
    /// so bad values are reported, but no multiplication happens.
    pub fn fold_cell(&mut self, cell: &str) -> GridResult<()> {
        let n = parse_cell(cell)?;
        match self.fold {
            Fold::Sum => self.value += n,
            Fold::Product if self.value.is_zero() => {}
            Fold::Product => self.value *= n,
        }
        Ok(())
    }

    pub fn fold_row(&mut self, cells: &[String]) -> GridResult<()> {
        cells.iter().try_for_each(|cell| self.fold_cell(cell))
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// Decimal rendering of the final value.
    pub fn into_decimal(self) -> String {
        self.value.to_string()
    }
}

/// Sum of a single row.
pub fn sum_row(cells: &[String]) -> GridResult<BigInt> {
    let mut acc = Accumulator::sum();
    acc.fold_row(cells)?;
    Ok(acc.value)
}

/// Product of a single row.
pub fn multiply_row(cells: &[String]) -> GridResult<BigInt> {
    let mut acc = Accumulator::product();
    acc.fold_row(cells)?;
    Ok(acc.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cell_accepts_signed_integers() {
        assert_eq!(parse_cell("42").unwrap(), BigInt::from(42));
        assert_eq!(parse_cell("-7").unwrap(), BigInt::from(-7));
        assert_eq!(parse_cell("+7").unwrap(), BigInt::from(7));
        assert_eq!(parse_cell("007").unwrap(), BigInt::from(7));
        assert_eq!(parse_cell("-0").unwrap(), BigInt::zero());
    }

    #[test]
    fn test_parse_cell_accepts_huge_values() {
        let huge = "123456789012345678901234567890";
        assert_eq!(parse_cell(huge).unwrap().to_string(), huge);
    }

    #[test]
    fn test_parse_cell_rejects_non_integers() {
        for bad in ["", "-", "+", "1.5", " 1", "1 ", "1_000", "abc", "0x10", "1e3", "--1"] {
            match parse_cell(bad) {
                Err(GridError::InvalidNumber { value }) => assert_eq!(value, bad),
                other => panic!("{:?} should be rejected, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_sum_row() {
        assert_eq!(sum_row(&cells(&["1", "2", "3"])).unwrap(), BigInt::from(6));
        assert_eq!(sum_row(&cells(&["-5", "5"])).unwrap(), BigInt::zero());
    }

    #[test]
    fn test_multiply_row() {
        assert_eq!(multiply_row(&cells(&["4", "5", "6"])).unwrap(), BigInt::from(120));
    }

    #[test]
    fn test_row_reports_offending_cell() {
        let err = sum_row(&cells(&["1", "two", "3"])).unwrap_err();
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn test_product_beyond_u64() {
        let row = cells(&["999999999"; 4]);
        let product = multiply_row(&row).unwrap();
        assert_eq!(product, BigInt::from(999_999_999u64).pow(4));
        assert!(product > BigInt::from(u64::MAX));
    }

    #[test]
    fn test_product_stays_zero_but_keeps_parsing() {
        let mut acc = Accumulator::product();
        acc.fold_row(&cells(&["3", "0", "7"])).unwrap();
        assert!(acc.value().is_zero());

        assert!(acc.fold_cell("x").is_err());

        acc.fold_cell("9").unwrap();
        assert_eq!(acc.into_decimal(), "0");
    }

    #[test]
    fn test_initial_values() {
        assert_eq!(Accumulator::sum().into_decimal(), "0");
        assert_eq!(Accumulator::product().into_decimal(), "1");
        assert_eq!(Accumulator::product().fold(), Fold::Product);
    }
}
