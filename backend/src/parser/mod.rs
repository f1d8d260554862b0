//! Lazy CSV row reader.
//!
//! Turns any byte stream into an iterator of [`Row`]s. `None` means end of
//! input; a read or decode failure is yielded once as `Some(Err(_))`, after
//! which the reader is exhausted and keeps returning `None`.
//!
//! The reader does not care about row widths. Ragged input comes through
//! untouched so the validator can report it with the right diagnostics.
//!
//! Quoting is strict. The `csv` crate reads stray quotes as data, so the byte
//! stream passes through [`QuoteCheck`] first, which fails on:
//!
//! - a quote inside an unquoted field (`a"b`)
//! - anything but a separator or line end after a closing quote (`"a"b`)
//! - end of input inside a quoted field

use std::io::{self, Read};
use std::iter::FusedIterator;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use thiserror::Error;

use crate::error::{GridError, GridResult};

/// One parsed record: an ordered list of unquoted cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    /// Number of cells.
    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<String> {
        self.0
    }

    /// Cells joined with `sep`, no quoting applied.
    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self(cells)
    }
}

impl From<&StringRecord> for Row {
    fn from(record: &StringRecord) -> Self {
        Self(record.iter().map(str::to_string).collect())
    }
}

impl IntoIterator for Row {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Quote Checking
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote seen inside a quoted field: either an escape or the close.
    QuoteInQuoted,
}

/// Quoting violation, carried through the csv reader as an `io::Error`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
struct QuoteError {
    line: u64,
    message: &'static str,
}

impl From<QuoteError> for io::Error {
    fn from(err: QuoteError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// `Read` adapter that enforces RFC 4180 quoting on the bytes going through.
///
/// Bytes before the offending one are still handed out, so every complete
/// record ahead of it parses normally; the next read returns the error.
pub struct QuoteCheck<R> {
    inner: R,
    state: QuoteState,
    line: u64,
    open_line: u64,
    failed: Option<QuoteError>,
}

impl<R: Read> QuoteCheck<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: QuoteState::FieldStart,
            line: 1,
            open_line: 1,
            failed: None,
        }
    }

    fn step(&mut self, byte: u8) -> Result<(), QuoteError> {
        use QuoteState::*;

        self.state = match (self.state, byte) {
            (Quoted, b'"') => QuoteInQuoted,
            (Quoted, _) => Quoted,
            (QuoteInQuoted, b'"') => Quoted,
            (FieldStart, b'"') => {
                self.open_line = self.line;
                Quoted
            }
            (Unquoted, b'"') => return Err(self.error("quote inside an unquoted field")),
            (_, b',' | b'\r' | b'\n') => FieldStart,
            (QuoteInQuoted, _) => return Err(self.error("unexpected character after closing quote")),
            (FieldStart | Unquoted, _) => Unquoted,
        };

        if byte == b'\n' {
            self.line += 1;
        }
        Ok(())
    }

    fn error(&self, message: &'static str) -> QuoteError {
        QuoteError {
            line: self.line,
            message,
        }
    }
}

impl<R: Read> Read for QuoteCheck<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = &self.failed {
            return Err(err.clone().into());
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let n = self.inner.read(buf)?;
        if n == 0 {
            if self.state == QuoteState::Quoted {
                let err = QuoteError {
                    line: self.open_line,
                    message: "unterminated quoted field",
                };
                self.failed = Some(err.clone());
                return Err(err.into());
            }
            return Ok(0);
        }

        for (i, &byte) in buf[..n].iter().enumerate() {
            if let Err(err) = self.step(byte) {
                self.failed = Some(err.clone());
                if i > 0 {
                    return Ok(i);
                }
                return Err(err.into());
            }
        }
        Ok(n)
    }
}

// =============================================================================
// Row Reader
// =============================================================================

/// Pulls rows from a comma-separated byte stream, one record at a time.
pub struct RowReader<R> {
    records: StringRecordsIntoIter<QuoteCheck<R>>,
    finished: bool,
}

impl<R: Read> RowReader<R> {
    /// No header row, strict double-quote rules, blank lines skipped.
    pub fn new(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(QuoteCheck::new(reader))
            .into_records();

        Self {
            records,
            finished: false,
        }
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = GridResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.records.next() {
            Some(Ok(record)) => Some(Ok(Row::from(&record))),
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(classify(e)))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}

impl<R: Read> FusedIterator for RowReader<R> {}

/// Stream failures stay distinct from bad data.
fn classify(err: csv::Error) -> GridError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();

    match err.into_kind() {
        csv::ErrorKind::Io(e) => {
            if let Some(quote) = e.get_ref().and_then(|inner| inner.downcast_ref::<QuoteError>()) {
                return GridError::MalformedInput {
                    line: quote.line,
                    message: quote.to_string(),
                };
            }
            GridError::Read(e)
        }
        _ => GridError::MalformedInput { line, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str) -> Vec<Vec<String>> {
        RowReader::new(input.as_bytes())
            .map(|r| r.unwrap().into_cells())
            .collect()
    }

    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "upload interrupted",
            ))
        }
    }

    #[test]
    fn test_simple_rows() {
        let rows = read_all("1,2,3\n4,5,6\n");
        assert_eq!(rows, vec![vec!["1", "2", "3"], vec!["4", "5", "6"]]);
    }

    #[test]
    fn test_first_record_is_data() {
        let rows = read_all("a,b\n1,2");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b"]);
    }

    #[test]
    fn test_quoted_values() {
        let rows = read_all("\"1,5\",\"say \"\"hi\"\"\"\n\"multi\nline\",x\n");
        assert_eq!(rows[0], vec!["1,5", "say \"hi\""]);
        assert_eq!(rows[1], vec!["multi\nline", "x"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let rows = read_all("1,2\n\n3,4\n\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = read_all("1,2\r\n3,4\r\n");
        assert_eq!(rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_ragged_rows_pass_through() {
        let rows = read_all("1,2,3\n4,5\n");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 2);
    }

    #[test]
    fn test_empty_input_ends_immediately() {
        let mut reader = RowReader::new("".as_bytes());
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = &[b'1', b',', 0xFF, 0xFE, b'\n'];
        let mut reader = RowReader::new(bytes);
        match reader.next() {
            Some(Err(GridError::MalformedInput { line, .. })) => assert_eq!(line, 1),
            other => panic!("expected malformed input, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    fn malformed_line(input: &str) -> (u64, String) {
        let mut reader = RowReader::new(input.as_bytes());
        for row in reader.by_ref() {
            if let Err(e) = row {
                match e {
                    GridError::MalformedInput { line, message } => return (line, message),
                    other => panic!("expected malformed input, got {:?}", other),
                }
            }
        }
        panic!("expected malformed input for {:?}", input);
    }

    #[test]
    fn test_unterminated_quote() {
        let (line, message) = malformed_line("\"1,2\n3,4\n");
        assert_eq!(line, 1);
        assert!(message.contains("unterminated"));

        let (line, _) = malformed_line("1,2\n3,\"4\n");
        assert_eq!(line, 2);
    }

    #[test]
    fn test_quote_inside_unquoted_field() {
        let (line, message) = malformed_line("a\"b,c\nd,e\n");
        assert_eq!(line, 1);
        assert!(message.contains("unquoted"));
    }

    #[test]
    fn test_text_after_closing_quote() {
        let (line, message) = malformed_line("1,2\n\"3\"x,4\n");
        assert_eq!(line, 2);
        assert!(message.contains("closing quote"));
    }

    #[test]
    fn test_rows_before_bad_quote_still_read() {
        let mut reader = RowReader::new("1,2\n3,4\n5,\"6\n".as_bytes());
        assert_eq!(reader.next().unwrap().unwrap().cells(), ["1", "2"]);
        assert_eq!(reader.next().unwrap().unwrap().cells(), ["3", "4"]);
        assert!(matches!(
            reader.next(),
            Some(Err(GridError::MalformedInput { line: 3, .. }))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_quoted_field_at_end_of_input() {
        let rows = read_all("\"a\",\"b\"\"\"");
        assert_eq!(rows, vec![vec!["a", "b\""]]);
    }

    #[test]
    fn test_stream_failure_is_read_error() {
        let mut reader = RowReader::new(BrokenStream);
        match reader.next() {
            Some(Err(GridError::Read(e))) => {
                assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset)
            }
            other => panic!("expected read error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_row_join() {
        let row = Row::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(row.width(), 3);
        assert_eq!(row.join(","), "a,b,c");
    }
}
