//! RowSource trait for pulling rows out of a tabular source

use crate::cell::CellValue;
use crate::error::Result;
use crate::header::Header;

/// Cells of one source row in source order, before normalization
pub type RawRow = Vec<CellValue>;

/// A forward-only source of rows
///
/// The header is resolved once when the source is opened and never changes
/// afterwards. Implementors include:
/// - Delimited text read line by line
/// - One sheet of a workbook
///
/// # Example
/// ```
/// use tabular_ingest::etl::{RawRow, RowSource};
/// use tabular_ingest::{CellValue, Header, Result};
///
/// struct Fixed {
///     header: Header,
///     rows: std::vec::IntoIter<RawRow>,
/// }
///
/// impl RowSource for Fixed {
///     fn header(&self) -> &Header {
///         &self.header
///     }
///
///     fn next_row(&mut self) -> Result<Option<RawRow>> {
///         Ok(self.rows.next())
///     }
/// }
///
/// let mut source = Fixed {
///     header: Header::positional(1),
///     rows: vec![vec![CellValue::from("a")]].into_iter(),
/// };
/// assert!(source.next_row().unwrap().is_some());
/// assert!(source.next_row().unwrap().is_none());
/// ```
pub trait RowSource {
    /// Columns resolved at open time
    fn header(&self) -> &Header;

    /// Read the next row, or `None` once the source is exhausted
    ///
    /// # Errors
    /// Returns an error if the underlying stream or workbook cannot be read
    fn next_row(&mut self) -> Result<Option<RawRow>>;
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn header(&self) -> &Header {
        (**self).header()
    }

    fn next_row(&mut self) -> Result<Option<RawRow>> {
        (**self).next_row()
    }
}
