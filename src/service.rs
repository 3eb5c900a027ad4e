//! Extraction entry points
//!
//! [`FileService`] dispatches on the file extension and offers the two output
//! modes as separate calls:
//!
//! - [`FileService::records`] gives a lazy, finite, forward-only sequence of
//!   typed records. A header-only source is simply an empty sequence.
//! - [`FileService::tables`] reads everything (up to the row limit) into a
//!   [`TableSet`]. A header-only source is an `EmptyTable` error.
//!
//! Both have an all-sheets variant for workbooks, where every sheet brings
//! its own header and its own row limit.
//!
//! The caller owns the stream. Each call seeks it back to the start, and the
//! engine never closes it.

use crate::coerce::Records;
use crate::config::ExtractConfig;
use crate::error::{IngestError, Result};
use crate::etl::{Bounded, RawRow, RowSource};
use crate::header::Header;
use crate::table::{Table, TableSet};
use crate::text::TextSource;
use crate::workbook::{Workbook, WorkbookFormat, WorkbookSource};
use serde::de::DeserializeOwned;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::iter::FusedIterator;
use std::path::Path;

/// Source kind picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Workbook(WorkbookFormat),
}

impl SourceKind {
    /// `.csv`/`.txt` are text; `.xlsx`/`.xls` are workbooks
    ///
    /// # Errors
    /// `UnsupportedFormat` for any other (or missing) extension.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Text),
            other => WorkbookFormat::from_extension(other)
                .map(Self::Workbook)
                .ok_or_else(|| {
                    IngestError::UnsupportedFormat(format!("File type not supported: {}", filename))
                }),
        }
    }
}

/// A row source of either kind, opened against a caller-owned stream
pub enum AnySource<'r, R> {
    Text(TextSource<BufReader<&'r mut R>>),
    Workbook(WorkbookSource),
}

impl<R: Read> RowSource for AnySource<'_, R> {
    fn header(&self) -> &Header {
        match self {
            AnySource::Text(source) => source.header(),
            AnySource::Workbook(source) => source.header(),
        }
    }

    fn next_row(&mut self) -> Result<Option<RawRow>> {
        match self {
            AnySource::Text(source) => source.next_row(),
            AnySource::Workbook(source) => source.next_row(),
        }
    }
}

/// Lazy typed records read from a caller-owned stream
pub type FileRecords<'r, T, R> = Records<T, AnySource<'r, R>>;

/// Lazy typed records chained across every sheet of a workbook
///
/// Sheets are loaded one at a time, only once the previous sheet is
/// exhausted. Like [`Records`], the first error ends the sequence.
pub struct SheetRecords<'r, T, R> {
    workbook: Option<Workbook<&'r mut R>>,
    pending: std::vec::IntoIter<String>,
    current: Option<FileRecords<'r, T, R>>,
    use_header_row: bool,
    limit: usize,
}

impl<T, R> SheetRecords<'_, T, R> {
    fn finish(&mut self) {
        self.workbook = None;
        self.current = None;
        self.pending = Vec::new().into_iter();
    }
}

impl<T: DeserializeOwned, R: Read + Seek> Iterator for SheetRecords<'_, T, R> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(records) = &mut self.current {
                match records.next() {
                    Some(Ok(record)) => return Some(Ok(record)),
                    Some(Err(e)) => {
                        self.finish();
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
            }

            let name = self.pending.next()?;
            let workbook = self.workbook.as_mut()?;
            match workbook.sheet(Some(&name), self.use_header_row) {
                Ok(source) => {
                    let rows = Bounded::new(AnySource::Workbook(source), self.limit);
                    self.current = Some(Records::new(rows));
                }
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T: DeserializeOwned, R: Read + Seek> FusedIterator for SheetRecords<'_, T, R> {}

/// Parses files into typed records or tables under one configuration
#[derive(Debug, Clone, Default)]
pub struct FileService {
    config: ExtractConfig,
}

impl FileService {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Open the stream as a bounded row source
    ///
    /// The header is resolved here, before any data row is read.
    pub fn open<'r, R: Read + Seek>(
        &self,
        stream: &'r mut R,
        filename: &str,
        use_header_row: bool,
        sheet_name: Option<&str>,
    ) -> Result<Bounded<AnySource<'r, R>>> {
        let kind = SourceKind::from_filename(filename)?;
        log::info!(
            "Opening {} as {:?} (header row: {}, limit: {})",
            filename,
            kind,
            use_header_row,
            self.config.limit
        );

        stream.seek(SeekFrom::Start(0))?;
        let source = match kind {
            SourceKind::Text => {
                if let Some(sheet) = sheet_name.filter(|s| !s.is_empty()) {
                    log::debug!("Ignoring sheet '{}' for text source {}", sheet, filename);
                }
                AnySource::Text(TextSource::open(BufReader::new(stream), use_header_row)?)
            }
            SourceKind::Workbook(format) => {
                let mut workbook = Workbook::open(&mut *stream, format)?;
                AnySource::Workbook(workbook.sheet(sheet_name, use_header_row)?)
            }
        };

        Ok(Bounded::new(source, self.config.limit))
    }

    /// Parse the stream into a lazy sequence of `T`
    ///
    /// Fails up front for unsupported extensions, unreadable workbooks and
    /// unknown sheets. Rows that cannot become a `T` fail one at a time as the
    /// sequence is consumed, ending it.
    ///
    /// # Example
    /// ```
    /// use serde::Deserialize;
    /// use std::io::Cursor;
    /// use tabular_ingest::FileService;
    ///
    /// #[derive(Deserialize)]
    /// struct Person {
    ///     id: i64,
    ///     name: Option<String>,
    /// }
    ///
    /// let mut stream = Cursor::new("id,name\n1,Alice\n2,\n");
    /// let people = FileService::default()
    ///     .records::<Person, _>(&mut stream, "people.csv", true, None)
    ///     .unwrap()
    ///     .collect::<Result<Vec<_>, _>>()
    ///     .unwrap();
    ///
    /// assert_eq!(people.len(), 2);
    /// assert_eq!(people[1].id, 2);
    /// assert!(people[1].name.is_none());
    /// ```
    pub fn records<'r, T, R>(
        &self,
        stream: &'r mut R,
        filename: &str,
        use_header_row: bool,
        sheet_name: Option<&str>,
    ) -> Result<FileRecords<'r, T, R>>
    where
        T: DeserializeOwned,
        R: Read + Seek,
    {
        let rows = self.open(stream, filename, use_header_row, sheet_name)?;
        Ok(Records::new(rows))
    }

    /// Parse every sheet of a workbook into one lazy sequence of `T`
    ///
    /// Each sheet resolves its own header, and the row limit applies to each
    /// sheet separately. Empty sheets contribute nothing. Text sources behave
    /// as in [`FileService::records`].
    pub fn records_all_sheets<'r, T, R>(
        &self,
        stream: &'r mut R,
        filename: &str,
        use_header_row: bool,
    ) -> Result<SheetRecords<'r, T, R>>
    where
        T: DeserializeOwned,
        R: Read + Seek,
    {
        let format = match SourceKind::from_filename(filename)? {
            SourceKind::Text => {
                let records = self.records(stream, filename, use_header_row, None)?;
                return Ok(SheetRecords {
                    workbook: None,
                    pending: Vec::new().into_iter(),
                    current: Some(records),
                    use_header_row,
                    limit: self.config.limit,
                });
            }
            SourceKind::Workbook(format) => format,
        };

        stream.seek(SeekFrom::Start(0))?;
        let workbook = Workbook::open(stream, format)?;
        let names = workbook.sheet_names();
        log::info!(
            "Reading records from {} sheet(s) of {} (limit per sheet: {})",
            names.len(),
            filename,
            self.config.limit
        );

        Ok(SheetRecords {
            workbook: Some(workbook),
            pending: names.into_iter(),
            current: None,
            use_header_row,
            limit: self.config.limit,
        })
    }

    /// Parse the stream into a single-table [`TableSet`]
    ///
    /// Workbook tables are named after their sheet, text tables after the
    /// file stem.
    pub fn tables<R: Read + Seek>(
        &self,
        stream: &mut R,
        filename: &str,
        use_header_row: bool,
        sheet_name: Option<&str>,
    ) -> Result<TableSet> {
        let rows = self.open(stream, filename, use_header_row, sheet_name)?;
        let name = match rows.get_ref() {
            AnySource::Text(_) => text_table_name(filename),
            AnySource::Workbook(source) => source.sheet_name().to_string(),
        };

        let table = Table::collect(name, rows)?;
        Ok(TableSet::from(vec![table]))
    }

    /// Parse every sheet of a workbook, one table per sheet
    ///
    /// Sheets without data rows are skipped; if none has data the call fails
    /// with `EmptyTable`. Text sources behave as in [`FileService::tables`].
    pub fn tables_all_sheets<R: Read + Seek>(
        &self,
        stream: &mut R,
        filename: &str,
        use_header_row: bool,
    ) -> Result<TableSet> {
        let format = match SourceKind::from_filename(filename)? {
            SourceKind::Text => return self.tables(stream, filename, use_header_row, None),
            SourceKind::Workbook(format) => format,
        };

        stream.seek(SeekFrom::Start(0))?;
        let mut workbook = Workbook::open(stream, format)?;
        let mut set = TableSet::new();

        for name in workbook.sheet_names() {
            let source = workbook.sheet(Some(&name), use_header_row)?;
            match Table::collect(name, Bounded::new(source, self.config.limit)) {
                Ok(table) => set.push(table),
                Err(IngestError::EmptyTable(sheet)) => {
                    log::warn!("Skipping sheet '{}' in {}: no data rows", sheet, filename);
                }
                Err(e) => return Err(e),
            }
        }

        if set.is_empty() {
            return Err(IngestError::EmptyTable(filename.to_string()));
        }

        log::info!("Parsed {} sheet(s) from {}", set.len(), filename);
        Ok(set)
    }
}

fn text_table_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        id: i64,
        name: Option<String>,
    }

    const PEOPLE: &str = "id,name\n1,Alice\n2,\n";

    #[test]
    fn test_source_kind_dispatch() {
        assert_eq!(SourceKind::from_filename("a.csv").unwrap(), SourceKind::Text);
        assert_eq!(SourceKind::from_filename("A.TXT").unwrap(), SourceKind::Text);
        assert_eq!(
            SourceKind::from_filename("book.XLSX").unwrap(),
            SourceKind::Workbook(WorkbookFormat::Xlsx)
        );
        assert_eq!(
            SourceKind::from_filename("old.xls").unwrap(),
            SourceKind::Workbook(WorkbookFormat::Xls)
        );
        assert!(matches!(
            SourceKind::from_filename("data.json"),
            Err(IngestError::UnsupportedFormat(_))
        ));
        for rejected in ["no_extension", "data.ods", "macro.xlsm", "binary.xlsb"] {
            assert!(
                matches!(
                    SourceKind::from_filename(rejected),
                    Err(IngestError::UnsupportedFormat(_))
                ),
                "{rejected} should be rejected"
            );
        }
    }

    #[test]
    fn test_records_end_to_end() {
        let mut stream = Cursor::new(PEOPLE);
        let people: Vec<Person> = FileService::default()
            .records(&mut stream, "people.csv", true, None)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            people,
            [
                Person { id: 1, name: Some("Alice".to_string()) },
                Person { id: 2, name: None },
            ]
        );
    }

    #[test]
    fn test_tables_end_to_end() {
        let mut stream = Cursor::new(PEOPLE);
        let set = FileService::default()
            .tables(&mut stream, "people.csv", true, None)
            .unwrap();

        let table = set.table("people").unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["id", "name"]);
        assert_eq!(
            table.rows,
            vec![
                vec![CellValue::from("1"), CellValue::from("Alice")],
                vec![CellValue::from("2"), CellValue::Null],
            ]
        );
    }

    #[test]
    fn test_unsupported_format_before_reading() {
        let mut stream = Cursor::new(PEOPLE);
        {
            let result =
                FileService::default().records::<Person, _>(&mut stream, "people.pdf", true, None);
            assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
        }
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_stream_is_rewound() {
        let mut stream = Cursor::new(PEOPLE);
        stream.set_position(5);
        let set = FileService::default()
            .tables(&mut stream, "people.csv", true, None)
            .unwrap();
        assert_eq!(set.first().unwrap().row_count(), 2);
    }

    #[test]
    fn test_all_sheet_records_fall_back_for_text() {
        let mut stream = Cursor::new(PEOPLE);
        let people = FileService::new(ExtractConfig::new(1))
            .records_all_sheets::<Person, _>(&mut stream, "people.csv", true)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(people, [Person { id: 1, name: Some("Alice".to_string()) }]);
    }

    #[test]
    fn test_text_table_name() {
        assert_eq!(text_table_name("dir/people.csv"), "people");
        assert_eq!(text_table_name("notes.txt"), "notes");
    }
}
