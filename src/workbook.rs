//! Spreadsheet workbook input
//!
//! Container decoding is left to `calamine`. This module picks a sheet,
//! resolves its header and hands rows out one at a time as [`CellValue`]s.
//!
//! calamine materializes a whole sheet range when it is opened, so the
//! workbook is read one sheet at a time and rows are yielded lazily from that
//! range.

use crate::cell::CellValue;
use crate::error::{IngestError, Result};
use crate::etl::{RawRow, RowSource};
use crate::header::Header;
use calamine::{Data, Range, Reader, Sheets, Xls, Xlsx};
use chrono::{NaiveDateTime, NaiveTime};
use std::io::{Read, Seek};

/// Workbook container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Xls,
}

impl WorkbookFormat {
    /// Match a lowercase extension without the leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }
}

/// An open workbook whose sheets can be read one by one
pub struct Workbook<RS> {
    sheets: Sheets<RS>,
}

impl<RS: Read + Seek> Workbook<RS> {
    pub fn open(reader: RS, format: WorkbookFormat) -> Result<Self> {
        let sheets = match format {
            WorkbookFormat::Xlsx => Sheets::Xlsx(Xlsx::new(reader).map_err(calamine::Error::Xlsx)?),
            WorkbookFormat::Xls => Sheets::Xls(Xls::new(reader).map_err(calamine::Error::Xls)?),
        };

        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Load one sheet as a row source
    ///
    /// `None` (or an empty name) selects the first sheet.
    ///
    /// # Errors
    /// `SheetNotFound` if the name does not exist or the workbook has no
    /// sheets; `Workbook` if calamine cannot read the sheet.
    pub fn sheet(&mut self, name: Option<&str>, use_header_row: bool) -> Result<WorkbookSource> {
        let names = self.sheets.sheet_names();
        let name = match name.filter(|n| !n.is_empty()) {
            Some(requested) => names
                .into_iter()
                .find(|n| n == requested)
                .ok_or_else(|| IngestError::SheetNotFound(requested.to_string()))?,
            None => names
                .into_iter()
                .next()
                .ok_or_else(|| IngestError::SheetNotFound("workbook has no sheets".to_string()))?,
        };

        log::debug!("Loading sheet '{}'", name);
        let range = self.sheets.worksheet_range(&name)?;
        Ok(WorkbookSource::new(name, range, use_header_row))
    }
}

/// Rows of one workbook sheet
pub struct WorkbookSource {
    sheet: String,
    range: Range<Data>,
    header: Header,
    next: usize,
}

impl WorkbookSource {
    pub fn new(sheet: String, range: Range<Data>, use_header_row: bool) -> Self {
        let (header, next) = if !use_header_row {
            (Header::positional(range.width()), 0)
        } else if range.height() == 0 {
            (Header::empty(), 0)
        } else {
            (Header::resolve(&row_cells(&range, 0), true), 1)
        };

        log::debug!(
            "Sheet '{}' has {} rows x {} columns, {} named",
            sheet,
            range.height(),
            range.width(),
            header.len()
        );

        Self {
            sheet,
            range,
            header,
            next,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }
}

impl RowSource for WorkbookSource {
    fn header(&self) -> &Header {
        &self.header
    }

    fn next_row(&mut self) -> Result<Option<RawRow>> {
        if self.next >= self.range.height() {
            return Ok(None);
        }
        let row = row_cells(&self.range, self.next);
        self.next += 1;
        Ok(Some(row))
    }
}

fn row_cells(range: &Range<Data>, row: usize) -> RawRow {
    (0..range.width())
        .map(|col| range.get((row, col)).map(cell_value).unwrap_or_default())
        .collect()
}

/// Convert a calamine cell
///
/// Dates become ISO-8601 text so string-backed date types can parse them;
/// error cells keep their display text.
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(datetime) => CellValue::Text(iso_datetime(&datetime)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn iso_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
