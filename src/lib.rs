//! Tabular Ingest
//!
//! Reads comma-delimited text and spreadsheet workbooks into either a lazy
//! sequence of typed records or a materialized set of untyped tables.

pub mod cell;
pub mod coerce;
pub mod config;
pub mod error;
pub mod etl;
pub mod header;
pub mod row;
pub mod service;
pub mod table;
pub mod text;
pub mod workbook;

// Re-exports for convenience
pub use cell::CellValue;
pub use coerce::{RecordCoercer, Records};
pub use config::ExtractConfig;
pub use error::{IngestError, Result};
pub use etl::{Bounded, RowSource, Transformer};
pub use header::{Column, Header};
pub use row::NormalizedRow;
pub use service::{AnySource, FileRecords, FileService, SheetRecords, SourceKind};
pub use table::{Table, TableBuilder, TableSet};
pub use text::tokenize;
pub use workbook::WorkbookFormat;
