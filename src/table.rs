//! Materialized tables
//!
//! The table path reads a source to the end (or to the row limit) and keeps
//! every row. Unlike the record path it tolerates ragged input: a row wider
//! than the current columns appends positional `C{n}` columns and back-fills
//! earlier rows with nulls, so every stored row is exactly as wide as the
//! column list. A table that ends up with no rows is an error.

use crate::cell::CellValue;
use crate::error::{IngestError, Result};
use crate::etl::{RawRow, RowSource};
use crate::header::{Column, Header};
use serde::Serialize;

/// A named grid of untyped cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell at `row` under the named column
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Drain a row source into a table
    ///
    /// # Errors
    /// Read errors from the source, or `EmptyTable` if it yields no rows.
    pub fn collect<S: RowSource>(name: impl Into<String>, mut source: S) -> Result<Table> {
        let mut builder = TableBuilder::new(name, source.header().clone());
        while let Some(raw) = source.next_row()? {
            builder.push(raw);
        }
        builder.finish()
    }
}

/// Accumulates raw rows into a [`Table`]
pub struct TableBuilder {
    name: String,
    header: Header,
    rows: Vec<Vec<CellValue>>,
}

impl TableBuilder {
    pub fn new(name: impl Into<String>, header: Header) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, mut raw: RawRow) {
        if raw.len() > self.header.width() {
            let added = raw.len() - self.header.width();
            for ordinal in self.header.width()..raw.len() {
                self.header.push_overflow(ordinal);
            }
            let width = self.header.len();
            for row in &mut self.rows {
                row.resize(width, CellValue::Null);
            }
            log::debug!(
                "Table '{}' grew by {} column(s) at row {}",
                self.name,
                added,
                self.rows.len() + 1
            );
        }

        let row = self
            .header
            .columns()
            .iter()
            .map(|column| {
                raw.get_mut(column.ordinal)
                    .map(std::mem::take)
                    .unwrap_or_default()
                    .normalized()
            })
            .collect();
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn finish(self) -> Result<Table> {
        if self.rows.is_empty() {
            return Err(IngestError::EmptyTable(self.name));
        }

        log::info!(
            "Built table '{}' with {} rows and {} columns",
            self.name,
            self.rows.len(),
            self.header.len()
        );

        Ok(Table {
            name: self.name,
            columns: self.header.columns().to_vec(),
            rows: self.rows,
        })
    }
}

/// Ordered collection of tables, one per parsed sheet or text file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSet {
    tables: Vec<Table>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn first(&self) -> Option<&Table> {
        self.tables.first()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl From<Vec<Table>> for TableSet {
    fn from(tables: Vec<Table>) -> Self {
        Self { tables }
    }
}

impl IntoIterator for TableSet {
    type Item = Table;
    type IntoIter = std::vec::IntoIter<Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}
