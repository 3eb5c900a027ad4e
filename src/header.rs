//! Header resolution
//!
//! Maps a header row, or bare positions when a source has no header row, to
//! a fixed list of [`Column`]s. Names are unique within one header: repeats
//! get `_1`, `_2`, ... appended, scanning upward until an unused name turns
//! up. The outcome depends only on the sequence of raw names.

use crate::cell::CellValue;
use serde::Serialize;
use std::collections::HashSet;

/// Identity of one column: where it sits in a raw source row and what it is called
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub ordinal: usize,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Header {
    columns: Vec<Column>,
    taken: HashSet<String>,
    /// Raw source width, including cells skipped for blank names
    width: usize,
}

impl Header {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve a header row into columns
    ///
    /// With `skip_blank` set (workbook headers) null or blank cells produce no
    /// column; the remaining columns keep the ordinal of their source cell.
    /// Text headers pass `false` so every split field becomes a column.
    ///
    /// # Example
    /// ```
    /// use tabular_ingest::{CellValue, Header};
    ///
    /// let cells: Vec<CellValue> = vec!["x".into(), "x".into(), "x".into()];
    /// let header = Header::resolve(&cells, false);
    /// assert_eq!(header.names().collect::<Vec<_>>(), ["x", "x_1", "x_2"]);
    /// ```
    pub fn resolve(cells: &[CellValue], skip_blank: bool) -> Self {
        let mut header = Self {
            width: cells.len(),
            ..Self::default()
        };

        for (ordinal, cell) in cells.iter().enumerate() {
            if skip_blank && cell.is_blank() {
                log::debug!("Skipping blank header cell at position {}", ordinal);
                continue;
            }
            header.push(ordinal, &cell.to_string());
        }

        header
    }

    /// Columns named after their zero-based position: `"0"`, `"1"`, ...
    pub fn positional(width: usize) -> Self {
        let mut header = Self {
            width,
            ..Self::default()
        };
        for ordinal in 0..width {
            header.push(ordinal, &ordinal.to_string());
        }
        header
    }

    /// Append a column for a value found past the current source width
    ///
    /// Overflow columns are named `C{ordinal}` and go through the same
    /// uniqueness rule as header names.
    pub fn push_overflow(&mut self, ordinal: usize) -> &Column {
        let name = format!("C{}", ordinal);
        self.width = self.width.max(ordinal + 1);
        self.push(ordinal, &name)
    }

    fn push(&mut self, ordinal: usize, name: &str) -> &Column {
        let name = self.unique_name(name);
        self.taken.insert(name.clone());
        self.columns.push(Column { ordinal, name });
        &self.columns[self.columns.len() - 1]
    }

    fn unique_name(&self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while self.taken.contains(&candidate) {
            candidate = format!("{}_{}", name, suffix);
            suffix += 1;
        }
        candidate
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Index of the named column within `columns()`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(names: &[&str]) -> Vec<CellValue> {
        names.iter().map(|n| CellValue::from(*n)).collect()
    }

    #[test]
    fn test_duplicates_get_suffixes() {
        let header = Header::resolve(&cells(&["x", "x", "x"]), false);
        assert_eq!(header.names().collect::<Vec<_>>(), ["x", "x_1", "x_2"]);
    }

    #[test]
    fn test_suffix_skips_names_already_taken() {
        let header = Header::resolve(&cells(&["x", "x_1", "x"]), false);
        assert_eq!(header.names().collect::<Vec<_>>(), ["x", "x_1", "x_2"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let raw = cells(&["a", "b", "a", "", ""]);
        let first: Vec<String> = Header::resolve(&raw, false).names().map(String::from).collect();
        let second: Vec<String> = Header::resolve(&raw, false).names().map(String::from).collect();
        assert_eq!(first, second);
        assert_eq!(first, ["a", "b", "a_1", "", "_1"]);
    }

    #[test]
    fn test_workbook_header_skips_blank_cells() {
        let raw = vec![
            CellValue::from("id"),
            CellValue::Null,
            CellValue::from("  "),
            CellValue::Number(2024.0),
        ];
        let header = Header::resolve(&raw, true);

        assert_eq!(header.names().collect::<Vec<_>>(), ["id", "2024"]);
        assert_eq!(header.columns()[1].ordinal, 3);
        assert_eq!(header.width(), 4);
    }

    #[test]
    fn test_positional_names() {
        let header = Header::positional(3);
        assert_eq!(header.names().collect::<Vec<_>>(), ["0", "1", "2"]);
        assert_eq!(header.position("2"), Some(2));
    }

    #[test]
    fn test_overflow_columns() {
        let mut header = Header::resolve(&cells(&["a", "C2"]), false);
        let column = header.push_overflow(2).clone();

        assert_eq!(column, Column { ordinal: 2, name: "C2_1".to_string() });
        assert_eq!(header.width(), 3);
        assert_eq!(header.len(), 3);
    }
}
