//! Row normalization
//!
//! Zips a raw source row onto the resolved header. Each column takes the cell
//! at its ordinal; missing cells become null, cells past the header are
//! dropped, and blank text becomes null so "empty" reads as "missing".

use crate::cell::CellValue;
use crate::error::Result;
use crate::etl::{RawRow, Transformer};
use crate::header::Header;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered column-name to cell mapping
///
/// Every row from one source carries the same names in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    entries: Vec<(String, CellValue)>,
}

impl NormalizedRow {
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object form, used in diagnostics
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self.entries))
    }
}

impl FromIterator<(String, CellValue)> for NormalizedRow {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for NormalizedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Build a normalized row from raw cells
pub fn normalize(mut raw: RawRow, header: &Header) -> NormalizedRow {
    header
        .columns()
        .iter()
        .map(|column| {
            let value = raw
                .get_mut(column.ordinal)
                .map(std::mem::take)
                .unwrap_or_default();
            (column.name.clone(), value.normalized())
        })
        .collect()
}

/// Transformer that applies [`normalize`] against a fixed header
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    header: Header,
}

impl RowNormalizer {
    pub fn new(header: Header) -> Self {
        Self { header }
    }
}

impl Transformer for RowNormalizer {
    type Input = RawRow;
    type Output = NormalizedRow;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(normalize(input, &self.header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Header {
        let cells: Vec<CellValue> = names.iter().map(|n| CellValue::from(*n)).collect();
        Header::resolve(&cells, false)
    }

    #[test]
    fn test_short_rows_pad_with_null() {
        let row = normalize(vec!["1".into()], &header(&["id", "name", "age"]));

        assert_eq!(row.keys().collect::<Vec<_>>(), ["id", "name", "age"]);
        assert_eq!(row.get("id"), Some(&CellValue::from("1")));
        assert_eq!(row.get("name"), Some(&CellValue::Null));
        assert_eq!(row.get("age"), Some(&CellValue::Null));
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let row = normalize(
            vec!["1".into(), "Alice".into(), "extra".into()],
            &header(&["id", "name"]),
        );
        assert_eq!(row.len(), 2);
        assert!(row.get("C2").is_none());
    }

    #[test]
    fn test_blank_text_becomes_null() {
        let row = normalize(vec!["  ".into(), " Bob ".into()], &header(&["a", "b"]));
        assert_eq!(row.get("a"), Some(&CellValue::Null));
        assert_eq!(row.get("b"), Some(&CellValue::from(" Bob ")));
    }

    #[test]
    fn test_ordinals_follow_skipped_header_cells() {
        let cells = vec![CellValue::from("id"), CellValue::Null, CellValue::from("name")];
        let header = Header::resolve(&cells, true);
        let row = normalize(
            vec![CellValue::Number(7.0), "ignored".into(), "Ann".into()],
            &header,
        );

        assert_eq!(row.get("id"), Some(&CellValue::Number(7.0)));
        assert_eq!(row.get("name"), Some(&CellValue::from("Ann")));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row = normalize(vec!["2".into(), "".into()], &header(&["id", "name"]));
        assert_eq!(row.to_json(), r#"{"id":"2","name":null}"#);
    }

    #[test]
    fn test_normalizer_transformer() {
        let normalizer = RowNormalizer::new(header(&["x"]));
        let rows = normalizer
            .transform_many(vec![vec!["1".into()], vec![]])
            .unwrap();
        assert_eq!(rows[0].get("x"), Some(&CellValue::from("1")));
        assert_eq!(rows[1].get("x"), Some(&CellValue::Null));
    }
}
