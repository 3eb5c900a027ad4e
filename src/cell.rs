//! Cell values shared by every source kind

use serde::{Serialize, Serializer};
use std::fmt;

/// A single cell as produced by a row source
///
/// Text sources only ever produce `Text` (or `Null` after normalization).
/// Workbook sources may carry native numbers and booleans.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Null,
}

impl CellValue {
    /// Null, or text made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whole numbers that fit an `i64` without loss
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) => integral(*n),
            _ => None,
        }
    }

    /// Blank text becomes `Null`; everything else is kept verbatim
    pub fn normalized(self) -> Self {
        if self.is_blank() { CellValue::Null } else { self }
    }
}

pub(crate) fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Null => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_normalizes_to_null() {
        assert_eq!(CellValue::from("   ").normalized(), CellValue::Null);
        assert_eq!(CellValue::from("").normalized(), CellValue::Null);
        assert_eq!(CellValue::from(" a ").normalized(), CellValue::from(" a "));
        assert_eq!(CellValue::Number(0.0).normalized(), CellValue::Number(0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_serialize_whole_numbers_as_integers() {
        let cells = vec![
            CellValue::Number(1.0),
            CellValue::Number(1.5),
            CellValue::from("x"),
            CellValue::Null,
            CellValue::Bool(false),
        ];
        assert_eq!(
            serde_json::to_value(&cells).unwrap(),
            json!([1, 1.5, "x", null, false])
        );
    }

    #[test]
    fn test_as_i64_rejects_fractions() {
        assert_eq!(CellValue::Number(42.0).as_i64(), Some(42));
        assert_eq!(CellValue::Number(42.5).as_i64(), None);
        assert_eq!(CellValue::from("42").as_i64(), None);
    }
}
