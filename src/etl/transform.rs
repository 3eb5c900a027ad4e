//! Transformer trait for per-row conversion

use crate::error::Result;

/// Transformer trait for converting one row representation into another
///
/// Implementors in this crate:
/// - Row normalization (raw cells to named, null-normalized cells)
/// - Record coercion (normalized row to a caller-defined type)
///
/// # Example
/// ```
/// use tabular_ingest::etl::Transformer;
/// use tabular_ingest::{CellValue, Result};
///
/// struct Upper;
///
/// impl Transformer for Upper {
///     type Input = CellValue;
///     type Output = CellValue;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(match input {
///             CellValue::Text(s) => CellValue::Text(s.to_uppercase()),
///             other => other,
///         })
///     }
/// }
///
/// let out = Upper.transform(CellValue::from("abc")).unwrap();
/// assert_eq!(out, CellValue::from("ABC"));
/// ```
pub trait Transformer {
    /// Input item type
    type Input;

    /// Output item type after transformation
    type Output;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if the item cannot be converted
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items, stopping at the first failure
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}
