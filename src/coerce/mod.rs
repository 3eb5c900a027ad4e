//! Typed record coercion
//!
//! This is the only stage where type information enters. A normalized row is
//! handed to the target type's `Deserialize` impl through [`RowDeserializer`];
//! field names are matched exactly against column names, the way serde
//! matches them, so `#[serde(rename = "...")]` and `#[serde(alias = "...")]`
//! adapt headers that are not valid Rust identifiers.

mod de;
mod records;

pub use de::{CellDeserializer, DeError, RowDeserializer};
pub use records::Records;

use crate::error::{IngestError, Result};
use crate::etl::Transformer;
use crate::row::NormalizedRow;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Transformer from a normalized row into `T`
///
/// Either a whole `T` is produced or the row is rejected with
/// `IngestError::Coercion`, carrying the row's JSON form.
///
/// # Example
/// ```
/// use serde::Deserialize;
/// use tabular_ingest::etl::Transformer;
/// use tabular_ingest::{CellValue, Header, RecordCoercer, row::normalize};
///
/// #[derive(Deserialize)]
/// struct Person {
///     id: i64,
///     name: Option<String>,
/// }
///
/// let header = Header::resolve(&[CellValue::from("id"), CellValue::from("name")], false);
/// let row = normalize(vec![CellValue::from("2"), CellValue::from("")], &header);
///
/// let person: Person = RecordCoercer::new().transform(row).unwrap();
/// assert_eq!(person.id, 2);
/// assert!(person.name.is_none());
/// ```
pub struct RecordCoercer<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Default for RecordCoercer<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> RecordCoercer<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: DeserializeOwned> RecordCoercer<T> {
    pub fn coerce(&self, row: &NormalizedRow) -> Result<T> {
        T::deserialize(RowDeserializer::new(row))
            .map_err(|e| IngestError::coercion(row.to_json(), e.to_string()))
    }
}

impl<T: DeserializeOwned> Transformer for RecordCoercer<T> {
    type Input = NormalizedRow;
    type Output = T;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.coerce(&input)
    }
}
