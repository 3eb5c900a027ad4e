//! Lazy sequence of typed records

use super::RecordCoercer;
use crate::error::Result;
use crate::etl::{Bounded, RowSource, Transformer};
use crate::row::RowNormalizer;
use serde::de::DeserializeOwned;
use std::iter::FusedIterator;

/// Pull-based iterator of typed records over a bounded row source
///
/// Each call to `next` reads exactly one source row, normalizes it and
/// coerces it. The first error (a read failure or a row that does not fit
/// `T`) is yielded once and ends the sequence; records yielded before it stay
/// valid. Dropping the iterator early releases the borrowed stream.
pub struct Records<T, S> {
    rows: Bounded<S>,
    normalizer: RowNormalizer,
    coercer: RecordCoercer<T>,
    yielded: usize,
    done: bool,
}

impl<T, S: RowSource> Records<T, S> {
    pub fn new(rows: Bounded<S>) -> Self {
        let normalizer = RowNormalizer::new(rows.header().clone());
        Self {
            rows,
            normalizer,
            coercer: RecordCoercer::new(),
            yielded: 0,
            done: false,
        }
    }

    /// Records successfully produced so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn finish(&mut self) {
        self.done = true;
        log::debug!("Record sequence ended after {} record(s)", self.yielded);
    }
}

impl<T: DeserializeOwned, S: RowSource> Iterator for Records<T, S> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let raw = match self.rows.next_row() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.finish();
                return None;
            }
            Err(e) => {
                self.finish();
                return Some(Err(e));
            }
        };

        let result = self
            .normalizer
            .transform(raw)
            .and_then(|row| self.coercer.transform(row));

        match result {
            Ok(record) => {
                self.yielded += 1;
                Some(Ok(record))
            }
            Err(e) => {
                log::debug!("Row {} failed coercion: {}", self.yielded + 1, e);
                self.finish();
                Some(Err(e))
            }
        }
    }
}

impl<T: DeserializeOwned, S: RowSource> FusedIterator for Records<T, S> {}
