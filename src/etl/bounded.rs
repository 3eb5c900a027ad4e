//! Row-count limiting wrapper

use super::source::{RawRow, RowSource};
use crate::error::Result;
use crate::header::Header;

/// Caps a [`RowSource`] at `limit` rows
///
/// A limit of 0 means unbounded. Once the limit is reached the wrapper
/// reports the end of the source without issuing another read, so whatever
/// follows in the underlying stream is never touched.
///
/// `Bounded` is itself a `RowSource` and also an `Iterator` over
/// `Result<RawRow>`.
pub struct Bounded<S> {
    inner: S,
    limit: usize,
    produced: usize,
}

impl<S: RowSource> Bounded<S> {
    pub fn new(inner: S, limit: usize) -> Self {
        Self {
            inner,
            limit,
            produced: 0,
        }
    }

    pub fn unbounded(inner: S) -> Self {
        Self::new(inner, 0)
    }

    /// Rows handed out so far
    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn limit_reached(&self) -> bool {
        self.limit > 0 && self.produced >= self.limit
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<S: RowSource> RowSource for Bounded<S> {
    fn header(&self) -> &Header {
        self.inner.header()
    }

    fn next_row(&mut self) -> Result<Option<RawRow>> {
        if self.limit_reached() {
            return Ok(None);
        }

        let row = self.inner.next_row()?;
        if row.is_some() {
            self.produced += 1;
            if self.limit_reached() {
                log::debug!("Row limit of {} reached, stopping extraction", self.limit);
            }
        }
        Ok(row)
    }
}

impl<S: RowSource> Iterator for Bounded<S> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    /// Counts reads so tests can check nothing past the limit is pulled
    struct Counting {
        header: Header,
        total: usize,
        reads: usize,
    }

    impl Counting {
        fn new(total: usize) -> Self {
            Self {
                header: Header::positional(1),
                total,
                reads: 0,
            }
        }
    }

    impl RowSource for Counting {
        fn header(&self) -> &Header {
            &self.header
        }

        fn next_row(&mut self) -> Result<Option<RawRow>> {
            if self.reads == self.total {
                return Ok(None);
            }
            self.reads += 1;
            Ok(Some(vec![CellValue::from(self.reads as i64)]))
        }
    }

    #[test]
    fn test_limit_truncates_in_order() {
        let rows: Vec<RawRow> = Bounded::new(Counting::new(10), 3)
            .collect::<Result<_>>()
            .unwrap();
        let unbounded: Vec<RawRow> = Bounded::unbounded(Counting::new(10))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[..], unbounded[..3]);
    }

    #[test]
    fn test_limit_does_not_read_past_cutoff() {
        let mut bounded = Bounded::new(Counting::new(10), 4);
        while bounded.next_row().unwrap().is_some() {}

        assert_eq!(bounded.produced(), 4);
        assert_eq!(bounded.get_ref().reads, 4);
        assert!(bounded.limit_reached());
    }

    #[test]
    fn test_zero_limit_reads_everything() {
        let bounded = Bounded::new(Counting::new(7), 0);
        assert_eq!(bounded.count(), 7);
    }

    #[test]
    fn test_limit_larger_than_source() {
        let mut bounded = Bounded::new(Counting::new(2), 5);
        assert_eq!(bounded.by_ref().count(), 2);
        assert!(!bounded.limit_reached());
    }
}
