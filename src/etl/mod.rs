//! Core row pipeline abstractions
//!
//! This module provides the traits that every source kind plugs into:
//! a [`RowSource`] produces raw rows against a resolved header, [`Bounded`]
//! caps how many of those rows are read, and a [`Transformer`] turns one
//! item into the next stage's item.

mod bounded;
mod source;
mod transform;

pub use bounded::Bounded;
pub use source::{RawRow, RowSource};
pub use transform::Transformer;
