//! Delimited text input
//!
//! Only the comma-delimited, double-quote-escaped dialect is supported.

mod source;
mod tokenizer;

pub use source::TextSource;
pub use tokenizer::{DELIMITER, QUOTE, Tokenized, tokenize, tokenize_checked, tokenize_with};
