//! Line-by-line row source over delimited text

use super::tokenizer::tokenize_checked;
use crate::cell::CellValue;
use crate::error::Result;
use crate::etl::{RawRow, RowSource};
use crate::header::Header;
use std::io::BufRead;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads comma-delimited text one line per row
///
/// The first non-empty line is consumed at open time: it either becomes the
/// header or, without a header row, fixes the positional column count and is
/// replayed as the first data row.
pub struct TextSource<B> {
    reader: B,
    header: Header,
    pending: Option<RawRow>,
    buf: Vec<u8>,
    lines_read: usize,
    recoveries: usize,
    finished: bool,
}

impl<B: BufRead> TextSource<B> {
    pub fn open(reader: B, use_header_row: bool) -> Result<Self> {
        let mut source = Self {
            reader,
            header: Header::empty(),
            pending: None,
            buf: Vec::new(),
            lines_read: 0,
            recoveries: 0,
            finished: false,
        };

        match source.read_cells()? {
            Some(first) if use_header_row => {
                source.header = Header::resolve(&first, false);
            }
            Some(first) => {
                source.header = Header::positional(first.len());
                source.pending = Some(first);
            }
            None => log::debug!("Text source is empty"),
        }

        log::debug!(
            "Resolved {} text columns: {:?}",
            source.header.len(),
            source.header.names().collect::<Vec<_>>()
        );

        Ok(source)
    }

    /// Physical lines consumed so far, including skipped empty lines
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Lines where an unterminated quote had to be closed at end of line
    pub fn recoveries(&self) -> usize {
        self.recoveries
    }

    fn read_cells(&mut self) -> Result<Option<RawRow>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }

            let mut bytes = self.buf.as_slice();
            if self.lines_read == 0 {
                bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            }
            self.lines_read += 1;

            let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
            if bytes.is_empty() {
                continue;
            }

            let line = decode_line(bytes);
            let tokenized = tokenize_checked(&line);
            if tokenized.unterminated {
                self.recoveries += 1;
                log::debug!(
                    "Unterminated quote on line {}, keeping the rest of the line in the last field",
                    self.lines_read
                );
            }

            return Ok(Some(
                tokenized.fields.into_iter().map(CellValue::Text).collect(),
            ));
        }
    }
}

impl<B: BufRead> RowSource for TextSource<B> {
    fn header(&self) -> &Header {
        &self.header
    }

    fn next_row(&mut self) -> Result<Option<RawRow>> {
        if let Some(row) = self.pending.take() {
            return Ok(Some(row));
        }
        if self.finished {
            return Ok(None);
        }

        let row = self.read_cells()?;
        if row.is_none() {
            self.finished = true;
            log::debug!("Reached end of text after {} lines", self.lines_read);
            if self.recoveries > 0 {
                log::warn!(
                    "{} line(s) had unterminated quotes and were read to end of line",
                    self.recoveries
                );
            }
        }
        Ok(row)
    }
}

/// UTF-8 first, falling back to Windows-1252 for Excel-exported files
fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
