//! Streaming row parser for delimited statement exports.
//!
//! The first record is the header; every following record becomes a
//! [`RawRow`] keyed by header name, yielded lazily in file order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::IngestError;
use crate::types::RawRow;

pub struct RowReader<R: Read> {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<R>,
    next_row: u64,
}

impl RowReader<File> {
    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| IngestError::parse(0, format!("opening {}: {e}", path.display())))?;
        Self::from_reader(file, delimiter)
    }
}

impl<R: Read> RowReader<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Result<Self, IngestError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| IngestError::parse(0, format!("reading header: {e}")))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(IngestError::parse(0, "empty header row"));
        }

        Ok(Self {
            headers,
            records: rdr.into_records(),
            next_row: 1,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<RawRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let row = self.next_row;
        self.next_row += 1;

        Some(
            record
                .map_err(|e| IngestError::parse(row, e))
                .map(|record| RawRow {
                    row,
                    fields: self
                        .headers
                        .iter()
                        .cloned()
                        .zip(record.iter().map(str::to_string))
                        .collect(),
                }),
        )
    }
}

/// Read every row of a statement file, failing on the first malformed one.
pub fn read_rows(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<RawRow>, IngestError> {
    RowReader::from_path(path, delimiter)?.collect()
}
