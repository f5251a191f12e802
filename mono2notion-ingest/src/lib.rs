//! mono2notion-ingest: statement sources (local file, S3 upload), CSV row parsing and normalization.

pub mod error;
pub mod event;
pub mod parsers;
pub mod rows;
pub mod source;
pub mod types;

use std::path::Path;

use mono2notion_core::{CanonicalRecord, StatementZone};

pub use error::IngestError;
pub use event::{ObjectRef, S3Event, decode_object_key};
pub use parsers::monobank::{is_excluded, normalize_row, normalize_rows};
pub use rows::{RowReader, read_rows};
pub use source::{ObjectStore, S3ObjectStore, fetch_to_scratch, local_statement, scratch_path};
pub use types::{EXCLUDED_DETAIL, RawRow, columns};

/// Parse and normalize a statement file in one go.
pub fn read_statement(
    path: impl AsRef<Path>,
    delimiter: u8,
    zone: &StatementZone,
) -> Result<Vec<CanonicalRecord>, IngestError> {
    let rows = read_rows(path, delimiter)?;
    normalize_rows(&rows, zone)
}
