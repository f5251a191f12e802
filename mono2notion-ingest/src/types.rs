use std::collections::HashMap;

use crate::error::IngestError;

/// Column headers of the Monobank statement export.
pub mod columns {
    pub const DETAIL: &str = "Деталі операції";
    pub const AMOUNT_CARD: &str = "Сума в валюті картки (UAH)";
    pub const AMOUNT_OPERATION: &str = "Сума в валюті операції";
    pub const EXCHANGE_RATE: &str = "Курс";
    /// Note the Latin `i` in "Дата i час", as exported by the bank.
    pub const DATETIME: &str = "Дата i час операції";
}

/// Operation detail marking transfers from the owner's own hryvnia FOP
/// account. These are internal movements and never exported.
pub const EXCLUDED_DETAIL: &str = "З гривневого рахунку ФОП";

/// One data row of a statement, keyed by header name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based position among data rows (the header is not counted)
    pub row: u64,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row: u64) -> Self {
        Self {
            row,
            fields: HashMap::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing column is a parse error.
    pub fn require(&self, column: &str) -> Result<&str, IngestError> {
        self.get(column)
            .ok_or_else(|| IngestError::parse(self.row, format!("missing column '{column}'")))
    }
}
