//! Monobank statement normalizer
//!
//! Maps raw CSV rows onto [`CanonicalRecord`]s:
//!   Деталі операції, Сума в валюті картки (UAH), Сума в валюті операції, Курс,
//!   Дата i час операції (DD.MM.YYYY HH:MM:SS)
//!
//! Internal transfers (see [`EXCLUDED_DETAIL`]) are dropped.

use mono2notion_core::{CanonicalRecord, StatementZone, statement_timestamp_to_iso8601};

use crate::error::IngestError;
use crate::types::{EXCLUDED_DETAIL, RawRow, columns};

fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn require_amount(row: &RawRow, column: &str) -> Result<f64, IngestError> {
    let raw = row.require(column)?;
    parse_decimal(raw).ok_or_else(|| {
        IngestError::parse(row.row, format!("column '{column}' is not a number: '{raw}'"))
    })
}

/// True for rows that must never be exported
pub fn is_excluded(row: &RawRow) -> bool {
    row.get(columns::DETAIL) == Some(EXCLUDED_DETAIL)
}

/// Normalize a single row. `Ok(None)` means the row is excluded.
pub fn normalize_row(
    row: &RawRow,
    zone: &StatementZone,
) -> Result<Option<CanonicalRecord>, IngestError> {
    if is_excluded(row) {
        return Ok(None);
    }

    let title = row.require(columns::DETAIL)?;
    let amount_primary = require_amount(row, columns::AMOUNT_CARD)?;

    // Rate and operation-currency amount are jointly present or absent.
    let conversion = match row.get(columns::EXCHANGE_RATE).and_then(parse_decimal) {
        Some(rate) => Some((require_amount(row, columns::AMOUNT_OPERATION)?, rate)),
        None => None,
    };

    let timestamp = statement_timestamp_to_iso8601(row.require(columns::DATETIME)?, zone)
        .map_err(|source| IngestError::DateFormat {
            row: row.row,
            source,
        })?;

    Ok(Some(CanonicalRecord::new(
        title,
        amount_primary,
        conversion,
        timestamp,
    )))
}

/// Normalize a whole statement in one pass.
///
/// The first bad row fails the batch: nothing is returned for rows that
/// normalized fine before it.
pub fn normalize_rows<'a>(
    rows: impl IntoIterator<Item = &'a RawRow>,
    zone: &StatementZone,
) -> Result<Vec<CanonicalRecord>, IngestError> {
    let mut out = Vec::new();
    for row in rows {
        if let Some(record) = normalize_row(row, zone)? {
            out.push(record);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kyiv() -> StatementZone {
        "Europe/Kyiv".parse().unwrap()
    }

    fn row(n: u64, detail: &str, card: &str, op: &str, rate: &str, at: &str) -> RawRow {
        RawRow::new(n)
            .with(columns::DETAIL, detail)
            .with(columns::AMOUNT_CARD, card)
            .with(columns::AMOUNT_OPERATION, op)
            .with(columns::EXCHANGE_RATE, rate)
            .with(columns::DATETIME, at)
    }

    #[test]
    fn test_normalizes_foreign_currency_row() {
        let r = row(1, "Booking.com", "-1620.45", "-41.50", "39.0470", "24.09.2023 19:16:47");
        let rec = normalize_row(&r, &kyiv()).unwrap().unwrap();

        assert_eq!(rec.title, "Booking.com");
        assert_eq!(rec.amount_primary, 1620.45);
        assert_eq!(rec.amount_secondary, 41.5);
        assert_eq!(rec.exchange_rate, 39.047);
        assert_eq!(rec.timestamp, "2023-09-24T16:16:47.000Z");
    }

    #[test]
    fn test_credit_amounts_are_positive_too() {
        let r = row(1, "Поповнення", "5000.00", "5000.00", "—", "01.09.2023 09:00:00");
        let rec = normalize_row(&r, &kyiv()).unwrap().unwrap();
        assert_eq!(rec.amount_primary, 5000.0);
        assert!(rec.amount_primary >= 0.0 && rec.amount_secondary >= 0.0);
    }

    #[test]
    fn test_missing_rate_zeroes_secondary_amount() {
        for rate in ["", "—", "n/a", "NaN", "inf"] {
            let r = row(1, "Сільпо", "-250.00", "-250.00", rate, "24.09.2023 19:16:47");
            let rec = normalize_row(&r, &kyiv()).unwrap().unwrap();
            assert_eq!(rec.exchange_rate, 0.0, "rate {rate:?}");
            assert_eq!(rec.amount_secondary, 0.0, "rate {rate:?}");
        }
    }

    #[test]
    fn test_missing_rate_ignores_unparseable_secondary() {
        let r = row(1, "Сільпо", "-250.00", "", "", "24.09.2023 19:16:47");
        let rec = normalize_row(&r, &kyiv()).unwrap().unwrap();
        assert_eq!(rec.amount_secondary, 0.0);
    }

    #[test]
    fn test_excluded_row_is_dropped() {
        let r = row(1, EXCLUDED_DETAIL, "10000.00", "10000.00", "", "24.09.2023 19:16:47");
        assert!(is_excluded(&r));
        assert_eq!(normalize_row(&r, &kyiv()).unwrap(), None);
    }

    #[test]
    fn test_exclusion_is_exact_match() {
        let r = row(1, " З гривневого рахунку ФОП", "1.00", "1.00", "", "24.09.2023 19:16:47");
        assert!(!is_excluded(&r));
    }

    #[test]
    fn test_excluded_row_skips_validation() {
        let r = row(1, EXCLUDED_DETAIL, "x", "", "", "garbage");
        assert_eq!(normalize_row(&r, &kyiv()).unwrap(), None);
    }

    #[test]
    fn test_bad_timestamp_is_date_format_error() {
        let r = row(7, "Кава", "-60.00", "-60.00", "", "2023-09-24 19:16:47");
        match normalize_row(&r, &kyiv()) {
            Err(IngestError::DateFormat { row, .. }) => assert_eq!(row, 7),
            other => panic!("expected date format error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_primary_amount_is_parse_error() {
        let r = row(3, "Кава", "sixty", "", "", "24.09.2023 19:16:47");
        assert!(matches!(
            normalize_row(&r, &kyiv()),
            Err(IngestError::Parse { row: 3, .. })
        ));
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let r = RawRow::new(1).with(columns::DETAIL, "Кава");
        assert!(matches!(
            normalize_row(&r, &kyiv()),
            Err(IngestError::Parse { row: 1, .. })
        ));
    }

    #[test]
    fn test_one_bad_row_fails_the_batch() {
        let rows = vec![
            row(1, "A", "-1.00", "", "", "24.09.2023 19:16:47"),
            row(2, "B", "-2.00", "", "", "bad"),
            row(3, "C", "-3.00", "", "", "24.09.2023 19:16:49"),
        ];
        assert!(normalize_rows(&rows, &kyiv()).is_err());
    }

    #[test]
    fn test_batch_preserves_order_without_excluded() {
        let rows = vec![
            row(1, "A", "-1.00", "", "", "24.09.2023 19:16:47"),
            row(2, EXCLUDED_DETAIL, "2.00", "", "", "24.09.2023 19:16:48"),
            row(3, "C", "-3.00", "", "", "24.09.2023 19:16:49"),
        ];
        let out = normalize_rows(&rows, &kyiv()).unwrap();
        let titles: Vec<_> = out.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A", "C"]);
    }
}
