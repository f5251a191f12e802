use mono2notion_core::StatementZone;
use mono2notion_ingest::{IngestError, read_statement};
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "\"Дата i час операції\",\"Деталі операції\",MCC,\"Сума в валюті картки (UAH)\",\"Сума в валюті операції\",Валюта,Курс,\"Сума комісій (UAH)\",\"Сума кешбеку (UAH)\",\"Залишок після операції\"";

fn write_statement(dir: &tempfile::TempDir, rows: &[&str]) -> PathBuf {
    let mut body = String::from(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    let path = dir.path().join("report_24-09-2023_19-16-47.csv");
    fs::write(&path, body).unwrap();
    path
}

fn kyiv() -> StatementZone {
    "Europe/Kyiv".parse().unwrap()
}

/// Full export layout: extra columns are carried but ignored.
#[test]
fn test_reads_monobank_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(
        &dir,
        &[
            "\"24.09.2023 19:16:47\",\"Booking.com\",4722,-1620.45,-41.50,EUR,39.0470,0.00,0.00,8379.55",
            "\"23.09.2023 12:01:00\",\"Сільпо\",5411,-250.00,-250.00,UAH,—,0.00,2.50,10000.00",
        ],
    );

    let records = read_statement(&path, b',', &kyiv()).unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].title, "Booking.com");
    assert_eq!(records[0].amount_primary, 1620.45);
    assert_eq!(records[0].amount_secondary, 41.5);
    assert_eq!(records[0].exchange_rate, 39.047);
    assert_eq!(records[0].timestamp, "2023-09-24T16:16:47.000Z");

    assert_eq!(records[1].title, "Сільпо");
    assert_eq!(records[1].amount_secondary, 0.0);
    assert_eq!(records[1].exchange_rate, 0.0);
    assert_eq!(records[1].timestamp, "2023-09-23T09:01:00.000Z");
}

/// Three rows, the middle one an internal transfer: rows 1 and 3 survive in order.
#[test]
fn test_internal_transfer_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(
        &dir,
        &[
            "\"24.09.2023 19:16:47\",\"Кава\",5814,-60.00,-60.00,UAH,—,0.00,0.60,100.00",
            "\"24.09.2023 18:00:00\",\"З гривневого рахунку ФОП\",4829,1000.00,1000.00,UAH,—,0.00,0.00,160.00",
            "\"24.09.2023 10:00:00\",\"Нова пошта\",4215,-75.00,-75.00,UAH,—,0.00,0.75,-840.00",
        ],
    );

    let records = read_statement(&path, b',', &kyiv()).unwrap();
    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Кава", "Нова пошта"]);
}

#[test]
fn test_bad_timestamp_aborts_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(
        &dir,
        &[
            "\"24.09.2023 19:16:47\",\"Кава\",5814,-60.00,-60.00,UAH,—,0.00,0.60,100.00",
            "\"2023-09-24 18:00\",\"Нова пошта\",4215,-75.00,-75.00,UAH,—,0.00,0.75,25.00",
        ],
    );

    match read_statement(&path, b',', &kyiv()) {
        Err(IngestError::DateFormat { row, .. }) => assert_eq!(row, 2),
        other => panic!("expected date format error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_statement(dir.path().join("nope.csv"), b',', &kyiv()).unwrap_err();
    assert!(matches!(err, IngestError::Parse { row: 0, .. }));
}
