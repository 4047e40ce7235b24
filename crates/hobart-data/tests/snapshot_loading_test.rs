//! Integration tests for loading universe snapshots from files.

use chrono::NaiveDate;
use hobart_data::{
    RejectionReason, load_csv_snapshot, load_json_snapshot, read_csv_snapshot, read_json_snapshot,
};
use std::io::Write;

fn scoring_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

#[test]
fn test_csv_and_json_describe_the_same_universe() {
    let csv = "\
symbol,sector,roe,debt_to_equity,return_12m
AAPL,Technology,1.5,1.75,0.25
MSFT,Information Technology,0.375,0.25,0.3125
XOM,Energy,0.125,,0.0625
";
    let json = r#"{
        "date": "2024-06-28",
        "records": [
            {"symbol": "XOM", "sector": "Energy", "metrics": {"roe": 0.125, "debt_to_equity": null, "return_12m": 0.0625}},
            {"symbol": "MSFT", "sector": "Technology", "metrics": {"roe": 0.375, "debt_to_equity": 0.25, "return_12m": 0.3125}},
            {"symbol": "AAPL", "sector": "Technology", "metrics": {"roe": 1.5, "debt_to_equity": 1.75, "return_12m": 0.25}}
        ]
    }"#;

    // Binary-exact values so both parsers produce identical floats.
    let from_csv = read_csv_snapshot(csv.as_bytes(), Some(scoring_date())).unwrap();
    let from_json = read_json_snapshot(json.as_bytes(), None).unwrap();

    assert_eq!(from_csv.date(), from_json.date());
    assert_eq!(from_csv.records(), from_json.records());
    assert_eq!(from_csv.sector_counts().get("Information Technology"), Some(&2));
}

#[test]
fn test_load_from_files() {
    let dir = std::env::temp_dir();
    let csv_path = dir.join("hobart_snapshot_loading_test.csv");
    let json_path = dir.join("hobart_snapshot_loading_test.json");

    let mut csv_file = std::fs::File::create(&csv_path).unwrap();
    writeln!(csv_file, "date,symbol,sector,roe").unwrap();
    writeln!(csv_file, "2024-06-28,AAPL,Technology,1.47").unwrap();
    writeln!(csv_file, "2024-06-28,BAD,Technology,oops").unwrap();
    drop(csv_file);

    std::fs::write(
        &json_path,
        r#"[{"symbol": "AAPL", "date": "2024-06-28", "metrics": {"roe": 1.47}}]"#,
    )
    .unwrap();

    let csv_snapshot = load_csv_snapshot(&csv_path, None).unwrap();
    assert_eq!(csv_snapshot.date(), scoring_date());
    assert_eq!(csv_snapshot.len(), 1);
    assert_eq!(csv_snapshot.rejected().len(), 1);
    assert!(matches!(
        csv_snapshot.rejected()[0].reason,
        RejectionReason::NonNumericValue { .. }
    ));

    let json_snapshot = load_json_snapshot(&json_path, None).unwrap();
    assert_eq!(json_snapshot.len(), 1);

    std::fs::remove_file(csv_path).ok();
    std::fs::remove_file(json_path).ok();
}

#[test]
fn test_missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("hobart_definitely_missing_snapshot.csv");
    let result = load_csv_snapshot(&path, Some(scoring_date()));
    assert!(matches!(result, Err(hobart_data::DataError::Io(_))));
}
