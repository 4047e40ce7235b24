//! Readers for metric extraction output.
//!
//! Every reader follows the same policy: whole-input problems (unreadable file,
//! no symbol column, invalid JSON document) are [`crate::DataError`]s, while a
//! bad row or element is rejected on its own and the rest of the input loads.

mod csv_file;
mod frame;
mod json_file;

pub use csv_file::{load_csv_snapshot, read_csv_snapshot};
pub use frame::snapshot_from_frame;
pub use json_file::{load_json_snapshot, read_json_snapshot};

use chrono::NaiveDate;

/// Cell spellings treated as an absent value.
const ABSENT_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "-"];

/// Parse one metric cell.
///
/// `Ok(None)` is an explicitly absent value; `Err(())` means the cell holds
/// text that is neither a number nor an absence marker.
pub(crate) fn parse_cell(raw: &str) -> Result<Option<f64>, ()> {
    let trimmed = raw.trim();
    if ABSENT_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Ok(None);
    }
    trimmed.parse::<f64>().map(Some).map_err(|_| ())
}

/// Parse an ISO-8601 calendar date.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.5", Ok(Some(1.5)))]
    #[case(" -0.25 ", Ok(Some(-0.25)))]
    #[case("1e3", Ok(Some(1000.0)))]
    #[case("", Ok(None))]
    #[case("NA", Ok(None))]
    #[case("n/a", Ok(None))]
    #[case("NaN", Ok(None))]
    #[case("null", Ok(None))]
    #[case("-", Ok(None))]
    #[case("abc", Err(()))]
    #[case("12%", Err(()))]
    fn test_parse_cell(#[case] raw: &str, #[case] expected: Result<Option<f64>, ()>) {
        assert_eq!(parse_cell(raw), expected);
    }

    #[test]
    fn test_parse_cell_infinity_is_a_number() {
        // Non-finite numbers parse here and are rejected by the snapshot.
        assert_eq!(parse_cell("inf"), Ok(Some(f64::INFINITY)));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-28"), NaiveDate::from_ymd_opt(2024, 6, 28));
        assert_eq!(parse_date("28/06/2024"), None);
    }
}
