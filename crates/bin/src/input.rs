//! Snapshot loading for the command line.

use chrono::NaiveDate;
use hobart_data::{DataError, UniverseSnapshot, load_csv_snapshot, load_json_snapshot};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a snapshot file.
#[derive(Debug, Error)]
pub(crate) enum InputError {
    /// File extension is not one of the readable formats.
    #[error("Unsupported input file '{0}': expected a .csv or .json file")]
    UnsupportedExtension(String),

    /// The reader rejected the file.
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Readable snapshot formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Infer the format from the file extension.
    pub(crate) fn from_path(path: &Path) -> Result<Self, InputError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(InputError::UnsupportedExtension(path.display().to_string())),
        }
    }
}

/// Load a snapshot, picking the reader from the extension.
pub(crate) fn load_snapshot(
    path: &Path,
    date: Option<NaiveDate>,
) -> Result<UniverseSnapshot, InputError> {
    let snapshot = match InputFormat::from_path(path)? {
        InputFormat::Csv => load_csv_snapshot(path, date)?,
        InputFormat::Json => load_json_snapshot(path, date)?,
    };

    tracing::info!(
        path = %path.display(),
        securities = snapshot.len(),
        rejected = snapshot.rejected().len(),
        date = %snapshot.date(),
        "loaded snapshot"
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("universe.csv")).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            InputFormat::from_path(Path::new("data/universe.JSON")).unwrap(),
            InputFormat::Json
        );
        assert!(matches!(
            InputFormat::from_path(Path::new("universe.parquet")),
            Err(InputError::UnsupportedExtension(_))
        ));
        assert!(InputFormat::from_path(Path::new("universe")).is_err());
    }

    #[test]
    fn test_load_csv_file() {
        let path = std::env::temp_dir().join("hobart_bin_input_test.csv");
        std::fs::write(
            &path,
            "symbol,sector,roe\nAAA,Energy,0.1\nBBB,Energy,oops\nCCC,Utilities,0.3\n",
        )
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let snapshot = load_snapshot(&path, Some(date)).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rejected().len(), 1);
        assert_eq!(snapshot.date(), date);

        std::fs::remove_file(path).ok();
    }
}
