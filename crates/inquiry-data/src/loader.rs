//! Table loading from listed locations.

use crate::error::{DataError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads the table stored at a location.
pub trait TableLoader {
    /// Read the table at `location` into memory.
    fn load(&self, location: &str) -> Result<DataFrame>;
}

/// On-disk table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Apache Parquet
    Parquet,
    /// Comma-separated values with a header row
    Csv,
}

impl TableFormat {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    /// Returns [`DataError::UnsupportedFormat`] for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("parquet" | "pq") => Ok(Self::Parquet),
            Some("csv") => Ok(Self::Csv),
            _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loader for Parquet and CSV files on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalTableLoader {
    /// Rows scanned to infer CSV column types (default: 10,000)
    pub infer_schema_length: Option<usize>,
}

impl Default for LocalTableLoader {
    fn default() -> Self {
        Self {
            infer_schema_length: Some(10_000),
        }
    }
}

impl LocalTableLoader {
    fn path(location: &str) -> PathBuf {
        PathBuf::from(location.strip_prefix("file://").unwrap_or(location))
    }
}

impl TableLoader for LocalTableLoader {
    fn load(&self, location: &str) -> Result<DataFrame> {
        let path = Self::path(location);
        let df = match TableFormat::from_path(&path)? {
            TableFormat::Parquet => ParquetReader::new(File::open(&path)?).finish()?,
            TableFormat::Csv => CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(self.infer_schema_length)
                .try_into_reader_with_file_path(Some(path.clone()))?
                .finish()?,
        };
        debug!(location, rows = df.height(), columns = df.width(), "loaded table");
        Ok(df)
    }
}

/// Load the `index`-th entry of a location list.
///
/// # Errors
/// Returns [`DataError::IndexOutOfRange`] when `index` is past the end of
/// `locations`, or the loader's error.
pub fn load_from_list<L: TableLoader + ?Sized>(
    loader: &L,
    locations: &[String],
    index: usize,
) -> Result<DataFrame> {
    let location = locations.get(index).ok_or(DataError::IndexOutOfRange {
        index,
        len: locations.len(),
    })?;
    loader.load(location)
}

/// Load every location and stack the tables vertically, in list order.
///
/// Column types are widened to a common supertype where files disagree.
///
/// # Errors
/// Returns [`DataError::EmptyLocations`] when `locations` is empty, or the
/// first loader or concatenation error.
pub fn load_all<L: TableLoader + ?Sized>(loader: &L, locations: &[String]) -> Result<DataFrame> {
    if locations.is_empty() {
        return Err(DataError::EmptyLocations);
    }
    let frames = locations
        .iter()
        .map(|location| loader.load(location).map(IntoLazy::lazy))
        .collect::<Result<Vec<_>>>()?;
    let args = UnionArgs {
        to_supertypes: true,
        ..Default::default()
    };
    Ok(concat(frames, args)?.collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    const CSV: &str = "ZEST_KEY,inquiry_product_type,days_since_last_inquiry\n\
                       E1,auto,\n\
                       E1,mortgage,12.5\n";

    #[rstest]
    #[case("a/b.parquet", TableFormat::Parquet)]
    #[case("b.PQ", TableFormat::Parquet)]
    #[case("b.csv", TableFormat::Csv)]
    fn test_format_detection(#[case] path: &str, #[case] expected: TableFormat) {
        assert_eq!(TableFormat::from_path(Path::new(path)).unwrap(), expected);
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(
            TableFormat::from_path(Path::new("b.json")),
            Err(DataError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inquiries.csv");
        fs::write(&path, CSV).unwrap();

        let df = LocalTableLoader::default()
            .load(&path.to_string_lossy())
            .unwrap();
        assert_eq!(df.height(), 2);
        let gaps = df.column("days_since_last_inquiry").unwrap().f64().unwrap();
        assert_eq!(gaps.get(0), None);
        assert_eq!(gaps.get(1), Some(12.5));
    }

    #[test]
    fn test_parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inquiries.parquet");
        let mut df = df! {
            "ZEST_KEY" => &["E1", "E2"],
            "days_from_application" => &[Some(3.0), None],
        }
        .unwrap();
        ParquetWriter::new(File::create(&path).unwrap())
            .finish(&mut df)
            .unwrap();

        let location = format!("file://{}", path.display());
        let loaded = LocalTableLoader::default().load(&location).unwrap();
        assert!(loaded.equals_missing(&df));
    }

    #[test]
    fn test_load_from_list_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, CSV).unwrap();
        let locations = vec![path.to_string_lossy().into_owned()];

        let loader = LocalTableLoader::default();
        assert_eq!(load_from_list(&loader, &locations, 0).unwrap().height(), 2);
        assert!(matches!(
            load_from_list(&loader, &locations, 1),
            Err(DataError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_load_all_concatenates() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        fs::write(&first, CSV).unwrap();
        fs::write(&second, CSV).unwrap();
        let locations = vec![
            first.to_string_lossy().into_owned(),
            second.to_string_lossy().into_owned(),
        ];

        let df = load_all(&LocalTableLoader::default(), &locations).unwrap();
        assert_eq!(df.height(), 4);
        assert!(matches!(
            load_all(&LocalTableLoader::default(), &[]),
            Err(DataError::EmptyLocations)
        ));
    }
}
