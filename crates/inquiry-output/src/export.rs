//! Export functionality for inquiry feature tables.
//!
//! Feature tables are written straight from polars; small serde records
//! (coverage reports, the feature catalog) go through the [`Exporter`] trait.

use inquiry_features::{FeatureInfo, InquiryConfig, feature_catalog};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options for serde records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension, defaulting to pretty JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::PrettyJson,
        }
    }
}

/// Output formats for feature tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,

    /// JSON array of row objects.
    Json,

    /// One JSON object per line.
    NdJson,
}

impl TableFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::NdJson => "ndjson",
        }
    }
}

impl FromStr for TableFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::NdJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Write a feature table to `writer`.
///
/// # Errors
///
/// Returns an error if polars fails to serialize the table or the writer fails.
pub fn write_feature_table<W: Write>(
    features: &mut DataFrame,
    format: TableFormat,
    writer: W,
) -> Result<(), ExportError> {
    match format {
        TableFormat::Csv => CsvWriter::new(writer)
            .include_header(true)
            .finish(features)?,
        TableFormat::Json => JsonWriter::new(writer)
            .with_json_format(JsonFormat::Json)
            .finish(features)?,
        TableFormat::NdJson => JsonWriter::new(writer)
            .with_json_format(JsonFormat::JsonLines)
            .finish(features)?,
    }
    Ok(())
}

/// Write a feature table to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn export_feature_table(
    features: &mut DataFrame,
    path: &Path,
    format: TableFormat,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_feature_table(features, format, file)
}

/// Render a feature table as a string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn feature_table_to_string(
    features: &mut DataFrame,
    format: TableFormat,
) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_feature_table(features, format, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize records as CSV with a header row.
pub(crate) fn records_to_csv<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// One feature catalog entry, flattened for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    /// Column name.
    pub name: String,

    /// Slice prefix.
    pub slice: String,

    /// Statistic suffix.
    pub statistic: String,

    /// Human-readable description.
    pub description: String,
}

impl From<&FeatureInfo> for CatalogRecord {
    fn from(info: &FeatureInfo) -> Self {
        Self {
            name: info.name.clone(),
            slice: info.slice.clone(),
            statistic: info.statistic.to_string(),
            description: info.description(),
        }
    }
}

/// Flattened catalog of every feature column a configuration produces.
pub fn catalog_records(config: &InquiryConfig) -> Vec<CatalogRecord> {
    feature_catalog(config)
        .iter()
        .map(CatalogRecord::from)
        .collect()
}

impl Exporter for Vec<CatalogRecord> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => records_to_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> DataFrame {
        df! {
            "ZEST_KEY" => &["E1", "E2"],
            "all_num_inq" => &[3i64, 1],
            "all_std_gap_days" => &[Some(7.5), None],
        }
        .unwrap()
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
        assert_eq!(ExportFormat::from_path(Path::new("coverage.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("coverage.json")), ExportFormat::PrettyJson);
    }

    #[test]
    fn test_table_format_from_str() {
        assert_eq!("csv".parse::<TableFormat>().unwrap(), TableFormat::Csv);
        assert_eq!("JSON".parse::<TableFormat>().unwrap(), TableFormat::Json);
        assert_eq!("jsonl".parse::<TableFormat>().unwrap(), TableFormat::NdJson);
        assert_eq!(TableFormat::NdJson.extension(), "ndjson");
        assert!(matches!(
            "xlsx".parse::<TableFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_feature_table_csv() {
        let csv = feature_table_to_string(&mut features(), TableFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ZEST_KEY,all_num_inq,all_std_gap_days");
        assert_eq!(lines[1], "E1,3,7.5");
        assert_eq!(lines[2], "E2,1,");
    }

    #[test]
    fn test_feature_table_ndjson() {
        let ndjson = feature_table_to_string(&mut features(), TableFormat::NdJson).unwrap();
        let rows: Vec<serde_json::Value> = ndjson
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ZEST_KEY"], "E1");
        assert_eq!(rows[0]["all_num_inq"], 3);
        assert!(rows[1]["all_std_gap_days"].is_null());
    }

    #[test]
    fn test_feature_table_json_array() {
        let json = feature_table_to_string(&mut features(), TableFormat::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_export_feature_table_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        export_feature_table(&mut features(), &path, TableFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("ZEST_KEY,"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_catalog_export() {
        let records = catalog_records(&InquiryConfig::default());
        assert_eq!(records[0].name, "all_num_inq");
        assert_eq!(records[0].statistic, "num_inq");

        let csv = records.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("name,slice,statistic,description"));
        assert_eq!(csv.lines().count(), records.len() + 1);

        let json = records.export_to_string(ExportFormat::Json).unwrap();
        let parsed: Vec<CatalogRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }
}
