//! Input schema checks run before any aggregation.

use crate::config::InquiryConfig;
use crate::error::{FeatureError, Result};
use polars::prelude::*;

const NUMERIC: &str = "a numeric dtype";
const INDICATOR: &str = "a numeric or boolean dtype";
const LABEL: &str = "a string dtype";

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            // All-null columns carry no values to misinterpret
            | DataType::Null
    )
}

/// Whether the dtype can order events chronologically.
pub(crate) const fn is_temporal(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Date | DataType::Datetime(_, _))
}

fn require<'a>(schema: &'a Schema, column: &str) -> Result<&'a DataType> {
    schema
        .get(column)
        .ok_or_else(|| FeatureError::MissingColumn(column.to_string()))
}

fn require_kind(
    schema: &Schema,
    column: &str,
    accept: fn(&DataType) -> bool,
    expected: &'static str,
) -> Result<()> {
    let dtype = require(schema, column)?;
    if accept(dtype) {
        Ok(())
    } else {
        Err(FeatureError::InvalidColumnType {
            column: column.to_string(),
            dtype: dtype.to_string(),
            expected,
        })
    }
}

/// Check a single column is present and numeric.
pub(crate) fn require_numeric(schema: &Schema, column: &str) -> Result<()> {
    require_kind(schema, column, is_numeric, NUMERIC)
}

/// Check that raw event input carries every column the configuration needs.
///
/// # Errors
/// Returns [`FeatureError::MissingColumn`] or [`FeatureError::InvalidColumnType`]
/// for the first offending column.
pub fn validate_events(schema: &Schema, config: &InquiryConfig) -> Result<()> {
    require(schema, &config.entity_column)?;
    require_kind(
        schema,
        &config.product_column,
        |dt| matches!(dt, DataType::String | DataType::Null),
        LABEL,
    )?;
    require_kind(schema, &config.gap_column, is_numeric, NUMERIC)?;
    require_kind(schema, &config.days_from_application_column, is_numeric, NUMERIC)?;
    for column in config.window_columns() {
        require_kind(
            schema,
            &column,
            |dt| is_numeric(dt) || matches!(dt, DataType::Boolean),
            INDICATOR,
        )?;
    }
    Ok(())
}

/// Check event input that has already passed through the decay annotator.
///
/// # Errors
/// Same as [`validate_events`], plus a missing or non-numeric decay column.
pub fn validate_annotated(schema: &Schema, config: &InquiryConfig) -> Result<()> {
    validate_events(schema, config)?;
    for column in config.decay_columns() {
        require_kind(schema, &column, is_numeric, NUMERIC)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> DataFrame {
        df! {
            "ZEST_KEY" => &["E1", "E2"],
            "inquiry_product_type" => &["auto", "mortgage"],
            "days_from_application" => &[1.0, 2.0],
            "days_since_last_inquiry" => &[Some(3.0), None],
            "in_last_1m" => &[true, false],
            "in_last_3m" => &[1, 0],
        }
        .unwrap()
    }

    fn config() -> InquiryConfig {
        InquiryConfig {
            window_months: vec![1, 3],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_events() {
        let df = events();
        assert!(validate_events(&df.schema(), &config()).is_ok());
    }

    #[test]
    fn test_missing_window_column() {
        let df = events();
        let config = InquiryConfig {
            window_months: vec![1, 6],
            ..Default::default()
        };
        let err = validate_events(&df.schema(), &config).unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn(c) if c == "in_last_6m"));
    }

    #[test]
    fn test_non_numeric_gap() {
        let df = events()
            .lazy()
            .with_column(lit("ten").alias("days_since_last_inquiry"))
            .collect()
            .unwrap();
        let err = validate_events(&df.schema(), &config()).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidColumnType { column, .. } if column == "days_since_last_inquiry"
        ));
    }

    #[test]
    fn test_annotated_requires_decay_columns() {
        let df = events();
        let err = validate_annotated(&df.schema(), &config()).unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn(c) if c == "__decay_30d"));
    }
}
