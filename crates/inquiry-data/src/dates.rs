//! Date normalization for loosely encoded `MMDDYYYY` columns.
//!
//! Source dates arrive as integers, floats (`1152024.0`) or strings with
//! stray separators. Every value is reduced to its digits, left-padded to
//! eight characters and parsed as month, day, year. Values that still fail to
//! parse become null.

use crate::error::{DataError, Result};
use polars::prelude::*;

/// Encoded date layout after cleanup.
pub const DATE_FORMAT: &str = "%m%d%Y";

/// Expression turning a raw date column into a `Date` column.
pub fn normalized_date_expr(column: &str) -> Expr {
    col(column)
        .cast(DataType::String)
        .str()
        .strip_chars(lit(NULL))
        .str()
        .replace(lit(r"\.0$"), lit(""), false)
        .str()
        .replace_all(lit(r"\D"), lit(""), false)
        .str()
        .zfill(lit(8))
        .str()
        .to_date(StrptimeOptions {
            format: Some(DATE_FORMAT.into()),
            strict: false,
            exact: true,
            cache: true,
        })
        .alias(column)
}

/// Parse `column` into a `Date` and sort the frame ascending by it.
///
/// The sort is stable and places unparseable (null) dates last.
///
/// # Errors
/// Returns [`DataError::MissingColumn`] if `column` is absent.
pub fn normalize_date_column(data: LazyFrame, column: &str) -> Result<LazyFrame> {
    let mut data = data;
    let schema = data.collect_schema()?;
    if schema.get(column).is_none() {
        return Err(DataError::MissingColumn(column.to_string()));
    }

    Ok(data.with_column(normalized_date_expr(column)).sort(
        [column],
        SortMultipleOptions::default()
            .with_maintain_order(true)
            .with_nulls_last(true),
    ))
}
