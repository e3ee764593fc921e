//! Slice Aggregator
//!
//! Groups a slice of inquiries (all of them, or one product type) by entity
//! and computes the statistic bundle listed in [`crate::catalog`]. Every
//! output column except the entity id carries the slice prefix.

use crate::catalog::{Statistic, slice_statistics};
use crate::config::{
    ALL_SLICE, DAYS_PER_MONTH, InquiryConfig, decay_column_for_days, window_indicator_column,
};
use crate::error::Result;
use crate::schema::{is_temporal, validate_annotated};
use polars::prelude::*;
use std::fmt;
use tracing::debug;

/// Subset of inquiries aggregated together
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slice {
    /// Every inquiry regardless of product type
    All,
    /// Inquiries whose product type equals the label
    Product(String),
}

impl Slice {
    /// Slice restricted to one product type.
    pub fn product(label: impl Into<String>) -> Self {
        Self::Product(label.into())
    }

    /// Prefix used for this slice's column names.
    pub fn prefix(&self) -> &str {
        match self {
            Self::All => ALL_SLICE,
            Self::Product(label) => label,
        }
    }

    /// All slices a configuration aggregates, in combination order.
    pub fn from_config(config: &InquiryConfig) -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(config.product_groups.iter().cloned().map(Self::Product))
            .collect()
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Gap values as floats, with NaN folded into null so statistics skip them.
fn gap_values(gap_column: &str) -> Expr {
    let gap = col(gap_column).cast(DataType::Float64);
    when(gap.clone().is_nan())
        .then(lit(NULL))
        .otherwise(gap)
        .alias(gap_column)
}

/// Per-group aggregation for a statistic, or `None` for statistics derived
/// from other aggregated columns.
fn aggregation(statistic: Statistic, prefix: &str, config: &InquiryConfig) -> Option<Expr> {
    let gap = || col(config.gap_column.as_str());
    let name = statistic.column_name(prefix);

    let expr = match statistic {
        Statistic::Count => len().cast(DataType::Int64),
        Statistic::MeanGap => gap().mean(),
        // Sample std of fewer than two gaps is undefined, never zero
        Statistic::StdGap => when(gap().count().gt(lit(1)))
            .then(gap().std(1))
            .otherwise(lit(NULL)),
        // Rows are in chronological order within each group
        Statistic::LastGap => gap().drop_nulls().last(),
        Statistic::GapPercentile(p) => {
            gap().quantile(lit(f64::from(p) / 100.0), QuantileMethod::Linear)
        }
        Statistic::WindowCount(m) => col(window_indicator_column(m))
            .cast(DataType::Int64)
            .sum(),
        Statistic::DecaySum(h) => col(decay_column_for_days(h)).sum(),
        Statistic::GapCv | Statistic::LastGapMonths => return None,
    };

    Some(expr.alias(name))
}

/// Columns computed from the aggregated gap statistics.
fn derived_columns(prefix: &str) -> [Expr; 2] {
    let mean_gap = col(Statistic::MeanGap.column_name(prefix));
    let std_gap = col(Statistic::StdGap.column_name(prefix));
    let last_gap = col(Statistic::LastGap.column_name(prefix));

    [
        when(mean_gap.clone().eq(lit(0.0)))
            .then(lit(NULL))
            .otherwise(std_gap / mean_gap)
            .alias(Statistic::GapCv.column_name(prefix)),
        (last_gap / lit(DAYS_PER_MONTH)).alias(Statistic::LastGapMonths.column_name(prefix)),
    ]
}

/// Stable sort by the inquiry date when it is present as a date type.
///
/// Otherwise the input row order is taken as chronological.
fn chronological(data: LazyFrame, schema: &Schema, config: &InquiryConfig) -> LazyFrame {
    match schema.get(&config.inquiry_date_column) {
        Some(dtype) if is_temporal(dtype) => data.sort(
            [config.inquiry_date_column.as_str()],
            SortMultipleOptions::default()
                .with_maintain_order(true)
                .with_nulls_last(true),
        ),
        _ => data,
    }
}

/// Aggregate one slice of decay-annotated inquiries into one row per entity.
///
/// Entities without rows in the slice are absent from the result rather than
/// zero-filled. A slice matching no rows yields an empty frame with the full
/// prefixed schema. Rows are sorted by entity id.
///
/// # Errors
/// Returns an error if the configuration is invalid or the input lacks a
/// required column (including the decay columns added by
/// [`crate::annotate_decay_weights`]).
pub fn aggregate_slice(
    data: LazyFrame,
    slice: &Slice,
    config: &InquiryConfig,
) -> Result<LazyFrame> {
    config.validate()?;

    let mut data = data;
    let schema = data.collect_schema()?;
    validate_annotated(&schema, config)?;

    let entity = config.entity_column.as_str();
    let prefix = slice.prefix();
    let statistics = slice_statistics(config);
    debug!(%slice, statistics = statistics.len(), "aggregating inquiry slice");

    let data = chronological(data, &schema, config);
    let selected = match slice {
        Slice::All => data,
        Slice::Product(label) => {
            data.filter(col(config.product_column.as_str()).eq(lit(label.as_str())))
        }
    };

    let aggregations: Vec<Expr> = statistics
        .iter()
        .filter_map(|&s| aggregation(s, prefix, config))
        .collect();

    let output: Vec<Expr> = std::iter::once(col(entity))
        .chain(statistics.iter().map(|s| col(s.column_name(prefix))))
        .collect();

    let result = selected
        .with_column(gap_values(&config.gap_column))
        .group_by([col(entity)])
        .agg(aggregations)
        .with_columns(derived_columns(prefix))
        .select(output)
        .sort([entity], SortMultipleOptions::default());

    Ok(result)
}
