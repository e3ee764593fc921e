//! Feature Catalog
//!
//! Enumerates every output column a configuration produces, in output order.
//! The slice aggregator builds its expressions from this list, so the catalog
//! and the actual schema cannot drift apart.

use crate::config::{ALL_SLICE, InquiryConfig, half_life_days};
use serde::Serialize;
use std::fmt;

/// Gap percentiles emitted per slice, in output order.
pub const GAP_PERCENTILES: [u8; 5] = [10, 25, 50, 75, 90];

/// Statistic computed for each entity within a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Statistic {
    /// Number of inquiries
    Count,
    /// Mean gap between inquiries, in days
    MeanGap,
    /// Sample standard deviation of the gap, in days
    StdGap,
    /// Coefficient of variation of the gap
    GapCv,
    /// Gap of the most recent inquiry with a known gap, in days
    LastGap,
    /// Last gap converted to months
    LastGapMonths,
    /// Linear-interpolated gap percentile
    GapPercentile(u8),
    /// Inquiries inside a trailing window of the given months
    WindowCount(u32),
    /// Sum of decay weights for the given whole-day half-life
    DecaySum(i64),
}

impl Statistic {
    /// Column suffix appended after the slice prefix.
    pub fn suffix(&self) -> String {
        match self {
            Self::Count => "num_inq".to_string(),
            Self::MeanGap => "mean_gap_days".to_string(),
            Self::StdGap => "std_gap_days".to_string(),
            Self::GapCv => "gap_cv".to_string(),
            Self::LastGap => "days_since_last_inquiry".to_string(),
            Self::LastGapMonths => "months_since_last_inquiry".to_string(),
            Self::GapPercentile(p) => format!("gap_p{p}"),
            Self::WindowCount(m) => format!("inq_{m}m"),
            Self::DecaySum(h) => format!("decay_{h}d"),
        }
    }

    /// Full column name within a slice.
    pub fn column_name(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.suffix())
    }

    /// Whether the column holds integer counts rather than floats.
    pub const fn is_count(&self) -> bool {
        matches!(self, Self::Count | Self::WindowCount(_))
    }

    /// Brief description of what the statistic measures
    pub fn description(&self) -> String {
        match self {
            Self::Count => "Number of inquiries".to_string(),
            Self::MeanGap => "Mean days between consecutive inquiries".to_string(),
            Self::StdGap => "Sample standard deviation of days between inquiries".to_string(),
            Self::GapCv => "Coefficient of variation of days between inquiries".to_string(),
            Self::LastGap => "Gap in days of the most recent inquiry with a known gap".to_string(),
            Self::LastGapMonths => "Most recent known gap in months".to_string(),
            Self::GapPercentile(p) => format!("{p}th percentile of days between inquiries"),
            Self::WindowCount(m) => format!("Inquiries within the trailing {m} month(s)"),
            Self::DecaySum(h) => format!("Recency-weighted inquiry count, {h} day half-life"),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix())
    }
}

/// Output column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureInfo {
    /// Column name (unique within the feature table)
    pub name: String,
    /// Slice prefix the column belongs to
    pub slice: String,
    /// Statistic the column holds
    pub statistic: Statistic,
}

impl FeatureInfo {
    /// Brief description of the column
    pub fn description(&self) -> String {
        if self.slice == ALL_SLICE {
            format!("{} (all products)", self.statistic.description())
        } else {
            format!("{} ({} inquiries)", self.statistic.description(), self.slice)
        }
    }
}

/// Statistics computed for every slice, in output order.
pub fn slice_statistics(config: &InquiryConfig) -> Vec<Statistic> {
    let mut stats = vec![
        Statistic::Count,
        Statistic::MeanGap,
        Statistic::StdGap,
        Statistic::GapCv,
        Statistic::LastGap,
        Statistic::LastGapMonths,
    ];
    stats.extend(GAP_PERCENTILES.iter().map(|&p| Statistic::GapPercentile(p)));
    stats.extend(config.window_months.iter().map(|&m| Statistic::WindowCount(m)));
    stats.extend(
        config
            .half_lives
            .iter()
            .map(|&h| Statistic::DecaySum(half_life_days(h))),
    );
    stats
}

/// Slice prefixes in combination order: `all` first, then each product group.
pub fn slice_prefixes(config: &InquiryConfig) -> Vec<&str> {
    std::iter::once(ALL_SLICE)
        .chain(config.product_groups.iter().map(String::as_str))
        .collect()
}

/// Columns produced for one slice prefix.
pub fn slice_catalog(prefix: &str, config: &InquiryConfig) -> Vec<FeatureInfo> {
    slice_statistics(config)
        .into_iter()
        .map(|statistic| FeatureInfo {
            name: statistic.column_name(prefix),
            slice: prefix.to_string(),
            statistic,
        })
        .collect()
}

/// Every feature column of the combined table, in output order.
pub fn feature_catalog(config: &InquiryConfig) -> Vec<FeatureInfo> {
    slice_prefixes(config)
        .into_iter()
        .flat_map(|prefix| slice_catalog(prefix, config))
        .collect()
}

/// Column names of the combined table, entity id first.
pub fn feature_columns(config: &InquiryConfig) -> Vec<String> {
    std::iter::once(config.entity_column.clone())
        .chain(feature_catalog(config).into_iter().map(|f| f.name))
        .collect()
}

/// Look up a column by name
pub fn get_feature_info(name: &str, config: &InquiryConfig) -> Option<FeatureInfo> {
    feature_catalog(config).into_iter().find(|f| f.name == name)
}
