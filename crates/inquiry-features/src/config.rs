//! Aggregation configuration
//!
//! Column names, half-lives, window months and product groups are carried in a
//! single [`InquiryConfig`] that every entry point takes explicitly.

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Prefix of the slice that covers every product type.
pub const ALL_SLICE: &str = "all";

/// Average number of days per month, used for month-denominated gaps.
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// Prefix of the per-row decay weight columns added by the annotator.
pub const DECAY_COLUMN_PREFIX: &str = "__decay_";

/// Configuration for inquiry feature aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InquiryConfig {
    /// Entity identifier column (default: "ZEST_KEY")
    pub entity_column: String,
    /// Product type column (default: "inquiry_product_type")
    pub product_column: String,
    /// Inquiry date column, used only for chronological ordering (default: "DATE_OF_INQUIRY")
    pub inquiry_date_column: String,
    /// Reference (application) date column (default: "DATE_OF_REQUEST")
    pub reference_date_column: String,
    /// Elapsed days between inquiry and application (default: "days_from_application")
    pub days_from_application_column: String,
    /// Gap since the previous inquiry (default: "days_since_last_inquiry")
    pub gap_column: String,
    /// Decay half-lives in days (default: [30, 90])
    pub half_lives: Vec<f64>,
    /// Trailing window months with `in_last_{m}m` indicators (default: [1, 3, 6, 9, 12])
    pub window_months: Vec<u32>,
    /// Product groups aggregated as their own slices (default: [auto, mortgage, other])
    pub product_groups: Vec<String>,
}

impl Default for InquiryConfig {
    fn default() -> Self {
        Self {
            entity_column: "ZEST_KEY".to_string(),
            product_column: "inquiry_product_type".to_string(),
            inquiry_date_column: "DATE_OF_INQUIRY".to_string(),
            reference_date_column: "DATE_OF_REQUEST".to_string(),
            days_from_application_column: "days_from_application".to_string(),
            gap_column: "days_since_last_inquiry".to_string(),
            half_lives: vec![30.0, 90.0],
            window_months: vec![1, 3, 6, 9, 12],
            product_groups: vec!["auto".to_string(), "mortgage".to_string(), "other".to_string()],
        }
    }
}

impl InquiryConfig {
    /// Check the configuration for values that cannot be aggregated.
    ///
    /// # Errors
    /// Rejects non-positive or non-finite half-lives, half-lives that collide
    /// once truncated to whole days, repeated window months, and product
    /// groups that are empty, repeated or named [`ALL_SLICE`].
    pub fn validate(&self) -> Result<()> {
        let mut seen_days = HashSet::new();
        for &half_life in &self.half_lives {
            if !half_life.is_finite() || half_life <= 0.0 {
                return Err(FeatureError::InvalidHalfLife(half_life));
            }
            let days = half_life_days(half_life);
            if days == 0 {
                return Err(FeatureError::InvalidHalfLife(half_life));
            }
            if !seen_days.insert(days) {
                return Err(FeatureError::DuplicateHalfLife(days));
            }
        }

        let mut seen_months = HashSet::new();
        for &month in &self.window_months {
            if !seen_months.insert(month) {
                return Err(FeatureError::DuplicateWindowMonth(month));
            }
        }

        let mut seen_groups = HashSet::new();
        for group in &self.product_groups {
            let reason = if group.is_empty() {
                Some("label is empty")
            } else if group == ALL_SLICE {
                Some("label is reserved for the all-products slice")
            } else if !seen_groups.insert(group.as_str()) {
                Some("label is listed more than once")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(FeatureError::InvalidProductGroup {
                    label: group.clone(),
                    reason: reason.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Indicator column names for every configured window month.
    pub fn window_columns(&self) -> Vec<String> {
        self.window_months
            .iter()
            .map(|&m| window_indicator_column(m))
            .collect()
    }

    /// Decay weight column names for every configured half-life.
    pub fn decay_columns(&self) -> Vec<String> {
        self.half_lives
            .iter()
            .map(|&h| decay_weight_column(h))
            .collect()
    }
}

/// Whole-day label of a half-life, as used in column names.
pub fn half_life_days(half_life: f64) -> i64 {
    half_life.trunc() as i64
}

/// Name of the input indicator column for a trailing window of `months`.
pub fn window_indicator_column(months: u32) -> String {
    format!("in_last_{months}m")
}

/// Name of the per-row decay weight column for a half-life.
pub fn decay_weight_column(half_life: f64) -> String {
    decay_column_for_days(half_life_days(half_life))
}

/// Name of the per-row decay weight column for a whole-day half-life label.
pub fn decay_column_for_days(days: i64) -> String {
    format!("{DECAY_COLUMN_PREFIX}{days}d")
}
