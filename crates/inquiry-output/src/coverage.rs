//! Slice coverage reporting.
//!
//! The combined feature table keeps only entities present in every slice.
//! A coverage report records, per slice, how many entities the slice saw and
//! how many of them the inner join discarded.

use crate::export::{ExportError, ExportFormat, Exporter, records_to_csv};
use chrono::{DateTime, Utc};
use inquiry_features::{ALL_SLICE, FeatureSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity coverage of a single slice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SliceCoverage {
    /// Slice prefix.
    pub slice: String,

    /// Entities with at least one event in the slice.
    pub entities: usize,

    /// Entities with events overall but none in this slice.
    pub missing: usize,

    /// Entities of this slice absent from the combined table.
    pub dropped: usize,
}

/// Coverage of every slice of a built feature set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageReport {
    /// Entity id column.
    pub entity_column: String,

    /// Entities with at least one event.
    pub total_entities: usize,

    /// Entities in the combined feature table.
    pub retained_entities: usize,

    /// Per-slice coverage, in combination order.
    pub slices: Vec<SliceCoverage>,

    /// Report creation time.
    pub generated_at: DateTime<Utc>,
}

impl CoverageReport {
    /// Summarize a feature set.
    ///
    /// Each slice table holds one row per entity, and every slice entity also
    /// appears in the `all` slice, so the counts follow from table heights.
    pub fn from_feature_set(set: &FeatureSet, entity_column: &str) -> Self {
        let total_entities = set
            .slice(ALL_SLICE)
            .map_or_else(|| set.entity_count(), |all| all.height());
        let retained_entities = set.entity_count();

        let slices = set
            .slices
            .iter()
            .map(|(slice, frame)| SliceCoverage {
                slice: slice.prefix().to_string(),
                entities: frame.height(),
                missing: total_entities.saturating_sub(frame.height()),
                dropped: frame.height().saturating_sub(retained_entities),
            })
            .collect();

        Self {
            entity_column: entity_column.to_string(),
            total_entities,
            retained_entities,
            slices,
            generated_at: Utc::now(),
        }
    }

    /// Share of entities that survived the join, 1.0 for an empty input.
    pub fn retention_rate(&self) -> f64 {
        if self.total_entities == 0 {
            1.0
        } else {
            self.retained_entities as f64 / self.total_entities as f64
        }
    }

    /// Slices that left some entity without events.
    pub fn limiting_slices(&self) -> impl Iterator<Item = &SliceCoverage> {
        self.slices.iter().filter(|s| s.missing > 0)
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Coverage: {} of {} entities retained ({:.1}%)",
            self.retained_entities,
            self.total_entities,
            self.retention_rate() * 100.0
        )?;
        writeln!(f, "{:<16} {:>10} {:>10} {:>10}", "slice", "entities", "missing", "dropped")?;
        for s in &self.slices {
            writeln!(
                f,
                "{:<16} {:>10} {:>10} {:>10}",
                s.slice, s.entities, s.missing, s.dropped
            )?;
        }
        Ok(())
    }
}

impl Exporter for CoverageReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => records_to_csv(&self.slices),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
