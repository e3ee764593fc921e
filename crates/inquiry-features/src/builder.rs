//! Feature table builder
//!
//! Ties the annotator, the slice aggregator and the combiner together:
//! decay weights are added once, every slice is aggregated from the same
//! annotated frame, and the results are inner-joined in slice order.

use crate::combine::combine_slices;
use crate::config::InquiryConfig;
use crate::decay::annotate_decay_weights;
use crate::error::Result;
use crate::schema::validate_events;
use crate::slice::{Slice, aggregate_slice};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Materialized slice tables together with their combination
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Per-slice feature tables, `all` first, then product groups in order
    pub slices: Vec<(Slice, DataFrame)>,
    /// Inner join of every slice on the entity id
    pub features: DataFrame,
}

impl FeatureSet {
    /// Feature table of one slice, looked up by prefix.
    pub fn slice(&self, prefix: &str) -> Option<&DataFrame> {
        self.slices
            .iter()
            .find(|(slice, _)| slice.prefix() == prefix)
            .map(|(_, frame)| frame)
    }

    /// Number of entities in the combined table.
    pub fn entity_count(&self) -> usize {
        self.features.height()
    }
}

/// Builds the wide inquiry feature table for a configuration
#[derive(Debug, Clone)]
pub struct InquiryFeatureBuilder {
    config: InquiryConfig,
}

impl InquiryFeatureBuilder {
    /// Create a builder, rejecting invalid configurations up front.
    ///
    /// # Errors
    /// Returns the first error reported by [`InquiryConfig::validate`].
    pub fn new(config: InquiryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this builder aggregates with.
    pub const fn config(&self) -> &InquiryConfig {
        &self.config
    }

    /// Validated, decay-annotated events shared by every slice.
    fn annotated(&self, data: LazyFrame) -> Result<LazyFrame> {
        let mut data = data;
        let schema = data.collect_schema()?;
        validate_events(&schema, &self.config)?;
        annotate_decay_weights(data, &self.config)
    }

    /// Lazy plan for each slice, in combination order.
    pub fn slice_plans(&self, data: LazyFrame) -> Result<Vec<(Slice, LazyFrame)>> {
        let annotated = self.annotated(data)?;
        Slice::from_config(&self.config)
            .into_iter()
            .map(|slice| {
                let plan = aggregate_slice(annotated.clone(), &slice, &self.config)?;
                Ok((slice, plan))
            })
            .collect()
    }

    /// Lazy plan for the combined feature table.
    ///
    /// # Errors
    /// Returns an error if the input fails schema validation.
    pub fn plan(&self, data: LazyFrame) -> Result<LazyFrame> {
        combine_slices(&self.config.entity_column, self.slice_plans(data)?)
    }

    /// Build the combined feature table.
    ///
    /// # Errors
    /// Returns an error if the input fails schema validation or polars fails
    /// to execute the plan.
    pub fn build(&self, data: LazyFrame) -> Result<DataFrame> {
        let features = self.plan(data)?.collect()?;
        info!(
            entities = features.height(),
            columns = features.width(),
            "built inquiry features"
        );
        Ok(features)
    }

    /// Build every slice table and the combined table.
    ///
    /// # Errors
    /// Same as [`Self::build`].
    pub fn build_slices(&self, data: LazyFrame) -> Result<FeatureSet> {
        let mut slices = Vec::new();
        for (slice, plan) in self.slice_plans(data)? {
            let frame = plan.collect()?;
            debug!(%slice, entities = frame.height(), "aggregated slice");
            slices.push((slice, frame));
        }

        let features = combine_slices(
            &self.config.entity_column,
            slices
                .iter()
                .map(|(slice, frame)| (slice.clone(), frame.clone().lazy())),
        )?
        .collect()?;

        let all_entities = slices.first().map_or(0, |(_, frame)| frame.height());
        if features.height() < all_entities {
            warn!(
                dropped = all_entities - features.height(),
                retained = features.height(),
                "entities without inquiries in every product group were dropped"
            );
        }
        info!(
            entities = features.height(),
            columns = features.width(),
            "built inquiry features"
        );

        Ok(FeatureSet { slices, features })
    }
}

/// Build the combined inquiry feature table for `data`.
///
/// # Errors
/// Returns an error if the configuration is invalid, the input lacks a
/// required column, or polars fails to execute the plan.
pub fn build_inquiry_features(data: LazyFrame, config: &InquiryConfig) -> Result<DataFrame> {
    InquiryFeatureBuilder::new(config.clone())?.build(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::feature_columns;
    use crate::error::FeatureError;

    fn config() -> InquiryConfig {
        InquiryConfig {
            window_months: vec![3],
            half_lives: vec![30.0],
            product_groups: vec!["auto".to_string(), "mortgage".to_string()],
            ..Default::default()
        }
    }

    fn events() -> DataFrame {
        df! {
            "ZEST_KEY" => &["E1", "E1", "E2", "E3", "E3"],
            "inquiry_product_type" => &["auto", "mortgage", "auto", "mortgage", "auto"],
            "days_from_application" => &[5.0, 10.0, 15.0, 20.0, 25.0],
            "days_since_last_inquiry" => &[None, Some(4.0), None, None, Some(6.0)],
            "in_last_3m" => &[1, 1, 1, 1, 0],
        }
        .unwrap()
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = InquiryConfig {
            half_lives: vec![0.0],
            ..Default::default()
        };
        assert!(matches!(
            InquiryFeatureBuilder::new(config),
            Err(FeatureError::InvalidHalfLife(_))
        ));
    }

    #[test]
    fn test_build_matches_catalog_schema() {
        let features = build_inquiry_features(events().lazy(), &config()).unwrap();
        let names: Vec<String> = features
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, feature_columns(&config()));
        // E2 has no mortgage inquiries
        assert_eq!(features.height(), 2);
    }

    #[test]
    fn test_build_slices_exposes_each_slice() {
        let builder = InquiryFeatureBuilder::new(config()).unwrap();
        let set = builder.build_slices(events().lazy()).unwrap();

        assert_eq!(set.slices.len(), 3);
        assert_eq!(set.slice("all").unwrap().height(), 3);
        assert_eq!(set.slice("auto").unwrap().height(), 3);
        assert_eq!(set.slice("mortgage").unwrap().height(), 2);
        assert!(set.slice("other").is_none());
        assert_eq!(set.entity_count(), 2);
        assert!(set.features.equals_missing(&builder.build(events().lazy()).unwrap()));
    }

    #[test]
    fn test_missing_product_column_is_reported() {
        let data = events().drop("inquiry_product_type").unwrap();
        let err = build_inquiry_features(data.lazy(), &config()).unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn(c) if c == "inquiry_product_type"));
    }
}
