#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/inquiry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod catalog;
pub mod combine;
pub mod config;
pub mod decay;
pub mod error;
pub mod schema;
pub mod slice;

pub use builder::{FeatureSet, InquiryFeatureBuilder, build_inquiry_features};
pub use catalog::{FeatureInfo, Statistic, feature_catalog, feature_columns, slice_catalog};
pub use combine::combine_slices;
pub use config::{ALL_SLICE, DAYS_PER_MONTH, InquiryConfig};
pub use decay::{annotate_decay_weights, decay_weight};
pub use error::{FeatureError, Result};
pub use slice::{Slice, aggregate_slice};
