#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/inquiry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use inquiry_data as data;
pub use inquiry_features as features;
pub use inquiry_output as output;

pub use pipeline::{OnboardingPipeline, PipelineError};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
