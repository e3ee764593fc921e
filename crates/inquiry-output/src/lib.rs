#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/inquiry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coverage;
pub mod export;

pub use coverage::{CoverageReport, SliceCoverage};
pub use export::{
    CatalogRecord, ExportError, ExportFormat, Exporter, TableFormat, catalog_records,
    export_feature_table, feature_table_to_string, write_feature_table,
};
