//! Integration tests for feature table export and coverage reporting.

use inquiry_features::{InquiryConfig, InquiryFeatureBuilder, feature_columns};
use inquiry_output::{CoverageReport, ExportFormat, Exporter, TableFormat, export_feature_table};
use polars::prelude::*;
use rstest::rstest;

fn events() -> DataFrame {
    df! {
        "ZEST_KEY" => &["E1", "E1", "E2", "E3", "E3"],
        "inquiry_product_type" => &["auto", "mortgage", "auto", "auto", "mortgage"],
        "days_from_application" => &[40.0, 5.0, 3.0, 100.0, 0.0],
        "days_since_last_inquiry" => &[None, Some(35.0), None, None, Some(100.0)],
        "in_last_1m" => &[0, 1, 1, 0, 1],
        "in_last_3m" => &[1, 1, 1, 0, 1],
        "in_last_6m" => &[1, 1, 1, 1, 1],
        "in_last_9m" => &[1, 1, 1, 1, 1],
        "in_last_12m" => &[1, 1, 1, 1, 1],
    }
    .unwrap()
}

fn builder() -> InquiryFeatureBuilder {
    InquiryFeatureBuilder::new(InquiryConfig {
        product_groups: vec!["auto".to_string(), "mortgage".to_string()],
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_coverage_of_built_features() {
    let set = builder().build_slices(events().lazy()).unwrap();
    let report = CoverageReport::from_feature_set(&set, "ZEST_KEY");

    assert_eq!(report.total_entities, 3);
    assert_eq!(report.retained_entities, 2);
    let mortgage = report.slices.iter().find(|s| s.slice == "mortgage").unwrap();
    assert_eq!(mortgage.entities, 2);
    assert_eq!(mortgage.missing, 1);
    assert_eq!(mortgage.dropped, 0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coverage.csv");
    report.export_to_file(&path, ExportFormat::Csv).unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content.lines().count(), 4);
}

#[rstest]
#[case(TableFormat::Csv)]
#[case(TableFormat::Json)]
#[case(TableFormat::NdJson)]
fn test_feature_table_file_export(#[case] format: TableFormat) {
    let builder = builder();
    let mut features = builder.build(events().lazy()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("features.{}", format.extension()));
    export_feature_table(&mut features, &path, format).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    for name in feature_columns(builder.config()) {
        assert!(content.contains(&name), "missing column {name}");
    }
    assert!(content.contains("E3"));
    assert!(!content.contains("E2"));
}
