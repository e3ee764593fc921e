//! Decay-Weight Annotator
//!
//! Adds one exponential recency weight per configured half-life, so that
//! inquiries closer to the application date count more when summed.
//!
//! For half-life H and elapsed days d the weight is:
//! w(d) = exp(-ln(2) * d / H)
//!
//! which is 1.0 at d = 0 and 0.5 at d = H. Missing elapsed days are imputed
//! to 0 and therefore receive full weight.

use crate::config::{InquiryConfig, decay_weight_column};
use crate::error::Result;
use crate::schema::require_numeric;
use polars::prelude::*;
use std::f64::consts::LN_2;

/// Decay weight for a single elapsed-days value.
pub fn decay_weight(days: f64, half_life: f64) -> f64 {
    (-LN_2 * days / half_life).exp()
}

/// Elapsed days with null and NaN imputed to zero.
fn imputed_days(days_column: &str) -> Expr {
    col(days_column)
        .cast(DataType::Float64)
        .fill_null(lit(0.0))
        .fill_nan(lit(0.0))
}

/// Expression computing the decay weight column for one half-life.
pub fn decay_weight_expr(days_column: &str, half_life: f64) -> Expr {
    (lit(-LN_2) * imputed_days(days_column) / lit(half_life))
        .exp()
        .alias(decay_weight_column(half_life))
}

/// Add a `__decay_{H}d` column for every configured half-life.
///
/// The input frame is left untouched; the returned plan adds the columns.
///
/// # Errors
/// Returns an error if the configuration is invalid (non-positive half-life
/// among others) or the elapsed-days column is missing or non-numeric.
pub fn annotate_decay_weights(data: LazyFrame, config: &InquiryConfig) -> Result<LazyFrame> {
    config.validate()?;

    let mut data = data;
    let schema = data.collect_schema()?;
    require_numeric(&schema, &config.days_from_application_column)?;

    let weights: Vec<Expr> = config
        .half_lives
        .iter()
        .map(|&h| decay_weight_expr(&config.days_from_application_column, h))
        .collect();

    Ok(data.with_columns(weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeatureError;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn weights(days: &[Option<f64>], half_lives: Vec<f64>) -> DataFrame {
        let df = df! {
            "days_from_application" => days,
        }
        .unwrap();
        let config = InquiryConfig {
            half_lives,
            ..Default::default()
        };
        annotate_decay_weights(df.lazy(), &config)
            .unwrap()
            .collect()
            .unwrap()
    }

    #[rstest]
    #[case(30.0)]
    #[case(90.0)]
    #[case(7.5)]
    fn test_half_life_halves_weight(#[case] half_life: f64) {
        let out = weights(&[Some(0.0), Some(half_life), Some(2.0 * half_life)], vec![half_life]);
        let column = decay_weight_column(half_life);
        let w: Vec<f64> = out
            .column(&column)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();

        assert_eq!(w[0], 1.0);
        assert_relative_eq!(w[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(w[2], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_days_get_full_weight() {
        let out = weights(&[None, Some(f64::NAN), Some(30.0)], vec![30.0]);
        let w = out.column("__decay_30d").unwrap().f64().unwrap();

        assert_eq!(w.null_count(), 0);
        assert_eq!(w.get(0), Some(1.0));
        assert_eq!(w.get(1), Some(1.0));
        assert_relative_eq!(w.get(2).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_one_column_per_half_life() {
        let out = weights(&[Some(10.0)], vec![30.0, 90.0]);
        assert_eq!(out.width(), 3);
        let w30 = out.column("__decay_30d").unwrap().f64().unwrap().get(0).unwrap();
        let w90 = out.column("__decay_90d").unwrap().f64().unwrap().get(0).unwrap();
        // Longer half-lives decay more slowly
        assert!(w90 > w30);
        assert_relative_eq!(w30, decay_weight(10.0, 30.0), epsilon = 1e-12);
    }

    #[test]
    fn test_integer_days_are_accepted() {
        let df = df! { "days_from_application" => &[0i64, 90] }.unwrap();
        let out = annotate_decay_weights(df.lazy(), &InquiryConfig::default())
            .unwrap()
            .collect()
            .unwrap();
        let w = out.column("__decay_90d").unwrap().f64().unwrap();
        assert_relative_eq!(w.get(1).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_half_life() {
        let df = df! { "days_from_application" => &[1.0] }.unwrap();
        let config = InquiryConfig {
            half_lives: vec![-30.0],
            ..Default::default()
        };
        let err = annotate_decay_weights(df.lazy(), &config).err().unwrap();
        assert!(matches!(err, FeatureError::InvalidHalfLife(h) if h == -30.0));
    }

    #[test]
    fn test_rejects_missing_days_column() {
        let df = df! { "elapsed" => &[1.0] }.unwrap();
        let err = annotate_decay_weights(df.lazy(), &InquiryConfig::default()).err().unwrap();
        assert!(matches!(err, FeatureError::MissingColumn(c) if c == "days_from_application"));
    }

    #[test]
    fn test_weight_is_monotone() {
        let mut previous = decay_weight(0.0, 30.0);
        for days in 1..200 {
            let w = decay_weight(f64::from(days), 30.0);
            assert!(w < previous);
            assert!(w > 0.0);
            previous = w;
        }
    }
}
