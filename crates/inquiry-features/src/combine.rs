//! Slice Combiner
//!
//! Folds per-slice feature tables into one wide table with ordered inner
//! joins on the entity id. An entity missing from any slice is dropped.

use crate::error::{FeatureError, Result};
use crate::slice::Slice;
use polars::prelude::*;
use tracing::debug;

/// Inner-join slice tables on the entity column, in the order given.
///
/// The first table is the base; each following table is joined onto it. When
/// no entity is common to every slice the result is empty but keeps every
/// slice's columns.
///
/// # Errors
/// Returns [`FeatureError::NoSlices`] when `slices` is empty.
pub fn combine_slices(
    entity_column: &str,
    slices: impl IntoIterator<Item = (Slice, LazyFrame)>,
) -> Result<LazyFrame> {
    let mut slices = slices.into_iter();
    let (base_slice, base) = slices.next().ok_or(FeatureError::NoSlices)?;
    debug!(slice = %base_slice, "combining slices onto base");

    let combined = slices.fold(base, |acc, (slice, frame)| {
        debug!(%slice, "inner-joining slice");
        acc.join(
            frame,
            [col(entity_column)],
            [col(entity_column)],
            JoinArgs::new(JoinType::Inner),
        )
    });

    Ok(combined.sort([entity_column], SortMultipleOptions::default()))
}
