//! Onboarding pipeline.
//!
//! Lists stored inquiry files, loads one of them or all of them stacked,
//! normalizes the date columns and builds the feature tables.

use inquiry_data::{
    DataError, FileLister, TableLoader, load_all, load_from_list, normalize_date_column,
};
use inquiry_features::{FeatureError, FeatureSet, InquiryConfig, InquiryFeatureBuilder};
use polars::prelude::*;
use tracing::{info, warn};

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Listing, loading or date normalization failed.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Feature construction failed.
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Loader wrapper reporting each finished load.
struct ObservedLoader<'a, T: ?Sized, F> {
    inner: &'a T,
    on_load: F,
}

impl<T, F> TableLoader for ObservedLoader<'_, T, F>
where
    T: TableLoader + ?Sized,
    F: Fn(&str),
{
    fn load(&self, location: &str) -> inquiry_data::Result<DataFrame> {
        let frame = self.inner.load(location)?;
        (self.on_load)(location);
        Ok(frame)
    }
}

/// List, load, normalize and build in one place.
#[derive(Debug, Clone)]
pub struct OnboardingPipeline<L, T> {
    lister: L,
    loader: T,
    builder: InquiryFeatureBuilder,
}

impl<L: FileLister, T: TableLoader> OnboardingPipeline<L, T> {
    /// Create a pipeline.
    ///
    /// # Errors
    /// Returns an error if `config` fails validation.
    pub fn new(lister: L, loader: T, config: InquiryConfig) -> Result<Self> {
        Ok(Self {
            lister,
            loader,
            builder: InquiryFeatureBuilder::new(config)?,
        })
    }

    /// Configuration features are built with.
    pub const fn config(&self) -> &InquiryConfig {
        self.builder.config()
    }

    /// Locations under `bucket`/`prefix`, ordered by key.
    ///
    /// # Errors
    /// Returns [`DataError::NoFiles`] when nothing matches.
    pub fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let locations = self.lister.list(bucket, prefix)?;
        if locations.is_empty() {
            warn!(bucket, prefix, "no files matched");
            return Err(DataError::NoFiles {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
            }
            .into());
        }
        info!(bucket, prefix, files = locations.len(), "listed inquiry files");
        Ok(locations)
    }

    /// Load the `index`-th listed file, or every listed file stacked when
    /// `index` is `None`.
    ///
    /// # Errors
    /// Returns an error if listing finds nothing, the index is out of range
    /// or a file cannot be read.
    pub fn load(&self, bucket: &str, prefix: &str, index: Option<usize>) -> Result<DataFrame> {
        let locations = self.list(bucket, prefix)?;
        match index {
            Some(index) => Ok(load_from_list(&self.loader, &locations, index)?),
            None => self.load_locations(&locations, |_| {}),
        }
    }

    /// Load and stack `locations`, calling `on_load` after each file.
    ///
    /// # Errors
    /// Returns the first loading or concatenation error.
    pub fn load_locations<F: Fn(&str)>(&self, locations: &[String], on_load: F) -> Result<DataFrame> {
        let observed = ObservedLoader {
            inner: &self.loader,
            on_load,
        };
        let data = load_all(&observed, locations)?;
        info!(files = locations.len(), rows = data.height(), "loaded inquiry events");
        Ok(data)
    }

    /// Normalize the reference and inquiry date columns that are present.
    ///
    /// Columns already typed as dates are kept as they are. The inquiry date
    /// is normalized last, so the rows end up ordered by it.
    ///
    /// # Errors
    /// Returns an error if polars cannot resolve the schema.
    pub fn prepare(&self, data: DataFrame) -> Result<LazyFrame> {
        let config = self.config();
        let mut data = data.lazy();
        for column in [&config.reference_date_column, &config.inquiry_date_column] {
            let schema = data.collect_schema()?;
            match schema.get(column) {
                Some(DataType::Date | DataType::Datetime(_, _)) | None => {}
                Some(_) => data = normalize_date_column(data, column)?,
            }
        }
        Ok(data)
    }

    /// Prepare `data` and build every slice table plus the combined table.
    ///
    /// # Errors
    /// Returns an error if the events fail validation or polars fails.
    pub fn build(&self, data: DataFrame) -> Result<FeatureSet> {
        let prepared = self.prepare(data)?;
        Ok(self.builder.build_slices(prepared)?)
    }

    /// Load `index` (or everything) under `bucket`/`prefix` and build.
    ///
    /// # Errors
    /// Same as [`Self::load`] and [`Self::build`].
    pub fn run(&self, bucket: &str, prefix: &str, index: Option<usize>) -> Result<FeatureSet> {
        let data = self.load(bucket, prefix, index)?;
        self.build(data)
    }

    /// Load every file under `bucket`/`prefix` and build.
    ///
    /// # Errors
    /// Same as [`Self::run`].
    pub fn run_all(&self, bucket: &str, prefix: &str) -> Result<FeatureSet> {
        self.run(bucket, prefix, None)
    }
}
