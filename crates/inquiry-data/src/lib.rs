#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/inquiry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dates;
pub mod error;
pub mod listing;
pub mod loader;

pub use dates::normalize_date_column;
pub use error::{DataError, Result};
pub use listing::{FileLister, LocalFileLister};
pub use loader::{LocalTableLoader, TableFormat, TableLoader, load_all, load_from_list};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
