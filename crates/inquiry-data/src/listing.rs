//! Object listing over a bucket/prefix layout.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lists the locations of stored objects.
pub trait FileLister {
    /// Locations of every object in `bucket` whose key starts with `prefix`,
    /// ordered by key. An empty result means nothing matched.
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

/// Lister over a local directory tree laid out as `root/bucket/key`
#[derive(Debug, Clone)]
pub struct LocalFileLister {
    root: PathBuf,
}

impl LocalFileLister {
    /// Create a lister rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the buckets
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Object key of `path` relative to the bucket directory, `/` separated.
fn object_key(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

impl FileLister for LocalFileLister {
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let bucket_dir = self.root.join(bucket);
        if !bucket_dir.is_dir() {
            debug!(bucket, "bucket directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        collect_files(&bucket_dir, &mut files)?;

        let mut matched: Vec<(String, PathBuf)> = files
            .into_iter()
            .filter_map(|path| object_key(&bucket_dir, &path).map(|key| (key, path)))
            .filter(|(key, _)| key.starts_with(prefix))
            .collect();
        matched.sort_by(|a, b| a.0.cmp(&b.0));

        debug!(bucket, prefix, matched = matched.len(), "listed objects");
        Ok(matched
            .into_iter()
            .map(|(_, path)| path.to_string_lossy().into_owned())
            .collect())
    }
}
