// SPDX-License-Identifier: MIT OR Apache-2.0
//! Filesystem source loading.

use clipdeck_timeline::{ScheduleError, SourceLoader, SourceRef};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Reads clip sources from disk, resolving relative paths against a root
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    root: Option<PathBuf>,
}

impl FsLoader {
    /// Loader resolving relative locators against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Filesystem path of a source
    pub fn resolve(&self, source: &SourceRef) -> PathBuf {
        let path = Path::new(source.locator());
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SourceLoader for FsLoader {
    fn load(&self, source: &SourceRef) -> impl Future<Output = Result<Vec<u8>, ScheduleError>> {
        let path = self.resolve(source);
        let source_ref = source.to_string();
        async move {
            let bytes = tokio::fs::read(&path).await.map_err(|e| ScheduleError::Fetch {
                source_ref,
                reason: e.to_string(),
            })?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "Source loaded");
            Ok(bytes)
        }
    }
}
