use argus_reach::prelude::*;
use std::path::{Path, PathBuf};

/// Mock LockfileReader for testing
pub struct MockLockfileReader {
    pub source_file: String,
    pub content: String,
    pub manifest: Option<String>,
    pub should_fail: bool,
}

impl MockLockfileReader {
    /// An npm lockfile (`package-lock.json`)
    pub fn new(content: &str) -> Self {
        Self::named("package-lock.json", content)
    }

    pub fn named(source_file: &str, content: &str) -> Self {
        Self {
            source_file: source_file.to_string(),
            content: content.to_string(),
            manifest: None,
            should_fail: false,
        }
    }

    pub fn with_manifest(mut self, manifest: &str) -> Self {
        self.manifest = Some(manifest.to_string());
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }
}

impl LockfileReader for MockLockfileReader {
    fn read_lockfile(
        &self,
        _project_path: &Path,
        _lockfile_path: Option<&Path>,
    ) -> Result<LockfileSource> {
        if self.should_fail {
            anyhow::bail!("Mock lockfile read failure");
        }
        Ok(LockfileSource {
            path: PathBuf::from(&self.source_file),
            source_file: self.source_file.clone(),
            content: self.content.clone(),
            manifest: self.manifest.clone(),
        })
    }
}
