use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Lockfile names probed in a project directory, in priority order
pub const LOCKFILE_NAMES: [&str; 3] = ["package-lock.json", "npm-shrinkwrap.json", "yarn.lock"];

/// Raw lockfile text plus what the parser needs to label it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileSource {
    /// Absolute or caller-relative path that was read
    pub path: PathBuf,
    /// Path relative to the project directory, stamped on every edge
    pub source_file: String,
    pub content: String,
    /// Sibling `package.json`, when present
    pub manifest: Option<String>,
}

/// LockfileReader port for reading lockfile contents
///
/// This port abstracts the file system operations needed to locate and read
/// an npm or yarn lockfile.
pub trait LockfileReader {
    /// Reads the project's lockfile
    ///
    /// # Arguments
    /// * `project_path` - Project directory probed for [`LOCKFILE_NAMES`]
    /// * `lockfile_path` - Explicit lockfile overriding the probe
    ///
    /// # Returns
    /// The lockfile text, its project-relative name and the optional manifest
    ///
    /// # Errors
    /// Returns an error if:
    /// - No lockfile exists (or the explicit one is missing)
    /// - The file is a symlink, not a regular file, or too large
    /// - The file cannot be read due to permissions or I/O errors
    fn read_lockfile(&self, project_path: &Path, lockfile_path: Option<&Path>)
        -> Result<LockfileSource>;
}
