use crate::ports::outbound::lockfile_reader::LOCKFILE_NAMES;
use crate::ports::outbound::{FindingsReader, LockfileReader, LockfileSource};
use crate::reachability::domain::Finding;
use crate::shared::error::ReachError;
use crate::shared::security::safe_read_to_string;
use crate::shared::Result;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_NAME: &str = "package.json";

/// FileSystemReader adapter for reading files from the file system
///
/// This adapter implements both LockfileReader and FindingsReader ports.
/// Every read goes through `shared::security` (no symlinks, regular files only,
/// 100 MB cap).
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// First candidate lockfile present in `project_path`.
    ///
    /// `symlink_metadata` is used so a symlinked lockfile is found, and then
    /// rejected by the security checks, instead of being skipped.
    fn discover_lockfile(project_path: &Path) -> Option<PathBuf> {
        LOCKFILE_NAMES
            .iter()
            .map(|name| project_path.join(name))
            .find(|candidate| fs::symlink_metadata(candidate).is_ok())
    }

    fn read_file(path: &Path, description: &str) -> Result<String> {
        safe_read_to_string(path, description).map_err(|e| {
            if e.to_string().starts_with("Security:") {
                ReachError::SecurityError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                    hint: "Point argus-reach at the real file instead of a link, or trim the file"
                        .to_string(),
                }
                .into()
            } else {
                ReachError::FileReadError {
                    path: path.to_path_buf(),
                    details: e.to_string(),
                }
                .into()
            }
        })
    }

    fn relative_source_file(project_path: &Path, lockfile: &Path) -> String {
        lockfile
            .strip_prefix(project_path)
            .unwrap_or(lockfile)
            .to_string_lossy()
            .into_owned()
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LockfileReader for FileSystemReader {
    fn read_lockfile(
        &self,
        project_path: &Path,
        lockfile_path: Option<&Path>,
    ) -> Result<LockfileSource> {
        let path = match lockfile_path {
            Some(explicit) => {
                if fs::symlink_metadata(explicit).is_err() {
                    return Err(ReachError::LockfileNotFound {
                        path: explicit.to_path_buf(),
                        suggestion: "The file passed with --lockfile does not exist.".to_string(),
                    }
                    .into());
                }
                explicit.to_path_buf()
            }
            None => Self::discover_lockfile(project_path).ok_or_else(|| {
                ReachError::LockfileNotFound {
                    path: project_path.to_path_buf(),
                    suggestion: format!(
                        "No package-lock.json, npm-shrinkwrap.json or yarn.lock in \"{}\".\n   \
                         Run in the root directory of an npm or yarn project, or pass --path / --lockfile.",
                        project_path.display()
                    ),
                }
            })?,
        };

        let content = Self::read_file(&path, "lockfile")?;

        let manifest_path = path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(MANIFEST_NAME);
        let manifest = if fs::symlink_metadata(&manifest_path).is_ok() {
            Some(Self::read_file(&manifest_path, MANIFEST_NAME)?)
        } else {
            None
        };

        Ok(LockfileSource {
            source_file: Self::relative_source_file(project_path, &path),
            path,
            content,
            manifest,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindingRecord {
    #[serde(alias = "id")]
    finding_id: String,
    package: String,
    #[serde(default)]
    version: Option<String>,
}

impl FindingsReader for FileSystemReader {
    fn read_findings(&self, path: &Path) -> Result<Vec<Finding>> {
        let content = Self::read_file(path, "findings file")?;
        let parse_error = |details: String| ReachError::FindingsParseError {
            path: path.to_path_buf(),
            details,
        };

        let document: Value =
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;

        let records = match document {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("findings") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(parse_error(
                        "expected a \"findings\" array in the top-level object".to_string(),
                    )
                    .into())
                }
            },
            _ => return Err(parse_error("expected a JSON array or object".to_string()).into()),
        };

        records
            .into_iter()
            .enumerate()
            .map(|(index, item)| -> Result<Finding> {
                let record: FindingRecord = serde_json::from_value(item)
                    .map_err(|e| parse_error(format!("finding #{}: {}", index, e)))?;
                Finding::new(record.finding_id, record.package, record.version)
                    .map_err(|e| parse_error(format!("finding #{}: {}", index, e)).into())
            })
            .collect()
    }
}
