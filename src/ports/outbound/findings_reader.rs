use crate::reachability::domain::Finding;
use crate::shared::Result;
use std::path::Path;

/// FindingsReader port for loading vulnerability findings
///
/// A findings document is either a JSON array of records or an object with a
/// `findings` array. Each record carries `findingId` (or `id`), `package` and
/// an optional `version`.
pub trait FindingsReader {
    /// Reads and validates the findings at `path`
    ///
    /// # Errors
    /// Returns an error if the file is unreadable, not JSON, or any record
    /// fails [`Finding`] validation
    fn read_findings(&self, path: &Path) -> Result<Vec<Finding>>;
}
