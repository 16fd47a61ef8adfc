use crate::application::dto::ReachabilityResponse;
use crate::shared::Result;

/// ReachabilityFormatter port for rendering analysis reports
///
/// Implemented once per [`crate::application::dto::OutputFormat`].
pub trait ReachabilityFormatter {
    /// Renders the response as a complete document
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, response: &ReachabilityResponse) -> Result<String>;
}
