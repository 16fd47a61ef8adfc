use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReachabilityFormatter;

/// Factory for creating report formatters
///
/// Selects the formatter adapter for an [`OutputFormat`].
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use argus_reach::application::dto::OutputFormat;
    /// use argus_reach::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Markdown);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn ReachabilityFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use argus_reach::application::dto::OutputFormat;
    /// use argus_reach::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Rendering JSON reachability report...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Rendering JSON reachability report...",
            OutputFormat::Markdown => "📝 Rendering Markdown reachability report...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{ReachabilityResponse, ReportMetadata};

    fn empty_response() -> ReachabilityResponse {
        let metadata = ReportMetadata::new("acme/web", "b-1", "1.0", "yarn.lock", 0);
        ReachabilityResponse::new(metadata, vec![], Some(vec![]), 0, false)
    }

    #[test]
    fn test_create_json_formatter() {
        let output = FormatterFactory::create(OutputFormat::Json)
            .format(&empty_response())
            .unwrap();
        assert!(output.trim_start().starts_with('{'));
    }

    #[test]
    fn test_create_markdown_formatter() {
        let output = FormatterFactory::create(OutputFormat::Markdown)
            .format(&empty_response())
            .unwrap();
        assert!(output.starts_with("# Dependency Reachability Report"));
    }

    #[test]
    fn test_progress_message_markdown() {
        let message = FormatterFactory::progress_message(OutputFormat::Markdown);
        assert_eq!(message, "📝 Rendering Markdown reachability report...");
    }
}
