/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod output_format;
mod reachability_request;
mod reachability_response;

pub use output_format::OutputFormat;
pub use reachability_request::ReachabilityRequest;
pub use reachability_response::{ReachabilityResponse, ReportMetadata, StatusCounts};
