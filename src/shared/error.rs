use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no reachable findings, or failing on reachability was not requested
    Success = 0,
    /// At least one finding was classified REACHABLE and `--fail-on-reachable` was set
    ReachableFindingsDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (lockfile/findings I/O, malformed input, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ReachableFindingsDetected => write!(f, "Reachable Findings Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Stable codes carried by [`LockfileParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockfileParseErrorCode {
    /// Text input is neither JSON nor yarn lockfile syntax
    InvalidJson,
}

impl LockfileParseErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockfileParseErrorCode::InvalidJson => "INVALID_JSON",
        }
    }
}

impl fmt::Display for LockfileParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised by the lockfile parser when its caller hands it unparseable text.
///
/// Unsupported-but-valid lockfiles never produce this error; they yield an
/// empty edge list instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("[{code}] {message}")]
pub struct LockfileParseError {
    pub code: LockfileParseErrorCode,
    pub message: String,
}

impl LockfileParseError {
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self {
            code: LockfileParseErrorCode::InvalidJson,
            message: message.into(),
        }
    }
}

/// Stable codes carried by [`ReachabilityComputeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReachabilityComputeErrorCode {
    /// The input is structurally malformed (wrong shape, blank required fields)
    InvalidInput,
}

impl ReachabilityComputeErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReachabilityComputeErrorCode::InvalidInput => "INVALID_INPUT",
        }
    }
}

impl fmt::Display for ReachabilityComputeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised by the reachability classifier for caller-contract violations only.
///
/// Ambiguous or incomplete dependency data is never an error; it is reported
/// through the status/reason pair of the result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("[{code}] {message}")]
pub struct ReachabilityComputeError {
    pub code: ReachabilityComputeErrorCode,
    pub message: String,
}

impl ReachabilityComputeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: ReachabilityComputeErrorCode::InvalidInput,
            message: message.into(),
        }
    }
}

/// Application-specific errors for reachability analysis.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum ReachError {
    #[error("Lockfile not found: {path}\n\n💡 Hint: {suggestion}")]
    LockfileNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse lockfile: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file is a package-lock.json, npm-shrinkwrap.json or yarn.lock")]
    LockfileParseError { path: PathBuf, details: String },

    #[error("Failed to parse findings file: {path}\nDetails: {details}\n\n💡 Hint: Findings must be a JSON array (or an object with a \"findings\" array) of {{\"findingId\", \"package\", \"version\"}} records")]
    FindingsParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid project directory")]
    InvalidProjectPath { path: PathBuf, reason: String },

    /// Validation error for request and config values
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
