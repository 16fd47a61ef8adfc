use argus_reach::application::dto::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Decide whether vulnerable npm/yarn packages are reachable at runtime
#[derive(Parser, Debug)]
#[command(name = "argus-reach")]
#[command(version)]
#[command(
    about = "Decide whether vulnerable npm/yarn packages are reachable at runtime",
    long_about = "Reads a package-lock.json, npm-shrinkwrap.json or yarn.lock, builds the runtime \
                  dependency graph and classifies each finding as REACHABLE, UNREACHABLE or \
                  INSUFFICIENT_DATA with the shortest evidence path from the project root.\n\n\
                  Without --findings the canonical dependency edges are printed instead."
)]
pub struct Args {
    /// Path to the project directory
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Lockfile to analyze (default: discovered in the project directory)
    #[arg(short, long, value_name = "FILE")]
    pub lockfile: Option<PathBuf>,

    /// Findings JSON file; without it only the dependency edges are reported
    #[arg(short = 'i', long, value_name = "FILE")]
    pub findings: Option<PathBuf>,

    /// Repository identifier stamped on edges and verdicts
    #[arg(long)]
    pub repo: Option<String>,

    /// Build identifier stamped on edges and verdicts
    #[arg(long)]
    pub build_id: Option<String>,

    /// Output format: json or markdown
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file (default: argus-reach.config.yml in the project directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Analysis version recorded on every verdict
    #[arg(long, value_name = "VERSION")]
    pub analysis_version: Option<String>,

    /// Include the full dependency edge list in the report
    #[arg(long)]
    pub include_edges: bool,

    /// Exit with code 1 when any finding is reachable
    #[arg(long)]
    pub fail_on_reachable: bool,

    /// Finding ids to skip (repeatable), merged with ignore_findings from the config
    #[arg(long = "ignore", value_name = "FINDING_ID")]
    pub ignore: Vec<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["argus-reach"]).unwrap();
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.findings.is_none());
        assert!(args.format.is_none());
        assert!(!args.include_edges);
        assert!(!args.fail_on_reachable);
        assert!(args.ignore.is_empty());
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "argus-reach",
            "-p",
            "apps/web",
            "-l",
            "apps/web/yarn.lock",
            "-i",
            "findings.json",
            "-f",
            "md",
            "-o",
            "report.md",
        ])
        .unwrap();
        assert_eq!(args.path, PathBuf::from("apps/web"));
        assert_eq!(args.lockfile, Some(PathBuf::from("apps/web/yarn.lock")));
        assert_eq!(args.findings, Some(PathBuf::from("findings.json")));
        assert_eq!(args.format, Some(OutputFormat::Markdown));
        assert_eq!(args.output, Some(PathBuf::from("report.md")));
    }

    #[test]
    fn test_long_flags() {
        let args = Args::try_parse_from([
            "argus-reach",
            "--repo",
            "acme/web",
            "--build-id",
            "b-17",
            "--analysis-version",
            "2.0",
            "--include-edges",
            "--fail-on-reachable",
            "--ignore",
            "GHSA-1",
            "--ignore",
            "GHSA-2",
        ])
        .unwrap();
        assert_eq!(args.repo.as_deref(), Some("acme/web"));
        assert_eq!(args.build_id.as_deref(), Some("b-17"));
        assert_eq!(args.analysis_version.as_deref(), Some("2.0"));
        assert!(args.include_edges);
        assert!(args.fail_on_reachable);
        assert_eq!(args.ignore, vec!["GHSA-1", "GHSA-2"]);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let err = Args::try_parse_from(["argus-reach", "-f", "sarif"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
