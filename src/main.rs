mod cli;

use argus_reach::adapters::outbound::console::StderrProgressReporter;
use argus_reach::adapters::outbound::filesystem::FileSystemReader;
use argus_reach::application::dto::{OutputFormat, ReachabilityRequest, ReachabilityResponse};
use argus_reach::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use argus_reach::application::use_cases::AnalyzeReachabilityUseCase;
use argus_reach::config::{self, ConfigFile};
use argus_reach::reachability::domain::DEFAULT_ANALYSIS_VERSION;
use argus_reach::shared::error::{ExitCode, ReachError};
use argus_reach::shared::Result;
use cli::Args;
use owo_colors::OwoColorize;
use std::collections::BTreeSet;
use std::path::Path;
use std::process;

/// Build id used when neither the CLI nor the config names one
const DEFAULT_BUILD_ID: &str = "local";

fn main() {
    // clap exits with code 2 on invalid arguments on its own
    let args = Args::parse_args();

    match run(args) {
        Ok(exit_code) => process::exit(exit_code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    validate_project_path(&args.path)?;

    let config = load_config(&args)?.unwrap_or_default();
    let settings = Settings::merge(&args, &config)?;

    // Create adapters (Dependency Injection)
    let lockfile_reader = FileSystemReader::new();
    let findings_reader = FileSystemReader::new();
    let progress_reporter = StderrProgressReporter::new();

    let use_case =
        AnalyzeReachabilityUseCase::new(lockfile_reader, findings_reader, progress_reporter);

    let request = ReachabilityRequest::new(args.path.clone(), settings.repo, settings.build_id)
        .with_lockfile(args.lockfile.clone())
        .with_findings(args.findings.clone())
        .with_analysis_version(settings.analysis_version)
        .with_ignored_findings(settings.ignored_findings)
        .with_include_edges(settings.include_edges);

    let response = use_case.execute(request)?;

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatter = FormatterFactory::create(settings.format);
    let formatted_output = formatter.format(&response)?;

    let presenter = PresenterFactory::create(PresenterType::from(args.output.clone()));
    presenter.present(&formatted_output)?;

    print_summary(&response);

    if settings.fail_on_reachable && response.has_reachable_findings() {
        return Ok(ExitCode::ReachableFindingsDetected);
    }
    Ok(ExitCode::Success)
}

/// Explicit `--config` wins over auto-discovery in the project directory
fn load_config(args: &Args) -> Result<Option<ConfigFile>> {
    if let Some(path) = &args.config {
        let loaded = config::load_config_from_path(path)?;
        eprintln!("⚙️  Using config file: {}", path.display());
        return Ok(Some(loaded));
    }

    let discovered = config::discover_config(&args.path)?;
    if discovered.is_some() {
        eprintln!(
            "⚙️  Auto-discovered config file: {}",
            args.path.join(config::CONFIG_FILENAME).display()
        );
    }
    Ok(discovered)
}

/// Effective run settings: CLI flags override config values
#[derive(Debug)]
struct Settings {
    format: OutputFormat,
    repo: String,
    build_id: String,
    analysis_version: String,
    include_edges: bool,
    fail_on_reachable: bool,
    ignored_findings: BTreeSet<String>,
}

impl Settings {
    fn merge(args: &Args, config: &ConfigFile) -> Result<Self> {
        let repo = match args.repo.clone().or_else(|| config.repo.clone()) {
            Some(repo) => repo,
            None => default_repo(&args.path)?,
        };
        let build_id = args
            .build_id
            .clone()
            .or_else(|| config.build_id.clone())
            .unwrap_or_else(|| DEFAULT_BUILD_ID.to_string());
        let analysis_version = args
            .analysis_version
            .clone()
            .or_else(|| config.analysis_version.clone())
            .unwrap_or_else(|| DEFAULT_ANALYSIS_VERSION.to_string());

        for (flag, value) in [
            ("--repo", &repo),
            ("--build-id", &build_id),
            ("--analysis-version", &analysis_version),
        ] {
            if value.trim().is_empty() {
                return Err(ReachError::Validation {
                    message: format!("{} must not be empty", flag),
                }
                .into());
            }
        }

        let mut ignored_findings: BTreeSet<String> = config.ignored_ids().into_iter().collect();
        ignored_findings.extend(
            args.ignore
                .iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        );

        Ok(Self {
            format: args.format.or(config.format).unwrap_or_default(),
            repo,
            build_id,
            analysis_version,
            include_edges: args.include_edges || config.include_edges.unwrap_or(false),
            fail_on_reachable: args.fail_on_reachable || config.fail_on_reachable.unwrap_or(false),
            ignored_findings,
        })
    }
}

/// Name of the project directory, used as the repo id when none is given
fn default_repo(project_path: &Path) -> Result<String> {
    let canonical = project_path
        .canonicalize()
        .map_err(|e| ReachError::InvalidProjectPath {
            path: project_path.to_path_buf(),
            reason: format!("Failed to canonicalize path: {}", e),
        })?;
    Ok(canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string()))
}

fn print_summary(response: &ReachabilityResponse) {
    if response.results.is_none() {
        eprintln!(
            "\n📦 {} dependency edge(s) ({} runtime)",
            response.edges.len(),
            response.runtime_edge_count()
        );
        return;
    }

    let counts = response.status_counts();
    eprintln!(
        "\n📊 Summary: {} reachable, {} unreachable, {} insufficient data",
        counts.reachable.to_string().red().bold(),
        counts.unreachable.to_string().green(),
        counts.insufficient_data.to_string().yellow()
    );
    if response.ignored_count > 0 {
        eprintln!("   {} finding(s) ignored", response.ignored_count.dimmed());
    }
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ReachError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| ReachError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(ReachError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(ReachError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["argus-reach"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_validate_project_path_valid_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_project_path(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_validate_project_path_nonexistent() {
        let nonexistent_path = PathBuf::from("/nonexistent/path/that/does/not/exist");
        let err_string = format!("{}", validate_project_path(&nonexistent_path).unwrap_err());
        assert!(err_string.contains("Directory does not exist"));
    }

    #[test]
    fn test_validate_project_path_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("package-lock.json");
        fs::write(&file_path, "{}").unwrap();

        let err_string = format!("{}", validate_project_path(&file_path).unwrap_err());
        assert!(err_string.contains("Not a directory"));
    }

    #[test]
    fn test_settings_cli_overrides_config() {
        let config = ConfigFile {
            repo: Some("from-config".to_string()),
            build_id: Some("cfg-build".to_string()),
            fail_on_reachable: Some(true),
            ..Default::default()
        };
        let settings = Settings::merge(
            &args(&["--repo", "from-cli", "-f", "markdown"]),
            &config,
        )
        .unwrap();

        assert_eq!(settings.repo, "from-cli");
        assert_eq!(settings.build_id, "cfg-build");
        assert!(settings.fail_on_reachable);
        assert_eq!(settings.format, OutputFormat::Markdown);
        assert_eq!(settings.analysis_version, "1.0");
    }

    #[test]
    fn test_settings_defaults_repo_to_directory_name() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("storefront");
        fs::create_dir(&project).unwrap();

        let settings = Settings::merge(
            &args(&["-p", project.to_str().unwrap()]),
            &ConfigFile::default(),
        )
        .unwrap();
        assert_eq!(settings.repo, "storefront");
        assert_eq!(settings.build_id, DEFAULT_BUILD_ID);
    }

    #[test]
    fn test_settings_merges_ignore_lists() {
        let config: ConfigFile =
            serde_yaml_ng::from_str("ignore_findings:\n  - id: GHSA-a\n").unwrap();
        let settings = Settings::merge(
            &args(&["--repo", "r", "--ignore", "GHSA-b", "--ignore", " "]),
            &config,
        )
        .unwrap();
        let ids: Vec<&str> = settings.ignored_findings.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["GHSA-a", "GHSA-b"]);
    }

    #[test]
    fn test_settings_rejects_blank_build_id() {
        let err = Settings::merge(&args(&["--repo", "r", "--build-id", " "]), &ConfigFile::default())
            .unwrap_err();
        assert!(err.to_string().contains("--build-id must not be empty"));
    }
}
