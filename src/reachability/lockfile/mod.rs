//! Lockfile parsing: npm v1, npm v2/v3 and yarn classic funnel into one raw
//! edge shape, which the canonicalizer turns into [`DependencyEdge`]s.

mod npm_legacy;
mod npm_packages;
pub mod version;
mod yarn;

use crate::reachability::domain::{DependencyEdge, RawEdge};
use crate::reachability::services::canonicalizer;
use crate::shared::error::LockfileParseError;
use chrono::{DateTime, Utc};
use serde_json::Value;

pub use yarn::{parse_yarn_lock, YarnLock};

/// Lockfile content as handed to the parser
#[derive(Debug, Clone, Copy)]
pub enum LockfileInput<'a> {
    /// Raw file content (JSON or yarn.lock text)
    Text(&'a str),
    /// Already-deserialized JSON lockfile
    Parsed(&'a Value),
}

impl<'a> From<&'a str> for LockfileInput<'a> {
    fn from(text: &'a str) -> Self {
        LockfileInput::Text(text)
    }
}

impl<'a> From<&'a String> for LockfileInput<'a> {
    fn from(text: &'a String) -> Self {
        LockfileInput::Text(text.as_str())
    }
}

impl<'a> From<&'a Value> for LockfileInput<'a> {
    fn from(value: &'a Value) -> Self {
        LockfileInput::Parsed(value)
    }
}

/// Build scope and provenance stamped onto every parsed edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileMeta {
    pub repo: String,
    pub build_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub source_file: Option<String>,
}

impl LockfileMeta {
    pub fn new(repo: impl Into<String>, build_id: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            build_id: build_id.into(),
            created_at: None,
            source_file: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }
}

/// Lockfile dialects understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileDialect {
    /// npm lockfile v2/v3 (`packages` map)
    NpmPackages,
    /// npm lockfile v1 (recursive `dependencies`)
    NpmLegacy,
    /// yarn classic `yarn.lock`
    YarnClassic,
}

impl LockfileDialect {
    /// Source file recorded on edges when the caller gives none
    pub fn default_source_file(&self) -> &'static str {
        match self {
            LockfileDialect::NpmPackages | LockfileDialect::NpmLegacy => "package-lock.json",
            LockfileDialect::YarnClassic => "yarn.lock",
        }
    }
}

/// Parses lockfile content into canonical dependency edges.
///
/// Unsupported lockfile versions and JSON without `packages`/`dependencies`
/// yield an empty list.
///
/// # Errors
/// `INVALID_JSON` when text input is neither JSON nor yarn lockfile syntax.
pub fn parse_lockfile<'a>(
    input: impl Into<LockfileInput<'a>>,
    meta: &LockfileMeta,
) -> Result<Vec<DependencyEdge>, LockfileParseError> {
    parse_lockfile_with_manifest(input, None, meta)
}

/// Like [`parse_lockfile`], additionally taking the project's `package.json`.
///
/// yarn lockfiles do not record the project's own dependencies, so the
/// manifest supplies the root edges; npm lockfiles ignore it.
pub fn parse_lockfile_with_manifest<'a>(
    input: impl Into<LockfileInput<'a>>,
    manifest: Option<&Value>,
    meta: &LockfileMeta,
) -> Result<Vec<DependencyEdge>, LockfileParseError> {
    match extract_raw_edges(input.into(), manifest)? {
        Some((dialect, raw_edges)) => Ok(canonicalizer::canonicalize(
            raw_edges,
            meta,
            dialect.default_source_file(),
        )),
        None => Ok(Vec::new()),
    }
}

/// Detects the dialect of `input` without canonicalizing anything.
/// `Ok(None)` means well-formed but unsupported.
pub fn detect_dialect(input: LockfileInput<'_>) -> Result<Option<LockfileDialect>, LockfileParseError> {
    Ok(extract_raw_edges(input, None)?.map(|(dialect, _)| dialect))
}

fn extract_raw_edges(
    input: LockfileInput<'_>,
    manifest: Option<&Value>,
) -> Result<Option<(LockfileDialect, Vec<RawEdge>)>, LockfileParseError> {
    match input {
        LockfileInput::Parsed(value) => Ok(extract_json(value)),
        LockfileInput::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => Ok(extract_json(&value)),
            Err(json_error) => match parse_yarn_lock(text) {
                Some(lock) => Ok(Some((LockfileDialect::YarnClassic, lock.raw_edges(manifest)))),
                None => Err(LockfileParseError::invalid_json(format!(
                    "content is neither valid JSON nor a yarn lockfile: {}",
                    json_error
                ))),
            },
        },
    }
}

fn extract_json(value: &Value) -> Option<(LockfileDialect, Vec<RawEdge>)> {
    let lockfile = value.as_object()?;

    let lockfile_version = match lockfile.get("lockfileVersion") {
        None | Some(Value::Null) => None,
        Some(version) => Some(version.as_u64()?),
    };
    if matches!(lockfile_version, Some(v) if !(1..=3).contains(&v)) {
        return None;
    }

    if lockfile_version != Some(1) {
        if let Some(packages) = lockfile.get("packages").and_then(Value::as_object) {
            if let Some(edges) = npm_packages::collect_raw_edges(packages) {
                return Some((LockfileDialect::NpmPackages, edges));
            }
        }
    }

    let dependencies = lockfile.get("dependencies").and_then(Value::as_object)?;
    Some((
        LockfileDialect::NpmLegacy,
        npm_legacy::collect_raw_edges(dependencies),
    ))
}
