//! yarn classic (`yarn.lock` v1) text format.
//!
//! ```text
//! # yarn lockfile v1
//!
//! "@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
//!   version "7.12.13"
//!   dependencies:
//!     "@babel/highlight" "^7.12.13"
//! ```

use super::version::resolved_version;
use crate::reachability::domain::{DependencyScope, RawEdge, ROOT_SENTINEL};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

const LOCKFILE_MARKER: &str = "# yarn lockfile v1";

/// Manifest fields that seed root edges when a package.json is available
const MANIFEST_DEPENDENCY_FIELDS: [(&str, DependencyScope); 4] = [
    ("dependencies", DependencyScope::Runtime),
    ("devDependencies", DependencyScope::Dev),
    ("optionalDependencies", DependencyScope::Optional),
    ("peerDependencies", DependencyScope::Peer),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct YarnBlock {
    name: String,
    version: Option<String>,
    dependencies: Vec<(String, String)>,
}

impl YarnBlock {
    fn new(name: String) -> Self {
        Self {
            name,
            version: None,
            dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubBlock {
    Dependencies,
    Other,
}

/// Parsed yarn lockfile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YarnLock {
    blocks: Vec<YarnBlock>,
}

impl YarnLock {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Emits one runtime edge per declared dependency, resolving each name to the
    /// lexicographically smallest version any block locked it at. With a
    /// manifest, the project's own dependency fields become root edges.
    pub fn raw_edges(&self, manifest: Option<&Value>) -> Vec<RawEdge> {
        let mut known_versions: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for block in &self.blocks {
            if let Some(version) = &block.version {
                known_versions
                    .entry(block.name.as_str())
                    .or_default()
                    .insert(version.as_str());
            }
        }
        let smallest = |name: &str| -> Option<String> {
            known_versions
                .get(name)
                .and_then(|versions| versions.iter().next())
                .map(|v| v.to_string())
        };

        let mut edges = Vec::new();

        if let Some(manifest) = manifest {
            for (field, scope) in MANIFEST_DEPENDENCY_FIELDS {
                let Some(dependencies) = manifest.get(field).and_then(Value::as_object) else {
                    continue;
                };
                for name in dependencies.keys() {
                    edges.push(RawEdge::new(
                        ROOT_SENTINEL,
                        name.as_str(),
                        smallest(name),
                        scope,
                        Some(1),
                    ));
                }
            }
        }

        for block in &self.blocks {
            for (dependency, _range) in &block.dependencies {
                edges.push(RawEdge::new(
                    block.name.as_str(),
                    dependency.as_str(),
                    smallest(dependency),
                    DependencyScope::Runtime,
                    None,
                ));
            }
        }

        edges
    }
}

/// Parses yarn classic lockfile text.
///
/// Returns `None` when the text carries neither the lockfile marker nor a
/// single block header, i.e. it is not yarn syntax at all.
pub fn parse_yarn_lock(text: &str) -> Option<YarnLock> {
    let mut has_marker = false;
    let mut blocks = Vec::new();
    let mut current: Option<YarnBlock> = None;
    let mut sub_block: Option<(SubBlock, usize)> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim_end();
        let content = line.trim_start();
        if content.is_empty() {
            continue;
        }
        if content.starts_with('#') {
            if content.starts_with(LOCKFILE_MARKER) {
                has_marker = true;
            }
            continue;
        }

        let indent = line.len() - content.len();
        if indent == 0 {
            blocks.extend(current.take());
            sub_block = None;
            if let Some(header) = line.strip_suffix(':') {
                current = block_name(header).map(YarnBlock::new);
            }
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        if let Some((kind, sub_indent)) = sub_block {
            if indent > sub_indent {
                if kind == SubBlock::Dependencies {
                    if let Some((name, range)) = split_entry(content) {
                        block.dependencies.push((name, range));
                    }
                }
                continue;
            }
            sub_block = None;
        }

        if let Some(key) = content.strip_suffix(':') {
            let kind = if key.trim_matches('"') == "dependencies" {
                SubBlock::Dependencies
            } else {
                SubBlock::Other
            };
            sub_block = Some((kind, indent));
            continue;
        }

        if let Some((key, value)) = split_entry(content) {
            if key == "version" {
                block.version = resolved_version(Some(&value));
            }
        }
    }
    blocks.extend(current);

    if !has_marker && blocks.is_empty() {
        return None;
    }
    Some(YarnLock { blocks })
}

/// Canonical block name from the header's first selector:
/// `"@scope/pkg@^1.0.0", "@scope/pkg@^1.2.0"` -> `@scope/pkg`.
/// A selector without a `@<range>` part is not a yarn header.
fn block_name(header: &str) -> Option<String> {
    let first = header.split(',').next()?.trim().trim_matches('"').trim();
    let separator = if let Some(rest) = first.strip_prefix('@') {
        rest.find('@').map(|index| index + 1)
    } else {
        first.find('@')
    };
    let name = &first[..separator?];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some(name.to_string())
}

/// Splits `key "value"`, `"key" "value"`, `key value` or `key: value`
fn split_entry(content: &str) -> Option<(String, String)> {
    let (key, rest) = if let Some(quoted) = content.strip_prefix('"') {
        let end = quoted.find('"')?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        let end = content.find(char::is_whitespace)?;
        (&content[..end], &content[end..])
    };
    let key = key.trim_end_matches(':');
    let value = rest.trim().trim_start_matches(':').trim().trim_matches('"');
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
  version "7.12.13"
  resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.12.13.tgz"
  integrity sha512-abc
  dependencies:
    "@babel/highlight" "^7.12.13"

"@babel/highlight@^7.12.13":
  version "7.13.10"
  dependencies:
    chalk "^2.0.0"
    js-tokens "^4.0.0"

chalk@^2.0.0:
  version "2.4.2"

chalk@^4.0.0:
  version "4.1.2"

js-tokens@^4.0.0:
  version "4.0.0"
"#;

    #[test]
    fn test_parse_blocks() {
        let lock = parse_yarn_lock(SAMPLE).unwrap();
        assert_eq!(lock.block_count(), 5);
        assert_eq!(lock.blocks[0].name, "@babel/code-frame");
        assert_eq!(lock.blocks[0].version.as_deref(), Some("7.12.13"));
        assert_eq!(
            lock.blocks[0].dependencies,
            vec![("@babel/highlight".to_string(), "^7.12.13".to_string())]
        );
        assert_eq!(lock.blocks[1].dependencies.len(), 2);
    }

    #[test]
    fn test_raw_edges_use_smallest_known_version() {
        let lock = parse_yarn_lock(SAMPLE).unwrap();
        let edges = lock.raw_edges(None);

        assert_eq!(edges.len(), 3);
        let chalk = edges.iter().find(|e| e.child == "chalk").unwrap();
        assert_eq!(chalk.parent, "@babel/highlight");
        assert_eq!(chalk.version.as_deref(), Some("2.4.2"));
        assert!(edges.iter().all(|e| e.scope == DependencyScope::Runtime));
        assert!(edges.iter().all(|e| e.parent != ROOT_SENTINEL));
    }

    #[test]
    fn test_lexicographic_not_semver_ordering() {
        let text = "lib@^9.0.0:\n  version \"9.0.0\"\n\nlib@^10.0.0:\n  version \"10.0.0\"\n\napp@1.0.0:\n  version \"1.0.0\"\n  dependencies:\n    lib \"^9.0.0\"\n";
        let edges = parse_yarn_lock(text).unwrap().raw_edges(None);
        assert_eq!(edges[0].version.as_deref(), Some("10.0.0"));
    }

    #[test]
    fn test_unknown_dependency_has_no_version() {
        let text = "a@^1.0.0:\n  version \"1.0.0\"\n  dependencies:\n    missing \"^2.0.0\"\n";
        let edges = parse_yarn_lock(text).unwrap().raw_edges(None);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].version, None);
    }

    #[test]
    fn test_manifest_seeds_root_edges() {
        let lock = parse_yarn_lock(SAMPLE).unwrap();
        let manifest = json!({
            "dependencies": {"@babel/code-frame": "^7.0.0"},
            "devDependencies": {"chalk": "^4.0.0"}
        });
        let edges = lock.raw_edges(Some(&manifest));

        let root_edges: Vec<&RawEdge> = edges.iter().filter(|e| e.parent == ROOT_SENTINEL).collect();
        assert_eq!(root_edges.len(), 2);
        let code_frame = root_edges.iter().find(|e| e.child == "@babel/code-frame").unwrap();
        assert_eq!(code_frame.scope, DependencyScope::Runtime);
        assert_eq!(code_frame.version.as_deref(), Some("7.12.13"));
        let chalk = root_edges.iter().find(|e| e.child == "chalk").unwrap();
        assert_eq!(chalk.scope, DependencyScope::Dev);
    }

    #[test]
    fn test_optional_dependencies_sub_block_is_skipped() {
        let text = "a@1.0.0:\n  version \"1.0.0\"\n  optionalDependencies:\n    fsevents \"^2.0.0\"\n  dependencies:\n    b \"^1.0.0\"\n";
        let edges = parse_yarn_lock(text).unwrap().raw_edges(None);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].child, "b");
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "# yarn lockfile v1\r\n\r\na@1.0.0:\r\n  version \"1.0.0\"\r\n  dependencies:\r\n    b \"^1.0.0\"\r\n";
        let lock = parse_yarn_lock(text).unwrap();
        assert_eq!(lock.block_count(), 1);
        assert_eq!(lock.blocks[0].version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_marker_only_is_yarn() {
        let lock = parse_yarn_lock("# yarn lockfile v1\n").unwrap();
        assert_eq!(lock.block_count(), 0);
    }

    #[test]
    fn test_not_yarn() {
        assert!(parse_yarn_lock("").is_none());
        assert!(parse_yarn_lock("{ \"broken\": ").is_none());
        assert!(parse_yarn_lock("just some prose\nwithout headers").is_none());
    }

    #[test]
    fn test_block_name() {
        assert_eq!(block_name("lodash@^4.17.0").as_deref(), Some("lodash"));
        assert_eq!(block_name("\"@types/node@*\", \"@types/node@^18\"").as_deref(), Some("@types/node"));
        assert_eq!(block_name("\"string-width-cjs@npm:string-width@^4.2.0\"").as_deref(), Some("string-width-cjs"));
        assert_eq!(block_name("bare").as_deref(), None);
        assert_eq!(block_name("\"\"").as_deref(), None);
        assert_eq!(block_name("{ \"broken\"").as_deref(), None);
    }
}
