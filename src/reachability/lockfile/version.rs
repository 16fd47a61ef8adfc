/// Specifier prefixes that point somewhere other than a registry release
const NON_REGISTRY_PREFIXES: [&str; 7] = [
    "file:",
    "link:",
    "workspace:",
    "npm:",
    "git+",
    "git:",
    "github:",
];

/// Characters that only appear in ranges, never in a locked version
const RANGE_CHARS: [char; 9] = ['^', '~', '>', '<', '=', '*', '|', 'x', 'X'];

/// Returns true when `candidate` reads as a locked version rather than a range,
/// alias, tag-less wildcard or non-registry specifier.
pub fn is_resolved_version(candidate: &str) -> bool {
    let version = candidate.trim();
    if version.is_empty() {
        return false;
    }
    if version.chars().any(char::is_whitespace) {
        return false;
    }
    if version.contains(RANGE_CHARS) {
        return false;
    }
    if NON_REGISTRY_PREFIXES
        .iter()
        .any(|prefix| version.starts_with(prefix))
    {
        return false;
    }
    !version.contains("://")
}

/// Keeps `candidate` (trimmed) only when it is a resolved version
pub fn resolved_version(candidate: Option<&str>) -> Option<String> {
    candidate
        .filter(|v| is_resolved_version(v))
        .map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_versions_are_resolved() {
        for version in ["1.0.0", "4.17.21", "0.0.0-canary-c5b9375", "2.0.0-rc.1+build.5"] {
            assert!(is_resolved_version(version), "{} should be resolved", version);
        }
    }

    #[test]
    fn test_versions_containing_x_are_not_resolved() {
        for version in ["0.0.0-experimental-c5b9375", "1.0.0-x.1", "2.0.0-xyz", "3.0.0-BOX"] {
            assert!(!is_resolved_version(version), "{} should not be resolved", version);
        }
    }

    #[test]
    fn test_ranges_are_not_resolved() {
        for range in ["^1.0.0", "~2.1", ">=1.2.3", "<3", "=1.0.0", "*", "1 || 2", "1.x", "X", "1.2.X"] {
            assert!(!is_resolved_version(range), "{} should not be resolved", range);
        }
    }

    #[test]
    fn test_hyphen_range_with_whitespace_is_not_resolved() {
        assert!(!is_resolved_version("1.0.0 - 2.0.0"));
    }

    #[test]
    fn test_specifiers_are_not_resolved() {
        for spec in [
            "file:../local",
            "link:packages/a",
            "workspace:*",
            "npm:other@1.0.0",
            "git+https://github.com/a/b.git",
            "github:a/b",
            "https://registry.example.com/a.tgz",
        ] {
            assert!(!is_resolved_version(spec), "{} should not be resolved", spec);
        }
    }

    #[test]
    fn test_empty_is_not_resolved() {
        assert!(!is_resolved_version(""));
        assert!(!is_resolved_version("   "));
    }

    #[test]
    fn test_resolved_version_trims() {
        assert_eq!(resolved_version(Some(" 1.2.3 ")), Some("1.2.3".to_string()));
        assert_eq!(resolved_version(Some("^1.2.3")), None);
        assert_eq!(resolved_version(None), None);
    }
}
