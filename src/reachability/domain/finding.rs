use crate::shared::Result;

/// Maximum length for finding identifiers (security limit)
const MAX_FINDING_ID_LENGTH: usize = 255;

/// Maximum length for npm package names (npm's own limit is 214)
const MAX_PACKAGE_NAME_LENGTH: usize = 214;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Finding value object: a vulnerability report tied to one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    finding_id: String,
    package: String,
    version: Option<String>,
}

impl Finding {
    pub fn new(finding_id: String, package: String, version: Option<String>) -> Result<Self> {
        let finding_id = finding_id.trim().to_string();
        let package = package.trim().to_string();
        let version = version
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        if finding_id.is_empty() {
            anyhow::bail!("Finding id cannot be empty");
        }
        if finding_id.len() > MAX_FINDING_ID_LENGTH {
            anyhow::bail!(
                "Finding id is too long ({} bytes). Maximum allowed: {} bytes",
                finding_id.len(),
                MAX_FINDING_ID_LENGTH
            );
        }

        if package.is_empty() {
            anyhow::bail!("Package name of finding '{}' cannot be empty", finding_id);
        }
        if package.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name of finding '{}' is too long ({} bytes). Maximum allowed: {} bytes",
                finding_id,
                package.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }
        if package.chars().any(|c| c.is_whitespace() || c.is_control()) {
            anyhow::bail!(
                "Package name of finding '{}' contains whitespace or control characters",
                finding_id
            );
        }

        if let Some(v) = &version {
            if v.len() > MAX_VERSION_LENGTH {
                anyhow::bail!(
                    "Version of finding '{}' is too long ({} bytes). Maximum allowed: {} bytes",
                    finding_id,
                    v.len(),
                    MAX_VERSION_LENGTH
                );
            }
        }

        Ok(Self {
            finding_id,
            package,
            version,
        })
    }

    pub fn finding_id(&self) -> &str {
        &self.finding_id
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
