use argus_reach::prelude::*;
use std::path::Path;

/// Mock FindingsReader for testing
#[derive(Default)]
pub struct MockFindingsReader {
    findings: Vec<(String, String, Option<String>)>,
    should_fail: bool,
}

impl MockFindingsReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_finding(mut self, finding_id: &str, package: &str, version: Option<&str>) -> Self {
        self.findings.push((
            finding_id.to_string(),
            package.to_string(),
            version.map(str::to_string),
        ));
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }
}

impl FindingsReader for MockFindingsReader {
    fn read_findings(&self, _path: &Path) -> Result<Vec<Finding>> {
        if self.should_fail {
            anyhow::bail!("Mock findings read failure");
        }
        self.findings
            .iter()
            .map(|(id, package, version)| Finding::new(id.clone(), package.clone(), version.clone()))
            .collect()
    }
}
