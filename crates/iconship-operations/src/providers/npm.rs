use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::traits::{CommandRunner, CommandSpec, RegistryProvider};
use crate::{OperationError, Result};

const NPM: &str = "npm";

/// Registry queries through the npm CLI.
pub struct NpmCliProvider {
    runner: Arc<dyn CommandRunner>,
}

impl NpmCliProvider {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

fn is_not_published(output: &str) -> bool {
    output.contains("E404")
        || output.to_lowercase().contains("404 not found")
        || output.contains("is not in this registry")
}

/// Reads the version out of `npm view <pkg> version --json` output.
///
/// npm prints a bare string for one matching version and an array when
/// several match; the last element of an array is the newest.
fn parse_view_output(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(versions)) => versions.last().map(value_to_string),
        Ok(Value::Null) => None,
        Ok(value) => Some(value_to_string(&value)),
        Err(_) => Some(raw.trim_matches('"').to_string()),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RegistryProvider for NpmCliProvider {
    fn whoami(&self, project_root: &Path) -> Result<String> {
        let spec = CommandSpec::new(NPM, project_root).arg("whoami");
        let output = self.runner.run_checked("preflight", &spec)?;
        Ok(output.stdout.trim().to_string())
    }

    fn published_version(&self, project_root: &Path, package: &str) -> Result<Option<String>> {
        let spec = CommandSpec::new(NPM, project_root).args(["view", package, "version", "--json"]);
        let output = self.runner.run("publish-guard", &spec)?;

        if !output.success() {
            if is_not_published(&output.combined()) {
                return Ok(None);
            }
            return Err(OperationError::RegistryQueryFailed {
                package: package.to_string(),
                output: output.failure_summary(),
            });
        }

        Ok(parse_view_output(&output.stdout))
    }
}
