use anyhow::{Context, Result};
use regex::Regex;

use crate::model::PackageSpec;

pub fn parse_manifest(text: &str) -> Result<Vec<PackageSpec>> {
    let pattern = Regex::new(r"([A-Za-z0-9_.-]+)(?:==([0-9.]*))?")
        .context("failed to compile manifest entry regex")?;

    let mut packages = Vec::new();
    for captures in pattern.captures_iter(text) {
        let Some(name) = captures.get(1) else {
            continue;
        };
        let version = captures
            .get(2)
            .map(|value| value.as_str().to_string())
            .unwrap_or_default();

        packages.push(PackageSpec {
            name: name.as_str().to_string(),
            version,
        });
    }

    Ok(packages)
}
