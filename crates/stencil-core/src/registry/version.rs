//! Version resolution against the registry
//!
//! `resolve_latest` picks the highest published version by semver precedence.
//! `resolve_satisfying` picks the highest caret-compatible version and is only
//! used for self-update notices, never for template resolution.

use super::client::RegistryClient;
use crate::error::Result;
use semver::{Version, VersionReq};
use tracing::debug;

/// Resolves version tokens to concrete published versions
#[derive(Debug, Clone)]
pub struct VersionResolver {
    client: RegistryClient,
}

impl VersionResolver {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    /// Highest published version, or `None` if nothing is published
    pub async fn resolve_latest(&self, package_name: &str) -> Result<Option<String>> {
        let versions = self.client.versions(package_name).await?;
        let latest = latest_of(&versions);
        debug!(package_name, ?latest, "resolved latest version");
        Ok(latest)
    }

    /// Highest published version compatible with `^base_version`
    pub async fn resolve_satisfying(
        &self,
        base_version: &str,
        package_name: &str,
    ) -> Result<Option<String>> {
        let versions = self.client.versions(package_name).await?;
        Ok(max_satisfying(base_version, &versions))
    }
}

/// Maximum of a version list by semver precedence
///
/// Entries that are not valid semver are ignored.
pub fn latest_of(versions: &[String]) -> Option<String> {
    let mut parsed: Vec<Version> = versions
        .iter()
        .filter_map(|v| Version::parse(v).ok())
        .collect();
    parsed.sort();
    parsed.pop().map(|v| v.to_string())
}

/// Highest version in the list satisfying `^base` (same major, at least `base`)
pub fn max_satisfying(base_version: &str, versions: &[String]) -> Option<String> {
    let base = parse_version(base_version)?;
    let req = VersionReq::parse(&format!("^{}", base)).ok()?;

    let mut matching: Vec<Version> = versions
        .iter()
        .filter_map(|v| Version::parse(v).ok())
        .filter(|v| req.matches(v) && v.major == base.major && *v >= base)
        .collect();
    matching.sort_by(|a, b| b.cmp(a));
    matching.into_iter().next().map(|v| v.to_string())
}

/// Compare the running CLI version against the newest compatible release
/// Returns a notice if a newer release exists
pub fn update_notice(
    current_version: &str,
    latest_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let current = parse_version(current_version)?; // Can't compare, skip notice
    let latest = parse_version(latest_version)?;

    if current < latest {
        Some(format!(
            "A newer version is available: {} (you are running {}).\n\
             Update with: {}",
            latest_version, current_version, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse version string, tolerating a leading 'v'
pub fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}
