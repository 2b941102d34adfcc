//! HTTP client for an npm-compatible package registry

use crate::error::{Result, ScaffoldError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Primary public registry
pub const PRIMARY_REGISTRY: &str = "https://registry.npmjs.org";

/// Regional mirror of the primary registry
pub const MIRROR_REGISTRY: &str = "https://registry.npmmirror.com";

/// Timeout for a single registry request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which registry endpoint to talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registry {
    Primary,
    Mirror,
    /// Any other npm-compatible endpoint (private registries, test servers)
    Custom(Url),
}

impl Registry {
    /// Selection is a plain flag, never negotiated at runtime
    pub fn from_mirror_flag(use_mirror: bool) -> Self {
        if use_mirror {
            Self::Mirror
        } else {
            Self::Primary
        }
    }

    /// Base URL of the registry
    pub fn url(&self) -> Result<Url> {
        match self {
            Self::Primary => Url::parse(PRIMARY_REGISTRY),
            Self::Mirror => Url::parse(MIRROR_REGISTRY),
            Self::Custom(url) => Ok(url.clone()),
        }
        .map_err(|e| ScaffoldError::Config(format!("invalid registry URL: {}", e)))
    }
}

/// Registry document describing every published version of a package
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageDocument {
    #[serde(default)]
    pub name: Option<String>,

    /// Version string -> version metadata
    #[serde(default)]
    pub versions: BTreeMap<String, VersionDocument>,
}

impl PackageDocument {
    /// Published version strings, in registry order
    pub fn version_list(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Tarball URL for one version
    pub fn tarball_url(&self, version: &str) -> Option<&str> {
        self.versions
            .get(version)
            .and_then(|v| v.dist.as_ref())
            .map(|dist| dist.tarball.as_str())
    }
}

/// Metadata for a single published version
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionDocument {
    #[serde(default)]
    pub dist: Option<DistInfo>,
}

/// Distribution info for a published version
#[derive(Debug, Clone, Deserialize)]
pub struct DistInfo {
    pub tarball: String,
}

/// Thin HTTP client bound to one registry endpoint
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base: Url,
    client: reqwest::Client,
}

impl RegistryClient {
    /// Create a client for a registry with a custom user agent
    pub fn new(registry: &Registry, user_agent: &str) -> Result<Self> {
        Ok(Self {
            base: registry.url()?,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        })
    }

    /// Fetch the package document for a package
    pub async fn fetch_document(&self, package_name: &str) -> Result<PackageDocument> {
        let url = build_url(&self.base, package_name)?;
        debug!(%url, "fetching package document");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScaffoldError::registry(&url, e))?;

        if !response.status().is_success() {
            return Err(ScaffoldError::registry(
                &url,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json::<PackageDocument>()
            .await
            .map_err(|e| ScaffoldError::registry(&url, format!("malformed response: {}", e)))
    }

    /// Every published version of a package
    pub async fn versions(&self, package_name: &str) -> Result<Vec<String>> {
        Ok(self.fetch_document(package_name).await?.version_list())
    }

    /// Download raw bytes (package tarballs)
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "downloading");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScaffoldError::registry(url, e))?;

        if !response.status().is_success() {
            return Err(ScaffoldError::registry(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ScaffoldError::registry(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// Build a URL by appending one path segment, preserving query parameters
///
/// Scoped names (`@scope/name`) stay a single segment, so the `/` is
/// percent-encoded the way the registry expects.
pub(crate) fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ScaffoldError::registry(base, "URL cannot have path segments"))?
        .pop_if_empty()
        .push(path_segment);
    Ok(url)
}
