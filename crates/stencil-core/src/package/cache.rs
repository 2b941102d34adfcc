//! Versioned packages cached on local disk
//!
//! Each descriptor moves through **Unresolved → Resolved → {Absent, Present}**.
//! `prepare` resolves the version; `exists` decides Absent or Present by
//! looking at the deterministic cache path. The cache never checks before
//! installing: callers run `exists` first and pick `install` or `update`.

use super::installer::{InstallRequest, PackageInstaller, PackageSpec};
use super::manifest;
use crate::error::{Result, ScaffoldError, ValidationError};
use crate::registry::{version::parse_version, Registry, RegistryClient, VersionResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Version token meaning "whatever the registry has newest"
pub const LATEST: &str = "latest";

/// Replace path separators so scoped names fit in one directory name
pub fn sanitize_name(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Directory name of one cached version: `_<sanitized>@<version>@<name>`
pub fn cache_dir_name(name: &str, version: &str) -> String {
    format!("_{}@{}@{}", sanitize_name(name), version, name)
}

/// Cache path of one version under a cache root
pub fn cache_path(cache_root: &Path, name: &str, version: &str) -> PathBuf {
    cache_root.join(cache_dir_name(name, version))
}

/// A package the current run wants on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    /// `"latest"` or an exact version
    pub requested_version: String,
    /// Set by `prepare`; always valid semver once set
    pub resolved_version: Option<String>,
    pub target_path: PathBuf,
    /// `None` means non-cached mode: the package lives at `target_path`
    pub cache_root: Option<PathBuf>,
}

impl PackageDescriptor {
    /// Descriptor for a package kept in the content-addressed cache
    pub fn cached(
        name: impl Into<String>,
        requested_version: impl Into<String>,
        target_path: PathBuf,
        cache_root: PathBuf,
    ) -> Self {
        Self {
            name: name.into(),
            requested_version: requested_version.into(),
            resolved_version: None,
            target_path,
            cache_root: Some(cache_root),
        }
    }

    /// Descriptor for a package already unpacked at `target_path`
    pub fn local(name: impl Into<String>, target_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            requested_version: LATEST.to_string(),
            resolved_version: None,
            target_path,
            cache_root: None,
        }
    }

    /// Cache path of the resolved version, if cached and resolved
    pub fn cache_path(&self) -> Option<PathBuf> {
        let root = self.cache_root.as_ref()?;
        let version = self.resolved_version.as_ref()?;
        Some(cache_path(root, &self.name, version))
    }
}

/// A descriptor plus the collaborators needed to resolve and install it
pub struct PackageCache {
    descriptor: PackageDescriptor,
    registry: Registry,
    resolver: VersionResolver,
    installer: Arc<dyn PackageInstaller>,
}

impl PackageCache {
    pub fn new(
        descriptor: PackageDescriptor,
        registry: Registry,
        user_agent: &str,
        installer: Arc<dyn PackageInstaller>,
    ) -> Result<Self> {
        let resolver = VersionResolver::new(RegistryClient::new(&registry, user_agent)?);
        Ok(Self {
            descriptor,
            registry,
            resolver,
            installer,
        })
    }

    pub fn descriptor(&self) -> &PackageDescriptor {
        &self.descriptor
    }

    /// Whether `prepare` has pinned a concrete version
    pub fn is_resolved(&self) -> bool {
        self.descriptor.resolved_version.is_some()
    }

    /// Create the cache root and pin the requested version
    pub async fn prepare(&mut self) -> Result<String> {
        if let Some(root) = &self.descriptor.cache_root {
            fs::create_dir_all(root)
                .await
                .map_err(|e| ScaffoldError::io(format!("creating {}", root.display()), e))?;
        }

        if let Some(version) = &self.descriptor.resolved_version {
            return Ok(version.clone());
        }

        let version = if self.descriptor.requested_version == LATEST {
            self.latest_version().await?
        } else {
            parse_version(&self.descriptor.requested_version)
                .ok_or_else(|| {
                    ValidationError::InvalidVersion(self.descriptor.requested_version.clone())
                })?
                .to_string()
        };

        debug!(package = %self.descriptor.name, %version, "resolved package version");
        self.descriptor.resolved_version = Some(version.clone());
        Ok(version)
    }

    /// Whether the package is present on disk
    pub async fn exists(&mut self) -> Result<bool> {
        if self.descriptor.cache_root.is_none() {
            return Ok(self.descriptor.target_path.exists());
        }

        self.prepare().await?;
        Ok(self
            .descriptor
            .cache_path()
            .is_some_and(|path| path.exists()))
    }

    /// Install the resolved version
    pub async fn install(&mut self) -> Result<()> {
        let version = self.prepare().await?;
        self.install_version(&version).await
    }

    /// Move to the newest published version, installing it if it is not cached yet
    pub async fn update(&mut self) -> Result<()> {
        self.prepare().await?;
        let Some(root) = self.descriptor.cache_root.clone() else {
            debug!(package = %self.descriptor.name, "local package, nothing to update");
            return Ok(());
        };

        let latest = self.latest_version().await?;
        if cache_path(&root, &self.descriptor.name, &latest).exists() {
            debug!(package = %self.descriptor.name, %latest, "latest version already cached");
        } else {
            self.install_version(&latest).await?;
        }
        self.descriptor.resolved_version = Some(latest);
        Ok(())
    }

    /// Directory holding the package contents
    pub fn package_dir(&self) -> Option<PathBuf> {
        if self.descriptor.cache_root.is_some() {
            self.descriptor.cache_path()
        } else {
            Some(self.descriptor.target_path.clone())
        }
    }

    /// The package's `template/` directory
    pub fn template_dir(&self) -> Option<PathBuf> {
        self.package_dir().map(|dir| dir.join("template"))
    }

    /// Absolute, `/`-separated path of the package's entry module
    pub fn entry_point_path(&self) -> Option<String> {
        manifest::entry_point(&self.package_dir()?)
    }

    async fn latest_version(&self) -> Result<String> {
        self.resolver
            .resolve_latest(&self.descriptor.name)
            .await?
            .ok_or_else(|| ScaffoldError::PackageNotFound(self.descriptor.name.clone()))
    }

    async fn install_version(&self, version: &str) -> Result<()> {
        let request = InstallRequest {
            root: self.descriptor.target_path.clone(),
            store_dir: self.descriptor.cache_root.clone(),
            registry: self.registry.clone(),
            packages: vec![PackageSpec {
                name: self.descriptor.name.clone(),
                version: version.to_string(),
            }],
        };
        self.installer.install(&request).await
    }
}
