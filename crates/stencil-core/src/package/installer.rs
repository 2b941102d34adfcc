//! Package installation into the local store
//!
//! [`PackageInstaller`] is the seam between the cache and whatever puts bytes
//! on disk. [`TarballInstaller`] downloads the published tarball of each
//! requested version and unpacks it into the store. It installs exactly the
//! requested packages: dependencies are never resolved.

use super::cache::cache_dir_name;
use crate::error::{Result, ScaffoldError};
use crate::registry::{Registry, RegistryClient};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use serde::Serialize;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// One package to install
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
}

/// Everything an installer needs to place packages on disk
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Install root (packages land in `<root>/node_modules` without a store)
    pub root: PathBuf,
    /// Content-addressed store directory
    pub store_dir: Option<PathBuf>,
    pub registry: Registry,
    pub packages: Vec<PackageSpec>,
}

impl InstallRequest {
    /// Directory a package ends up in
    pub fn destination(&self, spec: &PackageSpec) -> PathBuf {
        match &self.store_dir {
            Some(store) => store.join(cache_dir_name(&spec.name, &spec.version)),
            None => self.root.join("node_modules").join(&spec.name),
        }
    }
}

/// Places packages on disk
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    async fn install(&self, request: &InstallRequest) -> Result<()>;
}

/// Installs packages from their registry tarballs
#[derive(Debug, Clone)]
pub struct TarballInstaller {
    user_agent: String,
}

impl TarballInstaller {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    async fn install_one(
        &self,
        client: &RegistryClient,
        request: &InstallRequest,
        spec: &PackageSpec,
    ) -> Result<()> {
        let install_error = |reason: String| ScaffoldError::Install {
            package: format!("{}@{}", spec.name, spec.version),
            reason,
        };

        let document = client
            .fetch_document(&spec.name)
            .await
            .map_err(|e| install_error(e.to_string()))?;
        let tarball = document
            .tarball_url(&spec.version)
            .ok_or_else(|| install_error("version has no tarball in the registry".to_string()))?
            .to_string();

        let bytes = client
            .download(&tarball)
            .await
            .map_err(|e| install_error(e.to_string()))?;
        let destination = request.destination(spec);
        debug!(
            package = %spec.name,
            version = %spec.version,
            destination = %destination.display(),
            "unpacking tarball"
        );

        let files = tokio::task::spawn_blocking(move || unpack_atomically(&bytes, &destination))
            .await
            .map_err(|e| install_error(format!("unpack task panicked: {}", e)))?
            .map_err(|e| install_error(e.to_string()))?;

        info!(package = %spec.name, version = %spec.version, files, "installed package");
        Ok(())
    }
}

#[async_trait]
impl PackageInstaller for TarballInstaller {
    async fn install(&self, request: &InstallRequest) -> Result<()> {
        let client = RegistryClient::new(&request.registry, &self.user_agent)?;
        for spec in &request.packages {
            self.install_one(&client, request, spec).await?;
        }
        Ok(())
    }
}

/// Unpack into a `.partial` sibling, then move it into place
///
/// An interrupted install leaves only the `.partial` directory behind, so the
/// destination never exists half-populated.
fn unpack_atomically(bytes: &[u8], destination: &Path) -> io::Result<usize> {
    let file_name = destination
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no name"))?;
    let partial = destination.with_file_name(format!("{}.partial", file_name.to_string_lossy()));

    if partial.exists() {
        std::fs::remove_dir_all(&partial)?;
    }
    std::fs::create_dir_all(&partial)?;

    let files = unpack_tarball(bytes, &partial)?;

    if destination.exists() {
        std::fs::remove_dir_all(destination)?;
    }
    std::fs::rename(&partial, destination)?;
    Ok(files)
}

/// Unpack a gzipped package tarball, stripping its top-level directory
///
/// Returns the number of files written. Only regular files and directories
/// are extracted; links and device entries are skipped.
pub fn unpack_tarball(bytes: &[u8], destination: &Path) -> io::Result<usize> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let mut files = 0;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        // Package tarballs wrap everything in one directory (usually `package/`)
        let relative: PathBuf = path.components().skip(1).collect();
        if relative.as_os_str().is_empty() {
            continue;
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("archive entry escapes destination: {}", path.display()),
            ));
        }

        let target = destination.join(&relative);
        let kind = entry.header().entry_type();
        if kind.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if !kind.is_file() {
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry.unpack(&target)?;
        files += 1;
    }

    Ok(files)
}
