//! Package manifest lookup and entry-point discovery

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Manifest file every package exposes at its root
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of a package manifest stencil reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// Entry module, relative to the manifest's directory
    #[serde(default)]
    pub main: Option<String>,
}

/// Nearest directory at or above `start` containing a package manifest
pub fn find_package_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Read and parse the manifest in `dir`
pub fn read_manifest(dir: &Path) -> Option<PackageManifest> {
    let content = std::fs::read_to_string(dir.join(MANIFEST_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Absolute path of the entry module declared by the package containing `start`
///
/// Returns `None` when no manifest is found or it declares no `main`.
pub fn entry_point(start: &Path) -> Option<String> {
    let dir = find_package_dir(start)?;
    let main = read_manifest(&dir)?.main.filter(|m| !m.trim().is_empty())?;
    let resolved = normalize_lexically(&absolutize(&dir).join(main));
    Some(format_path(&resolved.to_string_lossy()))
}

/// Normalize path separators to forward slashes
pub fn format_path(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace('\\', "/")
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Resolve `.` and `..` components without touching the filesystem
fn normalize_lexically(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
