//! Template packages: cache layout, installation and entry points

pub mod cache;
pub mod installer;
pub mod manifest;

pub use cache::{cache_dir_name, cache_path, sanitize_name, PackageCache, PackageDescriptor, LATEST};
pub use installer::{InstallRequest, PackageInstaller, PackageSpec, TarballInstaller};
pub use manifest::{entry_point, format_path};
