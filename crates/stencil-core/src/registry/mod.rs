//! Package registry access
//!
//! This module provides:
//! - Registry selection (primary endpoint or regional mirror)
//! - An HTTP client for package documents and tarballs
//! - Version resolution ("latest" and caret-compatible lookups)

pub mod client;
pub mod version;

pub use client::{DistInfo, PackageDocument, Registry, RegistryClient, VersionDocument};
pub use version::{latest_of, max_satisfying, update_notice, VersionResolver};
