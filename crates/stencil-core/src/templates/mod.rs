//! Template catalog, copying and rendering
//!
//! This module provides:
//! - Template metadata types (CatalogDocument, TemplateMetadata)
//! - Catalog fetching from remote URLs or local directories
//! - Recursive template copying and ignore-aware file enumeration
//! - Concurrent in-place rendering

pub mod catalog;
pub mod copier;
pub mod ignore;
pub mod metadata;
pub mod render;

pub use catalog::{filter_by_kind, TemplateCatalog, TemplateSource, CATALOG_FILE};
pub use copier::{copy_template, renderable_files};
pub use ignore::IgnoreSet;
pub use metadata::{CatalogDocument, TemplateMetadata, TemplateType};
pub use render::Renderer;
