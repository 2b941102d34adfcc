//! Stencil Core - Shared library for scaffolding projects from registry templates
//!
//! Templates are versioned registry packages listed in a catalog document.
//! A run resolves the chosen template to a concrete version, caches the
//! package on disk, then either copies and renders its `template/` directory
//! or hands control to the package's own installer.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Version resolution ([`registry`]), the
//!   package cache ([`package`]), the template catalog and renderer
//!   ([`templates`]) and whitelisted command execution ([`exec`])
//! - **Layer 2: Workflow Orchestration** - [`ProductConfig`], [`CliConfig`],
//!   the installation strategies ([`install`]) and [`workflow::InitWorkflow`]
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based [`Frontend`] and `tui::run`
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use stencil_core::{CliConfig, ConfigOverrides, InitWorkflow, InitOptions};
//!
//! let config = CliConfig::resolve(&MyConfig, ConfigOverrides::default())?;
//! let outcome = InitWorkflow::new(&config, &my_frontend)
//!     .run(InitOptions::default())
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod frontend;
pub mod install;
pub mod package;
pub mod product;
pub mod project;
pub mod registry;
pub mod templates;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{CliConfig, ConfigOverrides};
pub use error::{Result, ScaffoldError, ValidationError};
pub use frontend::Frontend;
pub use package::{PackageCache, PackageDescriptor, PackageInstaller, TarballInstaller};
pub use product::ProductConfig;
pub use project::{ProjectInfo, ProjectKind};
pub use registry::{Registry, VersionResolver};
pub use templates::{TemplateMetadata, TemplateSource, TemplateType};
pub use workflow::{InitOptions, InitOutcome, InitWorkflow};

#[cfg(feature = "tui")]
pub use tui::run;
