//! Run configuration
//!
//! [`CliConfig`] is resolved once by the binary and passed by reference to
//! every stage. Environment variables are only consulted while resolving it.

pub mod runtime;

use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::registry::Registry;
use crate::templates::TemplateSource;
use std::path::PathBuf;
use tracing::debug;

pub use runtime::detect_entry_runtime;

/// Values supplied on the command line that take precedence over defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Use the registry mirror instead of the primary registry
    pub use_mirror: bool,
    /// Local template package directory (skips the registry cache entirely)
    pub local_package: Option<PathBuf>,
    /// Local template catalog directory
    pub template_dir: Option<PathBuf>,
    /// Directory the project is scaffolded into (defaults to the current directory)
    pub working_dir: Option<PathBuf>,
    /// Interpreter for custom template entry points (detected when unset)
    pub entry_runtime: Option<String>,
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// The user's home directory
    pub home_dir: PathBuf,
    /// Root of everything stencil stores on disk
    pub cli_home: PathBuf,
    /// Directory the project is scaffolded into
    pub working_dir: PathBuf,
    /// Local template package directory, when the cache is bypassed
    pub local_package: Option<PathBuf>,
    pub registry: Registry,
    pub template_source: TemplateSource,
    /// Interpreter for custom template entry points, detected on use when unset
    pub entry_runtime: Option<String>,
    pub user_agent: String,
}

impl CliConfig {
    /// Resolve configuration for a product, applying command-line overrides
    pub fn resolve<C: ProductConfig>(product: &C, overrides: ConfigOverrides) -> Result<Self> {
        let home_dir = dirs::home_dir()
            .filter(|home| home.exists())
            .ok_or_else(|| ScaffoldError::Config("home directory not found".to_string()))?;

        let cli_home_name = std::env::var(product.cli_home_env())
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| product.default_cli_home().to_string());
        let cli_home = home_dir.join(cli_home_name);

        let template_source = match overrides.template_dir {
            Some(dir) => TemplateSource::local(dir),
            None => TemplateSource::from_config(product)?,
        };

        let working_dir = match overrides.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| ScaffoldError::io("reading the current directory", e))?,
        };

        let config = Self {
            home_dir,
            cli_home,
            working_dir,
            local_package: overrides.local_package,
            registry: Registry::from_mirror_flag(overrides.use_mirror),
            template_source,
            entry_runtime: overrides.entry_runtime,
            user_agent: product.user_agent().to_string(),
        };
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Directory the template packages are installed under
    pub fn template_root(&self) -> PathBuf {
        self.cli_home.join("template")
    }

    /// Store directory holding one subdirectory per cached package version
    pub fn template_store(&self) -> PathBuf {
        self.template_root().join("node_modules")
    }
}
