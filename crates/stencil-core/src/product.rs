//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait once to name itself, point at its template
//! catalog and pick where its cache lives. Everything else in the library is
//! driven by [`crate::config::CliConfig`], which is resolved from it.

/// Configuration trait for CLI products built on stencil-core
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Registry package name of the CLI itself, used for update notices
    fn package_name(&self) -> &'static str;

    /// Default URL of the template catalog
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the catalog URL
    fn template_url_env(&self) -> &'static str;

    /// Directory name under the user's home that holds the cache
    fn default_cli_home(&self) -> &'static str;

    /// Environment variable name for overriding the CLI home directory name
    fn cli_home_env(&self) -> &'static str;

    /// Upgrade/install command shown in update notices
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
