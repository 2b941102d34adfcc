//! Materializing a template into the target directory
//!
//! The template's `type` picks the strategy:
//! - [`normal`]: copy `template/`, render it, run the declared commands
//! - [`custom`]: hand everything to the package's own entry point

pub mod custom;
pub mod normal;

use crate::config::CliConfig;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::frontend::Frontend;
use crate::package::PackageCache;
use crate::project::ProjectInfo;
use crate::templates::{TemplateMetadata, TemplateType};
use std::path::Path;
use tracing::debug;

/// Everything a strategy needs for one installation
pub struct InstallContext<'a> {
    pub config: &'a CliConfig,
    pub template: &'a TemplateMetadata,
    pub project: &'a ProjectInfo,
    /// The acquired template package
    pub package: &'a PackageCache,
    /// Directory the project is materialized into
    pub target: &'a Path,
    pub runner: &'a dyn CommandRunner,
    pub frontend: &'a dyn Frontend,
}

/// Run the strategy selected by the template's type
pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    let template_type = ctx.template.template_type()?;
    debug!(template = %ctx.template.npm_name, ?template_type, "installing template");

    match template_type {
        TemplateType::Normal => normal::install(ctx).await,
        TemplateType::Custom => custom::install(ctx).await,
    }
}
