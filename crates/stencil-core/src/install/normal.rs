//! Copy-and-render installation

use super::InstallContext;
use crate::error::{Result, ScaffoldError};
use crate::exec::run_guarded;
use crate::templates::{copy_template, renderable_files, IgnoreSet, Renderer};
use std::path::Path;

/// Copy the package's `template/` into the target, render it, then run the
/// install and start commands
pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    let source = ctx
        .package
        .template_dir()
        .ok_or_else(|| ScaffoldError::Install {
            package: ctx.template.npm_name.clone(),
            reason: "package version was never resolved".to_string(),
        })?;

    ctx.frontend.start_progress("Installing template...");
    let rendered = match materialize(ctx, &source).await {
        Ok(rendered) => rendered,
        Err(e) => {
            ctx.frontend.stop_progress("Template installation failed");
            return Err(e);
        }
    };
    ctx.frontend
        .stop_progress(&format!("Template installed ({} files rendered)", rendered));

    if let Some(command) = &ctx.template.install_command {
        ctx.frontend.info(&format!("Installing dependencies: {}", command))?;
        run_guarded(ctx.runner, command, ctx.target, "Dependency installation failed").await?;
    }
    if let Some(command) = &ctx.template.start_command {
        ctx.frontend.info(&format!("Starting project: {}", command))?;
        run_guarded(ctx.runner, command, ctx.target, "Start command failed").await?;
    }
    Ok(())
}

async fn materialize(ctx: &InstallContext<'_>, source: &Path) -> Result<usize> {
    copy_template(source, ctx.target).await?;

    let ignores = IgnoreSet::with_defaults(&ctx.template.ignore);
    let files = renderable_files(ctx.target, &ignores)?;
    Renderer::new()
        .render_all(files, ctx.project.render_context())
        .await
}
