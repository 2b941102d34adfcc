//! Delegated installation through the template package's entry point
//!
//! The entry point is run as `<runtime> <entry> <json>`, where `<json>` is
//! `{templateInfo, projectInfo, sourcePath, targetPath}`. It owns everything
//! that happens to the target directory. The runtime is spawned directly, so
//! the payload reaches it as a single argument on every platform.

use super::InstallContext;
use crate::config::detect_entry_runtime;
use crate::error::{Result, ScaffoldError};
use crate::exec::Invocation;
use crate::package::format_path;
use serde_json::json;
use std::path::Path;
use tracing::debug;

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    let entry = ctx
        .package
        .entry_point_path()
        .filter(|entry| Path::new(entry).is_file())
        .ok_or_else(|| ScaffoldError::MissingEntryPoint(ctx.template.npm_name.clone()))?;
    let source = ctx
        .package
        .template_dir()
        .ok_or_else(|| ScaffoldError::MissingEntryPoint(ctx.template.npm_name.clone()))?;

    let payload = json!({
        "templateInfo": ctx.template,
        "projectInfo": ctx.project.render_context(),
        "sourcePath": format_path(&source.to_string_lossy()),
        "targetPath": format_path(&ctx.target.to_string_lossy()),
    });
    let runtime = match &ctx.config.entry_runtime {
        Some(runtime) => runtime.clone(),
        None => detect_entry_runtime().await.to_string(),
    };
    let invocation = Invocation::new(
        runtime,
        vec![entry, payload.to_string()],
        ctx.target.to_path_buf(),
    );
    debug!(command = %invocation.program, entry = %invocation.args[0], "running custom installer");

    ctx.frontend.info("Running the template's installer")?;
    let code = ctx.runner.run(&invocation).await.map_err(|e| {
        ScaffoldError::CustomInstall(format!("could not start {}: {}", invocation.program, e))
    })?;

    let reason = match code {
        Some(0) => {
            ctx.frontend.success("Custom template installed")?;
            return Ok(());
        }
        Some(code) => format!("installer exited with code {}", code),
        None => "installer was terminated by a signal".to_string(),
    };
    ctx.frontend.error(&format!("{} failed to install", ctx.template.name))?;
    Err(ScaffoldError::CustomInstall(reason))
}
