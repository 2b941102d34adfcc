//! Guarded command execution
//!
//! This module provides:
//! - The executable whitelist and command-line guard
//! - The [`CommandRunner`] seam and its host implementation

pub mod runner;
pub mod whitelist;

use crate::error::{Result, ScaffoldError};
use std::path::Path;
use tracing::debug;

pub use runner::{CommandRunner, Invocation, SystemRunner};
pub use whitelist::{guard, is_allowed, CommandLine, ALLOWED_COMMANDS};

/// Run a template-declared command after checking it against the whitelist
///
/// Exit code 0 is success. Any other code, or termination by a signal, fails
/// with `failure_message`. The whitelist check happens before anything is
/// spawned.
pub async fn run_guarded(
    runner: &dyn CommandRunner,
    command: &str,
    cwd: &Path,
    failure_message: &str,
) -> Result<()> {
    let line = guard(command)?;
    let invocation = Invocation::package_manager(line.program, line.args, cwd.to_path_buf());

    let code = runner
        .run(&invocation)
        .await
        .map_err(|e| ScaffoldError::io(format!("running '{}'", command), e))?;
    debug!(command, ?code, "command finished");

    match code {
        Some(0) => Ok(()),
        code => Err(ScaffoldError::CommandFailed {
            command: command.to_string(),
            message: failure_message.to_string(),
            code,
        }),
    }
}
