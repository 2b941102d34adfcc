//! Child process execution
//!
//! Commands run with the parent's standard streams attached so installers and
//! dev servers stay interactive. Arguments go straight to argv; nothing is
//! assembled into a shell string. The one exception is the Windows `cmd /c`
//! shim for package manager `.cmd` launchers, which only whitelisted commands
//! with shell operators already rejected may use.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// A process to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Launch through `cmd /c` on Windows
    pub shell_shim: bool,
}

impl Invocation {
    /// Spawn `program` directly on every platform
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            cwd,
            shell_shim: false,
        }
    }

    /// Spawn a package manager, which on Windows is a `.cmd` launcher
    pub fn package_manager(program: impl Into<String>, args: Vec<String>, cwd: PathBuf) -> Self {
        Self {
            shell_shim: true,
            ..Self::new(program, args, cwd)
        }
    }

    /// Program and arguments as one display string
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Spawns processes and reports their exit code
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion; `Ok(None)` means the process was killed by a signal
    async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>>;
}

/// Runs processes on the host with inherited stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> TokioCommand {
        // .cmd launchers can only be started by cmd
        let mut command = if invocation.shell_shim && cfg!(windows) {
            let mut command = TokioCommand::new("cmd");
            command.arg("/c").arg(&invocation.program);
            command
        } else {
            TokioCommand::new(&invocation.program)
        };
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        debug!(command = %invocation.display(), cwd = %invocation.cwd.display(), "spawning");
        let status = Self::command(invocation).status().await?;
        debug!(command = %invocation.display(), ?status, "process exited");
        Ok(status.code())
    }
}
