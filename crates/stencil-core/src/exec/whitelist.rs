//! Whitelist of executables templates may invoke
//!
//! Install and start commands come from template metadata, which is not
//! trusted. Every command line is checked here before a process is spawned.

use crate::error::{Result, ScaffoldError};

/// Executables allowed to run automatically
pub const ALLOWED_COMMANDS: &[&str] = &["npm", "cnpm", "yarn", "pnpm"];

/// Characters `cmd /c` treats as operators; never valid in an argument
const SHELL_OPERATORS: &[char] = &['&', '|', '<', '>', '^'];

/// Whether an executable name is whitelisted
pub fn is_allowed(executable: &str) -> bool {
    ALLOWED_COMMANDS.contains(&executable)
}

/// A command line split into program and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split on whitespace; `None` for a blank string
    pub fn parse(command: &str) -> Option<Self> {
        let mut tokens = command.split_whitespace().map(str::to_string);
        let program = tokens.next()?;
        Some(Self {
            program,
            args: tokens.collect(),
        })
    }
}

/// Parse a command line and reject it unless its program is whitelisted
///
/// Arguments containing shell operators are rejected as well: on Windows the
/// command line passes through `cmd /c`.
pub fn guard(command: &str) -> Result<CommandLine> {
    let forbidden = || ScaffoldError::ForbiddenCommand {
        command: command.to_string(),
    };
    let line = CommandLine::parse(command).ok_or_else(forbidden)?;
    let chained = line.args.iter().any(|arg| arg.contains(SHELL_OPERATORS));
    if is_allowed(&line.program) && !chained {
        Ok(line)
    } else {
        Err(forbidden())
    }
}
