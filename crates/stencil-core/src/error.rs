//! Error types for stencil
//!
//! Every fallible core operation returns [`Result<T>`]. All variants except
//! [`ValidationError`] are fatal for the run: they bubble up to the binary's
//! top-level handler and nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stencil operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// All errors that can abort a scaffolding run
#[derive(Error, Debug)]
pub enum ScaffoldError {
    // Registry errors
    #[error("Registry request failed for {url}: {reason}")]
    Registry { url: String, reason: String },

    #[error("Package '{0}' has no published versions")]
    PackageNotFound(String),

    // Template catalog errors
    #[error("No templates available from {0}")]
    NoTemplates(String),

    #[error("No templates tagged '{0}'")]
    NoTemplatesForKind(String),

    #[error("Template '{0}' is not in the catalog")]
    TemplateNotFound(String),

    #[error("Unrecognized template type '{0}' (expected 'normal' or 'custom')")]
    UnknownTemplateType(String),

    // Installation errors
    #[error("Failed to install {package}: {reason}")]
    Install { package: String, reason: String },

    #[error("Custom template entry point not found for {0}")]
    MissingEntryPoint(String),

    #[error("Custom template installer failed: {0}")]
    CustomInstall(String),

    #[error("Failed to render {path}: {reason}")]
    Render { path: PathBuf, reason: String },

    // Command errors
    #[error("Command is not in the whitelist: {command}")]
    ForbiddenCommand { command: String },

    #[error("{message} (command: {command}, exit code: {})", describe_code(.code))]
    CommandFailed {
        command: String,
        message: String,
        code: Option<i32>,
    },

    // Input and environment errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    /// Create an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a registry error for a URL
    pub fn registry(url: impl ToString, reason: impl ToString) -> Self {
        Self::Registry {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Exit code the process should terminate with for this error
    ///
    /// A failed install/start command passes its own code through; every
    /// other fatal error exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Malformed user input
///
/// Recoverable: prompts re-ask instead of failing the run. It only becomes
/// fatal when the value came from a flag and cannot be re-prompted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a valid name: start with a letter and use only letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("'{0}' is not a valid semver version")]
    InvalidVersion(String),

    #[error("A description is required")]
    EmptyDescription,
}
