//! Stencil CLI - Project and component scaffolding from registry templates

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use stencil_core::registry::{update_notice, RegistryClient, VersionResolver};
use stencil_core::workflow::InitOptions;
use stencil_core::{CliConfig, ConfigOverrides, ProductConfig, ScaffoldError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long the startup update check may take before it is skipped
const UPDATE_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Stencil product configuration
#[derive(Clone)]
pub struct StencilConfig;

impl ProductConfig for StencilConfig {
    fn name(&self) -> &'static str {
        "stencil"
    }

    fn display_name(&self) -> &'static str {
        "Stencil"
    }

    fn package_name(&self) -> &'static str {
        "@stencil-cli/cli"
    }

    fn default_template_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/stencil-cli/templates/main"
    }

    fn template_url_env(&self) -> &'static str {
        "STENCIL_TEMPLATE_URL"
    }

    fn default_cli_home(&self) -> &'static str {
        ".stencil-cli"
    }

    fn cli_home_env(&self) -> &'static str {
        "STENCIL_CLI_HOME"
    }

    fn upgrade_command(&self) -> &'static str {
        "npm install -g @stencil-cli/cli"
    }
}

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(about = "CLI for scaffolding projects and components from registry templates")]
#[command(version)]
pub struct Args {
    /// Print debug diagnostics
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Use a local template package directory instead of the registry cache
    #[arg(long = "target-path", alias = "targetPath", global = true)]
    pub target_path: Option<PathBuf>,

    /// Use the registry mirror
    #[arg(long, global = true)]
    pub mirror: bool,

    /// Local directory to use for the template catalog instead of fetching from remote (for development use)
    #[arg(long = "template-dir", global = true)]
    pub template_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project or component in the current directory
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Project name (prompted when missing or invalid)
    pub project_name: Option<String>,

    /// Skip the confirmation for a non-empty directory
    #[arg(short, long)]
    pub force: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.debug);
    let debug = args.debug;

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if debug {
                eprintln!("{:?}", e);
            }
            let code = e
                .downcast_ref::<ScaffoldError>()
                .map_or(1, ScaffoldError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("stencil=debug,stencil_core=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let product = StencilConfig;
    let config = CliConfig::resolve(
        &product,
        ConfigOverrides {
            use_mirror: args.mirror,
            local_package: args.target_path,
            template_dir: args.template_dir,
            ..Default::default()
        },
    )?;

    check_for_update(&product, &config).await;

    match args.command {
        Command::Init(init) => {
            let options = InitOptions {
                project_name: init.project_name,
                force: init.force,
            };
            stencil_core::tui::run(product.display_name(), &config, options).await?;
        }
    }
    Ok(())
}

/// Print a notice when a newer compatible release of the CLI is published
///
/// Never fails the run.
async fn check_for_update(product: &StencilConfig, config: &CliConfig) {
    let client = match RegistryClient::new(&config.registry, &config.user_agent) {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "skipping update check");
            return;
        }
    };
    let resolver = VersionResolver::new(client);
    let lookup = resolver.resolve_satisfying(CLI_VERSION, product.package_name());

    match tokio::time::timeout(UPDATE_CHECK_TIMEOUT, lookup).await {
        Ok(Ok(Some(latest))) => {
            if let Some(notice) = update_notice(CLI_VERSION, &latest, product.upgrade_command())
            {
                eprintln!("{}", notice.yellow());
            }
        }
        Ok(Ok(None)) => {}
        Ok(Err(e)) => debug!(error = %e, "update check failed"),
        Err(_) => debug!("update check timed out"),
    }
}
