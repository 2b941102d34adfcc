//! The `init` pipeline
//!
//! Stages run strictly in order and the first error ends the run:
//! 1. load the template catalog
//! 2. check the target directory
//! 3. collect project info and the template choice
//! 4. acquire the template package (cache or local directory)
//! 5. install it with the strategy its type selects

use crate::config::CliConfig;
use crate::error::{Result, ScaffoldError};
use crate::exec::{CommandRunner, SystemRunner};
use crate::frontend::Frontend;
use crate::install::{self, InstallContext};
use crate::package::{PackageCache, PackageDescriptor, PackageInstaller, TarballInstaller};
use crate::project::{self, ProjectInfo};
use crate::templates::{TemplateCatalog, TemplateMetadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Options of one `init` run
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Name given on the command line
    pub project_name: Option<String>,
    /// Skip the "directory is not empty" confirmation
    pub force: bool,
}

/// How a run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Completed {
        project: ProjectInfo,
        template: TemplateMetadata,
        target: PathBuf,
    },
    /// The user declined to scaffold into a non-empty directory
    Cancelled,
}

/// Orchestrates one `init` run
pub struct InitWorkflow<'a> {
    config: &'a CliConfig,
    frontend: &'a dyn Frontend,
    installer: Arc<dyn PackageInstaller>,
    runner: Arc<dyn CommandRunner>,
}

impl<'a> InitWorkflow<'a> {
    /// Workflow that downloads tarballs and spawns real processes
    pub fn new(config: &'a CliConfig, frontend: &'a dyn Frontend) -> Self {
        Self {
            config,
            frontend,
            installer: Arc::new(TarballInstaller::new(config.user_agent.clone())),
            runner: Arc::new(SystemRunner),
        }
    }

    pub fn with_installer(mut self, installer: Arc<dyn PackageInstaller>) -> Self {
        self.installer = installer;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub async fn run(&self, options: InitOptions) -> Result<InitOutcome> {
        let templates = self.load_templates().await?;

        let target = self.config.working_dir.clone();
        if !self.prepare_directory(&target, options.force).await? {
            return Ok(InitOutcome::Cancelled);
        }

        let (project, template) =
            project::collect(self.frontend, options.project_name.as_deref(), &templates)?;

        let package = self.acquire(&template).await?;

        install::install(&InstallContext {
            config: self.config,
            template: &template,
            project: &project,
            package: &package,
            target: &target,
            runner: self.runner.as_ref(),
            frontend: self.frontend,
        })
        .await?;

        Ok(InitOutcome::Completed {
            project,
            template,
            target,
        })
    }

    async fn load_templates(&self) -> Result<Vec<TemplateMetadata>> {
        let catalog = TemplateCatalog::new(
            self.config.template_source.clone(),
            &self.config.user_agent,
        );

        self.frontend.start_progress("Loading templates...");
        match catalog.list_templates().await {
            Ok(templates) => {
                self.frontend
                    .stop_progress(&format!("{} templates available", templates.len()));
                Ok(templates)
            }
            Err(e) => {
                self.frontend.stop_progress("Failed to load templates");
                Err(e)
            }
        }
    }

    /// Returns `false` when the user declined to continue
    async fn prepare_directory(&self, target: &Path, force: bool) -> Result<bool> {
        if is_dir_empty(target).await? {
            return Ok(true);
        }

        if !force {
            let proceed = self.frontend.confirm(
                "The current directory is not empty. Continue creating the project?",
                false,
            )?;
            if !proceed {
                debug!(target = %target.display(), "user declined non-empty directory");
                return Ok(false);
            }
        }

        let wipe = self.frontend.confirm(
            &format!("Delete everything in {}?", target.display()),
            false,
        )?;
        if wipe {
            empty_dir(target).await?;
            self.frontend.info("Directory emptied")?;
        }
        Ok(true)
    }

    /// Make the template package available on disk
    async fn acquire(&self, template: &TemplateMetadata) -> Result<PackageCache> {
        let descriptor = match &self.config.local_package {
            Some(path) => PackageDescriptor::local(&template.npm_name, path.clone()),
            None => PackageDescriptor::cached(
                &template.npm_name,
                &template.version,
                self.config.template_root(),
                self.config.template_store(),
            ),
        };
        let local = descriptor.cache_root.is_none();
        let mut package = PackageCache::new(
            descriptor,
            self.config.registry.clone(),
            &self.config.user_agent,
            Arc::clone(&self.installer),
        )?;

        if local {
            if !package.exists().await? {
                return Err(ScaffoldError::Install {
                    package: template.npm_name.clone(),
                    reason: format!(
                        "no package at {}",
                        package.descriptor().target_path.display()
                    ),
                });
            }
            self.frontend.info(&format!(
                "Using local template package {}",
                package.descriptor().target_path.display()
            ))?;
            return Ok(package);
        }

        let present = package.exists().await?;
        self.frontend.start_progress(if present {
            "Updating template..."
        } else {
            "Downloading template..."
        });
        let result = if present {
            package.update().await
        } else {
            package.install().await
        };
        match result {
            Ok(()) => {
                let version = package
                    .descriptor()
                    .resolved_version
                    .clone()
                    .unwrap_or_default();
                self.frontend.stop_progress(&format!(
                    "{} {} {}",
                    if present { "Updated" } else { "Downloaded" },
                    template.npm_name,
                    version
                ));
                Ok(package)
            }
            Err(e) => {
                self.frontend.stop_progress("Template download failed");
                Err(e)
            }
        }
    }
}

/// Empty apart from dotfiles and `node_modules`; a missing directory counts as empty
pub async fn is_dir_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(ScaffoldError::io(format!("reading {}", dir.display()), e)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ScaffoldError::io(format!("reading {}", dir.display()), e))?
    {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with('.') && name != "node_modules" {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Remove every entry of `dir`, keeping the directory itself
pub async fn empty_dir(dir: &Path) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ScaffoldError::io(format!("reading {}", dir.display()), e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ScaffoldError::io(format!("reading {}", dir.display()), e))?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| ScaffoldError::io(format!("inspecting {}", path.display()), e))?;
        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        removed.map_err(|e| ScaffoldError::io(format!("removing {}", path.display()), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::testing::ScriptedFrontend;
    use crate::project::ProjectKind;
    use crate::registry::Registry;
    use crate::templates::{TemplateSource, CATALOG_FILE};
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> CliConfig {
        let catalog_dir = temp.path().join("catalog");
        std_fs::create_dir_all(&catalog_dir).unwrap();
        std_fs::write(
            catalog_dir.join(CATALOG_FILE),
            "templates:\n  - npmName: stencil-template-app\n    name: App\n    tag: [project]\n",
        )
        .unwrap();
        let working_dir = temp.path().join("work");
        std_fs::create_dir_all(&working_dir).unwrap();

        CliConfig {
            home_dir: temp.path().to_path_buf(),
            cli_home: temp.path().join(".stencil-cli"),
            working_dir,
            local_package: Some(temp.path().join("package")),
            registry: Registry::Primary,
            template_source: TemplateSource::local(catalog_dir),
            entry_runtime: Some("node".to_string()),
            user_agent: "stencil-test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dir_with_only_hidden_entries_is_empty() {
        let temp = TempDir::new().unwrap();
        std_fs::create_dir_all(temp.path().join("node_modules/dep")).unwrap();
        std_fs::write(temp.path().join(".gitignore"), "").unwrap();
        assert!(is_dir_empty(temp.path()).await.unwrap());

        std_fs::write(temp.path().join("README.md"), "").unwrap();
        assert!(!is_dir_empty(temp.path()).await.unwrap());

        assert!(is_dir_empty(&temp.path().join("missing")).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_dir_removes_everything() {
        let temp = TempDir::new().unwrap();
        std_fs::create_dir_all(temp.path().join("src/nested")).unwrap();
        std_fs::write(temp.path().join("src/nested/a.js"), "").unwrap();
        std_fs::write(temp.path().join(".env"), "").unwrap();

        empty_dir(temp.path()).await.unwrap();

        assert!(temp.path().is_dir());
        assert_eq!(std_fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_declining_non_empty_directory_cancels() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        std_fs::write(config.working_dir.join("existing.txt"), "keep").unwrap();
        let frontend = ScriptedFrontend::new(ProjectKind::Project).confirms([false]);

        let outcome = InitWorkflow::new(&config, &frontend)
            .run(InitOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome, InitOutcome::Cancelled);
        assert_eq!(
            std_fs::read_to_string(config.working_dir.join("existing.txt")).unwrap(),
            "keep"
        );
        assert_eq!(frontend.asked().len(), 1);
    }

    #[tokio::test]
    async fn test_force_asks_only_about_emptying() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        std_fs::write(config.working_dir.join("existing.txt"), "old").unwrap();
        let frontend = ScriptedFrontend::new(ProjectKind::Project).confirms([true]);
        let workflow = InitWorkflow::new(&config, &frontend);

        assert!(workflow
            .prepare_directory(&config.working_dir, true)
            .await
            .unwrap());
        assert!(!config.working_dir.join("existing.txt").exists());
        assert_eq!(frontend.asked().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_local_package_is_install_error() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let frontend = ScriptedFrontend::new(ProjectKind::Project).inputs(["1.0.0"]);

        let err = InitWorkflow::new(&config, &frontend)
            .run(InitOptions {
                project_name: Some("demo".to_string()),
                force: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::Install { .. }));
    }
}
