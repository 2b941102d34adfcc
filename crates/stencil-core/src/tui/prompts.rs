//! Charm-style CLI prompts using cliclack

use crate::config::CliConfig;
use crate::error::{Result, ScaffoldError};
use crate::frontend::Frontend;
use crate::project::{ProjectKind, Validator};
use crate::templates::TemplateMetadata;
use crate::workflow::{InitOptions, InitOutcome, InitWorkflow};
use std::sync::Mutex;

/// [`Frontend`] drawing inline prompts on the terminal
#[derive(Default)]
pub struct TerminalFrontend {
    spinner: Mutex<Option<cliclack::ProgressBar>>,
}

impl TerminalFrontend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontend for TerminalFrontend {
    fn info(&self, message: &str) -> Result<()> {
        cliclack::log::info(message).map_err(ScaffoldError::Prompt)
    }

    fn warn(&self, message: &str) -> Result<()> {
        cliclack::log::warning(message).map_err(ScaffoldError::Prompt)
    }

    fn success(&self, message: &str) -> Result<()> {
        cliclack::log::success(message).map_err(ScaffoldError::Prompt)
    }

    fn error(&self, message: &str) -> Result<()> {
        cliclack::log::error(message).map_err(ScaffoldError::Prompt)
    }

    fn start_progress(&self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn stop_progress(&self, message: &str) {
        let spinner = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        if let Some(spinner) = spinner {
            spinner.stop(message);
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        cliclack::confirm(prompt)
            .initial_value(default)
            .interact()
            .map_err(ScaffoldError::Prompt)
    }

    fn select_kind(&self) -> Result<ProjectKind> {
        cliclack::select("What do you want to create?")
            .item(ProjectKind::Project, ProjectKind::Project.label(), "")
            .item(ProjectKind::Component, ProjectKind::Component.label(), "")
            .interact()
            .map_err(ScaffoldError::Prompt)
    }

    fn input(&self, prompt: &str, default: Option<&str>, validate: Validator) -> Result<String> {
        let mut input = cliclack::input(prompt);
        if let Some(default) = default {
            input = input.placeholder(default).default_input(default);
        }
        input
            .validate(move |value: &String| validate(value.trim()))
            .interact::<String>()
            .map(|value| value.trim().to_string())
            .map_err(ScaffoldError::Prompt)
    }

    fn select_template(&self, templates: &[TemplateMetadata]) -> Result<usize> {
        // Use indices to avoid borrow issues
        let mut select = cliclack::select("Select a template");
        for (idx, template) in templates.iter().enumerate() {
            select = select.item(idx, &template.name, &template.npm_name);
        }
        select.interact().map_err(ScaffoldError::Prompt)
    }
}

/// Run `init` with interactive prompts
pub async fn run(
    display_name: &str,
    config: &CliConfig,
    options: InitOptions,
) -> Result<InitOutcome> {
    cliclack::intro(display_name).map_err(ScaffoldError::Prompt)?;

    let frontend = TerminalFrontend::new();
    let result = InitWorkflow::new(config, &frontend).run(options).await;

    // A failed stage can leave a spinner's hidden cursor behind
    frontend.stop_progress("Stopped");
    let _ = console::Term::stderr().show_cursor();
    let outcome = result?;

    match &outcome {
        InitOutcome::Completed {
            project, target, ..
        } => {
            cliclack::outro(format!(
                "Created {} {} in {}",
                project.kind.as_str(),
                project.name,
                target.display()
            ))
            .map_err(ScaffoldError::Prompt)?;
        }
        InitOutcome::Cancelled => {
            cliclack::outro_cancel("Setup cancelled.").map_err(ScaffoldError::Prompt)?;
        }
    }
    Ok(outcome)
}
