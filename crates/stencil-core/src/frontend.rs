//! Operator-facing notices and prompts
//!
//! The core never talks to the terminal directly. Everything a user sees or
//! answers goes through a [`Frontend`]; the `tui` feature provides the
//! cliclack implementation.

use crate::error::Result;
use crate::project::{ProjectKind, Validator};
use crate::templates::TemplateMetadata;

/// Notices, progress and prompts for one run
pub trait Frontend: Send + Sync {
    fn info(&self, message: &str) -> Result<()>;

    fn warn(&self, message: &str) -> Result<()>;

    fn success(&self, message: &str) -> Result<()>;

    fn error(&self, message: &str) -> Result<()>;

    /// Show a spinner until [`Frontend::stop_progress`]
    fn start_progress(&self, message: &str);

    fn stop_progress(&self, message: &str);

    /// Yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Project or component
    fn select_kind(&self) -> Result<ProjectKind>;

    /// Free text answer, re-asked until `validate` accepts it
    fn input(&self, prompt: &str, default: Option<&str>, validate: Validator) -> Result<String>;

    /// Index into `templates` of the chosen template
    fn select_template(&self, templates: &[TemplateMetadata]) -> Result<usize>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::ScaffoldError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers prompts from a script and records what was shown
    pub struct ScriptedFrontend {
        kind: ProjectKind,
        inputs: Mutex<VecDeque<String>>,
        confirms: Mutex<VecDeque<bool>>,
        asked: Mutex<Vec<String>>,
        warnings: Mutex<Vec<String>>,
    }

    impl ScriptedFrontend {
        pub fn new(kind: ProjectKind) -> Self {
            Self {
                kind,
                inputs: Mutex::new(VecDeque::new()),
                confirms: Mutex::new(VecDeque::new()),
                asked: Mutex::new(Vec::new()),
                warnings: Mutex::new(Vec::new()),
            }
        }

        pub fn inputs<const N: usize>(self, answers: [&str; N]) -> Self {
            self.inputs
                .lock()
                .unwrap()
                .extend(answers.iter().map(|a| a.to_string()));
            self
        }

        pub fn confirms<const N: usize>(self, answers: [bool; N]) -> Self {
            self.confirms.lock().unwrap().extend(answers);
            self
        }

        pub fn asked(&self) -> Vec<String> {
            self.asked.lock().unwrap().clone()
        }

        pub fn warnings(&self) -> Vec<String> {
            self.warnings.lock().unwrap().clone()
        }
    }

    impl Frontend for ScriptedFrontend {
        fn info(&self, _message: &str) -> Result<()> {
            Ok(())
        }

        fn warn(&self, message: &str) -> Result<()> {
            self.warnings.lock().unwrap().push(message.to_string());
            Ok(())
        }

        fn success(&self, _message: &str) -> Result<()> {
            Ok(())
        }

        fn error(&self, _message: &str) -> Result<()> {
            Ok(())
        }

        fn start_progress(&self, _message: &str) {}

        fn stop_progress(&self, _message: &str) {}

        fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
            self.asked.lock().unwrap().push(prompt.to_string());
            Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
        }

        fn select_kind(&self) -> Result<ProjectKind> {
            Ok(self.kind)
        }

        fn input(&self, prompt: &str, default: Option<&str>, _validate: Validator) -> Result<String> {
            self.asked.lock().unwrap().push(prompt.to_string());
            self.inputs
                .lock()
                .unwrap()
                .pop_front()
                .or_else(|| default.map(str::to_string))
                .ok_or_else(|| {
                    ScaffoldError::Prompt(std::io::Error::other(format!(
                        "no scripted answer for '{}'",
                        prompt
                    )))
                })
        }

        fn select_template(&self, _templates: &[TemplateMetadata]) -> Result<usize> {
            Ok(0)
        }
    }
}
