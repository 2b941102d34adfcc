//! In-place rendering of copied template files
//!
//! Placeholders use EJS-style delimiters: `<%= name %>` prints a value and
//! `<% if description %>...<% endif %>` controls output. Everything else,
//! including `{{ }}` in JSX or Vue sources, is copied through untouched. A
//! reference to a variable the context does not define is an error. Every
//! file is an independent task; the batch fails on the first error and
//! aborts whatever is still running.

use crate::error::{Result, ScaffoldError};
use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::task::JoinSet;
use tracing::debug;

/// Shared template environment configured for source files
#[derive(Clone)]
pub struct Renderer {
    env: Arc<Environment<'static>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_syntax(ejs_syntax());
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        // Output is source code, not HTML; an unset optional field prints nothing
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
        env.set_formatter(|out, state, value| {
            if value.is_none() {
                Ok(())
            } else {
                minijinja::escape_formatter(out, state, value)
            }
        });
        Self { env: Arc::new(env) }
    }

    /// Render a template string with JSON context
    pub fn render_str(&self, template: &str, context: &JsonValue) -> std::result::Result<String, String> {
        self.env
            .render_str(template, context)
            .map_err(|e| e.to_string())
    }

    /// Render one file in place
    ///
    /// Returns `false` for files that are not UTF-8 text; those are left as
    /// copied.
    pub async fn render_file(&self, path: &Path, context: &JsonValue) -> Result<bool> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| ScaffoldError::io(format!("reading {}", path.display()), e))?;
        let Ok(text) = String::from_utf8(bytes) else {
            debug!(path = %path.display(), "skipping binary file");
            return Ok(false);
        };

        let rendered = self
            .render_str(&text, context)
            .map_err(|reason| ScaffoldError::Render {
                path: path.to_path_buf(),
                reason,
            })?;
        fs::write(path, rendered)
            .await
            .map_err(|e| ScaffoldError::io(format!("writing {}", path.display()), e))?;
        Ok(true)
    }

    /// Render every file concurrently, failing fast
    ///
    /// Returns how many files were rendered. Files already written before a
    /// failure keep their rendered content.
    pub async fn render_all(&self, files: Vec<PathBuf>, context: JsonValue) -> Result<usize> {
        let context = Arc::new(context);
        let mut tasks = JoinSet::new();

        for path in files {
            let renderer = self.clone();
            let context = Arc::clone(&context);
            tasks.spawn(async move { renderer.render_file(&path, &context).await });
        }

        let mut rendered = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(true)) => rendered += 1,
                Ok(Ok(false)) => {}
                Ok(Err(e)) => {
                    tasks.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    tasks.abort_all();
                    return Err(ScaffoldError::Render {
                        path: PathBuf::new(),
                        reason: format!("render task failed: {}", e),
                    });
                }
            }
        }
        Ok(rendered)
    }
}

fn ejs_syntax() -> SyntaxConfig {
    SyntaxConfig::builder()
        .block_delimiters("<%", "%>")
        .variable_delimiters("<%=", "%>")
        .comment_delimiters("<%#", "%>")
        .build()
        .expect("delimiters are valid")
}
