//! End-to-end `init` runs against a local catalog and a mock registry

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use httpmock::prelude::*;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use stencil_core::exec::{CommandRunner, Invocation};
use stencil_core::project::Validator;
use stencil_core::templates::CATALOG_FILE;
use stencil_core::{
    CliConfig, Frontend, InitOptions, InitOutcome, InitWorkflow, ProjectKind, Registry, Result,
    ScaffoldError, TemplateMetadata, TemplateSource,
};
use tempfile::TempDir;
use url::Url;

/// Answers prompts from a script
struct ScriptedFrontend {
    inputs: Mutex<VecDeque<String>>,
    confirms: Mutex<VecDeque<bool>>,
    confirm_prompts: Mutex<Vec<String>>,
}

impl ScriptedFrontend {
    fn new(inputs: &[&str], confirms: &[bool]) -> Self {
        Self {
            inputs: Mutex::new(inputs.iter().map(|s| s.to_string()).collect()),
            confirms: Mutex::new(confirms.iter().copied().collect()),
            confirm_prompts: Mutex::new(Vec::new()),
        }
    }

    fn confirm_prompts(&self) -> Vec<String> {
        self.confirm_prompts.lock().unwrap().clone()
    }
}

impl Frontend for ScriptedFrontend {
    fn info(&self, _message: &str) -> Result<()> {
        Ok(())
    }

    fn warn(&self, _message: &str) -> Result<()> {
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
        self.confirm_prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
    }

    fn select_kind(&self) -> Result<ProjectKind> {
        Ok(ProjectKind::Project)
    }

    fn input(&self, prompt: &str, default: Option<&str>, _validate: Validator) -> Result<String> {
        self.inputs
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| default.map(str::to_string))
            .ok_or_else(|| ScaffoldError::Prompt(io::Error::other(prompt.to_string())))
    }

    fn select_template(&self, _templates: &[TemplateMetadata]) -> Result<usize> {
        Ok(0)
    }
}

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(Invocation::display)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(Some(0))
    }
}

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new(catalog: &str) -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("catalog")).unwrap();
        fs::create_dir_all(temp.path().join("work")).unwrap();
        fs::write(temp.path().join("catalog").join(CATALOG_FILE), catalog).unwrap();
        Self { temp }
    }

    fn path(&self) -> &Path {
        self.temp.path()
    }

    fn work(&self) -> PathBuf {
        self.path().join("work")
    }

    fn config(&self, registry: Registry, local_package: Option<PathBuf>) -> CliConfig {
        CliConfig {
            home_dir: self.path().to_path_buf(),
            cli_home: self.path().join(".stencil-cli"),
            working_dir: self.work(),
            local_package,
            registry,
            template_source: TemplateSource::local(self.path().join("catalog")),
            entry_runtime: Some("node".to_string()),
            user_agent: "stencil-test".to_string(),
        }
    }
}

const NORMAL_CATALOG: &str = r#"
templates:
  - npmName: demo-template
    name: Demo
    tag: [project]
    installCommand: npm install
"#;

/// A gzipped package tarball with everything under `package/`
fn package_tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, format!("package/{}", path), content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

async fn mock_registry(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
    let tarball = package_tarball(&[
        ("package.json", r#"{"name": "demo-template", "version": "1.0.0"}"#),
        (
            "template/package.json",
            r#"{"name": "<%= name %>", "version": "<%= version %>"}"#,
        ),
        ("template/README.md", "# <%= projectName %>"),
        (
            "template/src/App.jsx",
            "export const App = () => <h1 style={{ margin: 0 }}><%= className %></h1>;\n",
        ),
    ]);
    let document = serde_json::json!({
        "name": "demo-template",
        "versions": {
            "1.0.0": {"dist": {"tarball": server.url("/demo-template/-/demo-template-1.0.0.tgz")}}
        }
    });

    let document_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/demo-template");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(document);
        })
        .await;
    let tarball_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/demo-template/-/demo-template-1.0.0.tgz");
            then.status(200).body(tarball);
        })
        .await;
    (document_mock, tarball_mock)
}

#[tokio::test]
async fn test_normal_template_is_rendered_and_installed() {
    let server = MockServer::start_async().await;
    let (_document, tarball) = mock_registry(&server).await;
    let workspace = Workspace::new(NORMAL_CATALOG);
    let config = workspace.config(
        Registry::Custom(Url::parse(&server.base_url()).unwrap()),
        None,
    );
    let frontend = ScriptedFrontend::new(&["1.0.0"], &[]);
    let runner = Arc::new(RecordingRunner::default());

    let outcome = InitWorkflow::new(&config, &frontend)
        .with_runner(runner.clone())
        .run(InitOptions {
            project_name: Some("demo".to_string()),
            force: false,
        })
        .await
        .unwrap();

    let InitOutcome::Completed { project, target, .. } = outcome else {
        panic!("run was cancelled");
    };
    assert_eq!(project.name, "demo");
    assert_eq!(target, workspace.work());

    assert_eq!(
        fs::read_to_string(workspace.work().join("package.json")).unwrap(),
        r#"{"name": "demo", "version": "1.0.0"}"#
    );
    assert_eq!(
        fs::read_to_string(workspace.work().join("README.md")).unwrap(),
        "# demo"
    );
    assert_eq!(
        fs::read_to_string(workspace.work().join("src/App.jsx")).unwrap(),
        "export const App = () => <h1 style={{ margin: 0 }}>demo</h1>;\n"
    );
    assert!(config
        .template_store()
        .join("_demo-template@1.0.0@demo-template/template/README.md")
        .is_file());

    assert_eq!(runner.commands(), vec!["npm install"]);
    assert_eq!(runner.calls.lock().unwrap()[0].cwd, workspace.work());
    tarball.assert_async().await;
}

#[tokio::test]
async fn test_second_run_reuses_cached_package() {
    let server = MockServer::start_async().await;
    let (_document, tarball) = mock_registry(&server).await;
    let workspace = Workspace::new(NORMAL_CATALOG);
    let config = workspace.config(
        Registry::Custom(Url::parse(&server.base_url()).unwrap()),
        None,
    );

    for _ in 0..2 {
        // Directory is non-empty on the second run; keep its contents
        let frontend = ScriptedFrontend::new(&["1.0.0"], &[false]);
        InitWorkflow::new(&config, &frontend)
            .with_runner(Arc::new(RecordingRunner::default()))
            .run(InitOptions {
                project_name: Some("demo".to_string()),
                force: true,
            })
            .await
            .unwrap();
    }

    tarball.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_non_empty_directory_waits_for_confirmation() {
    let workspace = Workspace::new(NORMAL_CATALOG);
    fs::write(workspace.work().join("notes.txt"), "unrelated").unwrap();
    let config = workspace.config(
        Registry::Custom(Url::parse("http://127.0.0.1:9").unwrap()),
        None,
    );
    let frontend = ScriptedFrontend::new(&[], &[false]);
    let runner = Arc::new(RecordingRunner::default());

    let outcome = InitWorkflow::new(&config, &frontend)
        .with_runner(runner.clone())
        .run(InitOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, InitOutcome::Cancelled);
    assert_eq!(frontend.confirm_prompts().len(), 1);
    let entries: Vec<_> = fs::read_dir(workspace.work())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["notes.txt"]);
    assert_eq!(
        fs::read_to_string(workspace.work().join("notes.txt")).unwrap(),
        "unrelated"
    );
    assert!(!config.cli_home.exists());
    assert!(runner.commands().is_empty());
}

#[tokio::test]
async fn test_custom_template_without_entry_point() {
    let workspace = Workspace::new(
        r#"
templates:
  - npmName: custom-template
    name: Custom
    type: custom
    tag: [project]
"#,
    );
    let package = workspace.path().join("custom-template");
    fs::create_dir_all(package.join("template")).unwrap();
    fs::write(package.join("package.json"), r#"{"name": "custom-template"}"#).unwrap();
    let config = workspace.config(Registry::Primary, Some(package));
    let frontend = ScriptedFrontend::new(&["1.0.0"], &[]);
    let runner = Arc::new(RecordingRunner::default());

    let err = InitWorkflow::new(&config, &frontend)
        .with_runner(runner.clone())
        .run(InitOptions {
            project_name: Some("demo".to_string()),
            force: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::MissingEntryPoint(name) if name == "custom-template"));
    assert_eq!(fs::read_dir(workspace.work()).unwrap().count(), 0);
    assert!(runner.commands().is_empty());
}
