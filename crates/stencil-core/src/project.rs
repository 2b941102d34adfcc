//! Project information collected before scaffolding
//!
//! [`collect`] drives the prompts through a [`Frontend`]; the validators are
//! plain functions so the same rules apply to flags, prompts and tests.

use crate::error::{Result, ScaffoldError, ValidationError};
use crate::frontend::Frontend;
use crate::registry::version::parse_version;
use crate::templates::{filter_by_kind, TemplateMetadata};
use regex::Regex;
use serde_json::{json, Value as JsonValue};
use std::sync::LazyLock;
use tracing::debug;

/// Version offered when the user does not type one
pub const DEFAULT_VERSION: &str = "1.0.0";

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+([-][a-zA-Z][a-zA-Z0-9]*|[_][a-zA-Z][a-zA-Z0-9]*|[a-zA-Z0-9])*$")
        .expect("project name pattern compiles")
});

/// What is being scaffolded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Project,
    Component,
}

impl ProjectKind {
    /// Catalog tag of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Component => "Component",
        }
    }
}

/// Everything known about the project being created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub kind: ProjectKind,
    pub name: String,
    /// Kebab-case form of `name`
    pub class_name: String,
    pub version: String,
    /// Package name of the chosen template
    pub template_id: String,
    /// Required for components
    pub description: Option<String>,
}

impl ProjectInfo {
    /// Handlebars context for rendering, also passed to custom installers
    pub fn render_context(&self) -> JsonValue {
        json!({
            "type": self.kind.as_str(),
            "name": self.name,
            "projectName": self.name,
            "className": self.class_name,
            "version": self.version,
            "projectVersion": self.version,
            "npmName": self.template_id,
            "description": self.description,
        })
    }
}

/// Signature shared by every input validator
pub type Validator = fn(&str) -> std::result::Result<(), ValidationError>;

pub fn validate_name(name: &str) -> std::result::Result<(), ValidationError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidName(name.to_string()))
    }
}

pub fn validate_version(version: &str) -> std::result::Result<(), ValidationError> {
    normalize_version(version).map(|_| ())
}

pub fn validate_description(description: &str) -> std::result::Result<(), ValidationError> {
    if description.trim().is_empty() {
        Err(ValidationError::EmptyDescription)
    } else {
        Ok(())
    }
}

/// Canonical semver string (`v1.2` is rejected, `v1.2.0` becomes `1.2.0`)
pub fn normalize_version(version: &str) -> std::result::Result<String, ValidationError> {
    parse_version(version.trim())
        .map(|v| v.to_string())
        .ok_or_else(|| ValidationError::InvalidVersion(version.to_string()))
}

/// Kebab-case a name: `MyApp` becomes `my-app`, `my_app` is unchanged
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    match out.strip_prefix('-') {
        Some(stripped) => stripped.to_string(),
        None => out,
    }
}

/// Ask for project details and the template to use
///
/// `seed_name` comes from the command line; a valid one skips the name prompt.
pub fn collect(
    frontend: &dyn Frontend,
    seed_name: Option<&str>,
    templates: &[TemplateMetadata],
) -> Result<(ProjectInfo, TemplateMetadata)> {
    let kind = frontend.select_kind()?;

    let candidates = filter_by_kind(templates, kind.as_str());
    if candidates.is_empty() {
        return Err(ScaffoldError::NoTemplatesForKind(kind.as_str().to_string()));
    }

    let label = kind.label();
    let name = match seed_name {
        Some(seed) if validate_name(seed).is_ok() => seed.to_string(),
        seed => {
            if let Some(invalid) = seed {
                frontend.warn(&ValidationError::InvalidName(invalid.to_string()).to_string())?;
            }
            let name = frontend.input(&format!("{} name", label), None, validate_name)?;
            validate_name(&name)?;
            name
        }
    };

    let version = frontend.input(
        &format!("{} version", label),
        Some(DEFAULT_VERSION),
        validate_version,
    )?;
    let version = normalize_version(&version)?;

    let description = match kind {
        ProjectKind::Component => {
            let description = frontend.input(
                &format!("{} description", label),
                None,
                validate_description,
            )?;
            validate_description(&description)?;
            Some(description.trim().to_string())
        }
        ProjectKind::Project => None,
    };

    let selected = frontend.select_template(&candidates)?;
    let template = candidates
        .get(selected)
        .cloned()
        .ok_or_else(|| ScaffoldError::TemplateNotFound(format!("#{}", selected)))?;

    let info = ProjectInfo {
        kind,
        class_name: kebab_case(&name),
        name,
        version,
        template_id: template.npm_name.clone(),
        description,
    };
    debug!(?info, template = %template.npm_name, "collected project info");
    Ok((info, template))
}
