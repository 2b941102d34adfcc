//! Template metadata types and parsing

use crate::error::{Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a template materializes its files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    /// Copy `template/` and render every file
    Normal,
    /// Hand everything to the package's own entry point
    Custom,
}

/// Catalog document (templates.yaml)
/// Lists every template the CLI can scaffold from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub templates: Vec<TemplateMetadata>,
}

/// One entry of the template catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    /// Registry package holding the template
    pub npm_name: String,

    /// Display name
    pub name: String,

    /// `latest` or an exact version of the package
    #[serde(default = "default_version")]
    pub version: String,

    /// `normal` (default) or `custom`
    #[serde(default, rename = "type")]
    pub template_type: Option<String>,

    /// Kinds this template can scaffold (`project`, `component`)
    #[serde(default, alias = "tag")]
    pub tags: BTreeSet<String>,

    /// Globs (relative to the project root) excluded from rendering
    #[serde(default, alias = "ignorePatterns")]
    pub ignore: Vec<String>,

    /// Run after rendering, e.g. `npm install`
    #[serde(default)]
    pub install_command: Option<String>,

    /// Run after the install command, e.g. `npm run dev`
    #[serde(default)]
    pub start_command: Option<String>,
}

fn default_version() -> String {
    "latest".to_string()
}

impl TemplateMetadata {
    /// Parse the declared type; a missing type means Normal
    pub fn template_type(&self) -> Result<TemplateType> {
        match self.template_type.as_deref().map(str::trim) {
            None | Some("") => Ok(TemplateType::Normal),
            Some(t) if t.eq_ignore_ascii_case("normal") => Ok(TemplateType::Normal),
            Some(t) if t.eq_ignore_ascii_case("custom") => Ok(TemplateType::Custom),
            Some(other) => Err(ScaffoldError::UnknownTemplateType(other.to_string())),
        }
    }

    /// Check if the template is tagged with a kind
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
templates:
  - npmName: "@stencil/template-vue"
    name: Vue application
    version: 1.0.2
    tag: [project]
    ignore: ["public/**"]
    installCommand: npm install
    startCommand: npm run serve
  - npmName: stencil-template-widget
    name: Widget component
    type: custom
    tags: [component]
"#;

    #[test]
    fn test_parse_catalog() {
        let doc: CatalogDocument = serde_yaml::from_str(CATALOG).unwrap();
        assert_eq!(doc.templates.len(), 2);

        let vue = &doc.templates[0];
        assert_eq!(vue.npm_name, "@stencil/template-vue");
        assert_eq!(vue.version, "1.0.2");
        assert!(vue.has_tag("project"));
        assert_eq!(vue.ignore, vec!["public/**"]);
        assert_eq!(vue.install_command.as_deref(), Some("npm install"));
        assert_eq!(vue.template_type().unwrap(), TemplateType::Normal);

        let widget = &doc.templates[1];
        assert_eq!(widget.version, "latest");
        assert!(widget.has_tag("component"));
        assert!(widget.start_command.is_none());
        assert_eq!(widget.template_type().unwrap(), TemplateType::Custom);
    }

    #[test]
    fn test_unknown_template_type() {
        let doc: CatalogDocument = serde_yaml::from_str(
            "templates:\n  - npmName: x\n    name: x\n    type: remote\n",
        )
        .unwrap();
        let err = doc.templates[0].template_type().unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownTemplateType(t) if t == "remote"));
    }

    #[test]
    fn test_template_info_serializes_camel_case() {
        let doc: CatalogDocument = serde_yaml::from_str(CATALOG).unwrap();
        let json = serde_json::to_value(&doc.templates[0]).unwrap();
        assert_eq!(json["npmName"], "@stencil/template-vue");
        assert_eq!(json["installCommand"], "npm install");
        assert!(json["type"].is_null());
    }
}
