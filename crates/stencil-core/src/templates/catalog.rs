//! Template catalog from a remote URL or a local directory
//!
//! Both sources serve the same `templates.yaml` document, so local template
//! development behaves exactly like production.

use super::metadata::{CatalogDocument, TemplateMetadata};
use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::registry::client::build_url;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;
use url::Url;

/// File name of the catalog document
pub const CATALOG_FILE: &str = "templates.yaml";

/// Template source - either remote URL or local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        let url = Url::parse(&url_str)
            .map_err(|e| ScaffoldError::Config(format!("invalid template URL {}: {}", url_str, e)))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.to_string(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

/// Fetches the list of available templates
pub struct TemplateCatalog {
    source: TemplateSource,
    client: reqwest::Client,
}

impl TemplateCatalog {
    /// Create a catalog with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Fetch every available template
    ///
    /// An empty catalog is an error: there is nothing to scaffold from.
    pub async fn list_templates(&self) -> Result<Vec<TemplateMetadata>> {
        let content = match &self.source {
            TemplateSource::Remote(base_url) => {
                let url = build_url(base_url, CATALOG_FILE)?;
                debug!(%url, "fetching template catalog");
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| ScaffoldError::registry(&url, e))?;

                if !response.status().is_success() {
                    return Err(ScaffoldError::registry(
                        &url,
                        format!("HTTP {}", response.status()),
                    ));
                }

                response
                    .text()
                    .await
                    .map_err(|e| ScaffoldError::registry(&url, e))?
            }
            TemplateSource::Local(path) => {
                let catalog_path = path.join(CATALOG_FILE);
                debug!(path = %catalog_path.display(), "reading template catalog");
                fs::read_to_string(&catalog_path)
                    .await
                    .map_err(|e| ScaffoldError::registry(catalog_path.display(), e))?
            }
        };

        let document: CatalogDocument = serde_yaml::from_str(&content).map_err(|e| {
            ScaffoldError::registry(self.source.describe(), format!("malformed catalog: {}", e))
        })?;

        if document.templates.is_empty() {
            return Err(ScaffoldError::NoTemplates(self.source.describe()));
        }
        Ok(document.templates)
    }
}

/// Keep the templates tagged with `kind`
pub fn filter_by_kind(templates: &[TemplateMetadata], kind: &str) -> Vec<TemplateMetadata> {
    templates
        .iter()
        .filter(|t| t.has_tag(kind))
        .cloned()
        .collect()
}
