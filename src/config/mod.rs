//! Declarative filemod documents

mod schema;

pub use schema::{
    AppendCondition, DeclarativeConfig, DeclarativeRule, DeleteRules, DocumentTest,
    FILE_ROOT_PLACEHOLDER,
};

use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Document syntax, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a transform file path
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Some(DocumentFormat::Yaml),
            Some("toml") => Some(DocumentFormat::Toml),
            _ => None,
        }
    }
}

impl DeclarativeConfig {
    /// Load a declarative document from a `.yml`, `.yaml` or `.toml` file
    pub async fn load(path: &Path) -> Result<Self> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| Error::UnsupportedTransformFile(path.to_path_buf()))?;

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io("read", path, e))?;

        debug!("Loaded filemod document from {}", path.display());
        Self::parse(&content, format)
    }

    /// Parse a document from raw bytes (always YAML)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_yaml::from_slice(bytes)?)
    }

    /// Parse a document from text in the given format
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        match format {
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            DocumentFormat::Toml => Ok(toml::from_str(content)?),
        }
    }
}
