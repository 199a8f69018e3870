use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning raw catalog input into a [`Catalog`](crate::model::catalog::Catalog).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),

    #[error("schema violation at {location}: {reason}")]
    SchemaViolation { location: String, reason: String },

    #[error("failed to decode catalog bytes as {encoding}")]
    Encoding { encoding: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn schema(location: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::SchemaViolation {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Stable identifier sent to the host alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::MalformedDocument(_) => "malformed_document",
            CatalogError::SchemaViolation { .. } => "schema_violation",
            CatalogError::Encoding { .. } => "encoding",
            CatalogError::Io { .. } => "io",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("language not loaded: {0}")]
    LanguageNotLoaded(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::LanguageNotLoaded(_) => "language_not_loaded",
            StoreError::Catalog(e) => e.code(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
