use crate::domain::errors::DomainError;
use thiserror::Error;

/// Errores de infraestructura.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Catalog format changed: {0}")]
    CatalogFormat(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Manifest has no https entry:\n\n{content}")]
    ManifestMalformed { content: String },

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InfrastructureError {
    /// Fallos pasajeros tras los que se puede repetir el ciclo completo.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ExternalService(_) | Self::CatalogFormat(_) | Self::Browser(_)
        )
    }
}

impl From<reqwest::Error> for InfrastructureError {
    fn from(err: reqwest::Error) -> Self {
        Self::ExternalService(format!("HTTP request failed: {}", err))
    }
}

impl From<chromiumoxide::error::CdpError> for InfrastructureError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}
