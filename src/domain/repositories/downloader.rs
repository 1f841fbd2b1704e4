use crate::domain::value_objects::DownloadRequest;
use async_trait::async_trait;

/// Contrato del descargador externo.
#[async_trait]
pub trait Downloader: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Descarga `request.source` en `request.destination`.
    /// # Errors
    /// - `Self::Error` si el proceso externo falla o se cancela.
    async fn download(&self, request: DownloadRequest) -> Result<(), Self::Error>;
}
