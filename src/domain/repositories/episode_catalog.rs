use crate::domain::value_objects::{EpisodeNumber, ProbeResult};
use async_trait::async_trait;

/// Contrato para consultar si un episodio ya esta publicado.
#[async_trait]
pub trait EpisodeCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sondea el catalogo una sola vez.
    /// # Arguments
    /// - `episode`: episodio buscado.
    /// # Returns
    /// - `Ok(ProbeResult::Published(url))` con la pagina de detalle;
    ///   `Ok(ProbeResult::NotPublished)` si aun no aparece.
    /// # Errors
    /// - `Self::Error` si falla la red o el formato del catalogo cambio.
    async fn probe(&self, episode: EpisodeNumber) -> Result<ProbeResult, Self::Error>;
}
