use crate::domain::value_objects::StreamUrl;
use async_trait::async_trait;

/// Contrato para obtener un stream reproducible desde la pagina de un episodio.
#[async_trait]
pub trait StreamResolver: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Espera hasta que la pagina exponga un stream y lo devuelve.
    /// # Arguments
    /// - `detail_url`: pagina de detalle del episodio.
    /// # Returns
    /// - URL `https://` del playlist elegido.
    /// # Errors
    /// - `Self::Error` si el manifiesto no tiene entradas seguras, falla la
    ///   red o se cancela la espera.
    async fn resolve(&self, detail_url: &str) -> Result<StreamUrl, Self::Error>;
}
