use crate::domain::value_objects::StreamUrl;
use crate::infrastructure::external::catalog_client::{DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECS};
use crate::infrastructure::InfrastructureError;
use reqwest::Client;
use std::time::Duration;

const SECURE_PREFIX: &str = "https://";

/// Cliente HTTP para manifiestos HLS.
#[derive(Clone)]
pub struct ManifestClient {
    client: Client,
}

impl ManifestClient {
    /// # Errors
    /// - `InfrastructureError::ExternalService` si falla la configuracion HTTP.
    pub fn new() -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                InfrastructureError::ExternalService(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    /// Descarga el manifiesto y devuelve su primera entrada segura.
    /// # Errors
    /// - `InfrastructureError::ExternalService` si falla la red.
    /// - `InfrastructureError::ManifestMalformed` si no hay entradas `https://`.
    pub async fn resolve(&self, manifest_url: &str) -> Result<StreamUrl, InfrastructureError> {
        let contenido = self.obtener_manifiesto(manifest_url).await?;
        select_secure_entry(&contenido)
    }

    async fn obtener_manifiesto(&self, url: &str) -> Result<String, InfrastructureError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::ExternalService(format!(
                "HTTP request failed with status: {}",
                status
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            InfrastructureError::ExternalService(format!("Failed to read manifest: {}", e))
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Primera linea del manifiesto, en orden de documento, que empieza por `https://`.
/// # Errors
/// - `InfrastructureError::ManifestMalformed` con el contenido completo si no hay ninguna.
pub fn select_secure_entry(contenido: &str) -> Result<StreamUrl, InfrastructureError> {
    contenido
        .lines()
        .map(str::trim)
        .find(|linea| linea.starts_with(SECURE_PREFIX))
        .map(StreamUrl::secure)
        .transpose()?
        .ok_or_else(|| InfrastructureError::ManifestMalformed {
            content: contenido.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_secure_entry_in_document_order() {
        let playlist = "\
#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360
http://plain.example.com/low.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=1400000,RESOLUTION=1280x720
https://cdn.example.com/mid.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2800000,RESOLUTION=1920x1080
https://cdn.example.com/hi.m3u8
";
        let url = select_secure_entry(playlist).expect("secure entry");
        assert_eq!(url.as_str(), "https://cdn.example.com/mid.m3u8");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let playlist = "#EXTM3U\r\nhttps://cdn.example.com/a.m3u8\r\n";
        let url = select_secure_entry(playlist).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/a.m3u8");
    }

    #[test]
    fn missing_secure_entry_carries_full_content() {
        let playlist = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\nlow.m3u8\nhttp://x/y.m3u8\n";
        match select_secure_entry(playlist) {
            Err(InfrastructureError::ManifestMalformed { content }) => {
                assert_eq!(content, playlist);
            }
            other => panic!("Se esperaba ManifestMalformed, obtenido {:?}", other),
        }
    }
}
