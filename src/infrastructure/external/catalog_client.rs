use crate::domain::repositories::EpisodeCatalog;
use crate::domain::value_objects::{EpisodeNumber, ProbeResult};
use crate::infrastructure::InfrastructureError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";
pub(crate) const HTTP_TIMEOUT_SECS: u64 = 5;

/// Cliente HTTP del catalogo de episodios.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Crea un cliente para el catalogo en `base_url`.
    /// # Errors
    /// - `InfrastructureError::ExternalService` si falla la configuracion HTTP.
    pub fn new(base_url: impl Into<String>) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                InfrastructureError::ExternalService(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_catalog(&self) -> Result<String, InfrastructureError> {
        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::ExternalService(format!(
                "HTTP request failed with status: {}",
                status
            )));
        }

        response.text().await.map_err(|e| {
            InfrastructureError::ExternalService(format!("Failed to read catalog: {}", e))
        })
    }
}

#[async_trait]
impl EpisodeCatalog for CatalogClient {
    type Error = InfrastructureError;

    async fn probe(&self, episode: EpisodeNumber) -> Result<ProbeResult, InfrastructureError> {
        let page = self.fetch_catalog().await?;
        extract_episode_url(&page, &self.base_url, episode)
    }
}

/// Busca el episodio en el texto del catalogo y reconstruye su pagina de detalle.
///
/// Solo cuentan las apariciones de `-{n}` que no siguen con otro digito ni con
/// `-`, de modo que `-1` no coincide dentro de `-12`, de una fecha o del slug
/// de la temporada. La edicion es el texto tras el ultimo `-` anterior a la
/// primera coincidencia; la ruta sale del tramo que sigue a la segunda
/// aparicion de `{edicion}-{n}`, despues de su primera `/` y hasta el primer
/// espacio.
/// # Returns
/// - `{base}-{edicion}-{n}/{ruta}` o `ProbeResult::NotPublished` si `-{n}` no aparece.
/// # Errors
/// - `InfrastructureError::CatalogFormat` si `-{n}` aparece pero no se puede extraer la ruta.
pub fn extract_episode_url(
    page: &str,
    base_url: &str,
    episode: EpisodeNumber,
) -> Result<ProbeResult, InfrastructureError> {
    let marcador = format!("-{}", episode);
    let Some(posicion) = coincidencias_delimitadas(page, &marcador).next() else {
        return Ok(ProbeResult::NotPublished);
    };

    let previo = &page[..posicion];
    let edicion = previo.rsplit('-').next().unwrap_or(previo);
    let clave = format!("{}-{}", edicion, episode);

    let mut apariciones = coincidencias_delimitadas(page, &clave);
    let (Some(_), Some(segunda)) = (apariciones.next(), apariciones.next()) else {
        return Err(InfrastructureError::CatalogFormat(format!(
            "episode {} found but '{}' appears fewer than two times",
            episode, clave
        )));
    };
    let fin = apariciones.next().unwrap_or(page.len());
    let tramo = &page[segunda + clave.len()..fin];

    let tras_barra = tramo.split_once('/').map_or(tramo, |(_, resto)| resto);
    let ruta = tras_barra.split(' ').next().unwrap_or(tras_barra);

    Ok(ProbeResult::Published(format!(
        "{}-{}-{}/{}",
        base_url, edicion, episode, ruta
    )))
}

/// Posiciones de `aguja` cuyo siguiente caracter no es un digito ni `-`.
fn coincidencias_delimitadas<'a>(
    page: &'a str,
    aguja: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    page.match_indices(aguja)
        .map(|(posicion, _)| posicion)
        .filter(move |posicion| {
            page[posicion + aguja.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_ascii_digit() && c != '-')
        })
}
