use crate::domain::repositories::{EpisodeCatalog, StreamResolver};
use crate::domain::value_objects::{EpisodeNumber, ProbeResult, StreamUrl};
use crate::infrastructure::{InfrastructureError, RetryPolicy};
use crate::presentation::ConsoleOutput;
use std::sync::Arc;

/// Reintenta sondeo + resolucion hasta obtener un stream.
///
/// El sondeo es barato y se repite con espera mientras el episodio no este
/// en el catalogo; el navegador solo se abre cuando el catalogo lo confirma.
pub struct AvailabilityPoller<C, R> {
    catalog: Arc<C>,
    resolver: R,
    retry: RetryPolicy,
    salida: ConsoleOutput,
}

impl<C, R> AvailabilityPoller<C, R>
where
    C: EpisodeCatalog<Error = InfrastructureError>,
    R: StreamResolver<Error = InfrastructureError>,
{
    pub fn new(catalog: Arc<C>, resolver: R, retry: RetryPolicy) -> Self {
        Self {
            catalog,
            resolver,
            retry,
            salida: ConsoleOutput::new(),
        }
    }

    /// Devuelve el stream del episodio, esperando lo que haga falta.
    /// # Errors
    /// - `InfrastructureError::Cancelled` si se cancela durante una espera.
    /// - Cualquier error del resolvedor (manifiesto sin entrada segura, red...).
    pub async fn resolve(&self, episode: EpisodeNumber) -> Result<StreamUrl, InfrastructureError> {
        loop {
            self.retry.check_cancelled()?;

            match self.catalog.probe(episode).await {
                Ok(ProbeResult::Published(detail_url)) => {
                    self.salida.mostrar_episodio_publicado(episode, &detail_url);
                    let stream = self.resolver.resolve(&detail_url).await?;
                    self.salida.mostrar_stream_resuelto(episode, stream.as_str());
                    return Ok(stream);
                }
                Ok(ProbeResult::NotPublished) => {
                    let espera = self.retry.backoff_interval();
                    self.salida.mostrar_episodio_no_publicado(episode, espera);
                    self.retry.wait(espera).await?;
                }
                Err(InfrastructureError::Cancelled) => return Err(InfrastructureError::Cancelled),
                Err(err) => {
                    let espera = self.retry.backoff_interval();
                    self.salida
                        .advertir_fallo_sondeo(episode, &err.to_string(), espera);
                    self.retry.wait(espera).await?;
                }
            }
        }
    }
}
