use crate::application::download_trigger::DownloadTrigger;
use crate::application::poller::AvailabilityPoller;
use crate::domain::repositories::{Downloader, EpisodeCatalog, StreamResolver};
use crate::domain::value_objects::release_window::day_index;
use crate::domain::value_objects::{
    post_download_sleep, EpisodeNumber, ProbeResult, ReleaseWindow, StreamUrl, WindowDecision,
};
use crate::infrastructure::{InfrastructureError, RetryPolicy};
use crate::presentation::ConsoleOutput;
use chrono::Datelike;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Estado en memoria del planificador. Se reconstruye al arrancar a partir
/// de los archivos ya descargados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    pub episode: EpisodeNumber,
    /// El sondeo anticipado de este ciclo ya se hizo.
    pub early_probe_done: bool,
    /// El sondeo anticipado encontro el episodio: la ventana no se aplica.
    pub fast_path: bool,
    pub last_url: Option<StreamUrl>,
}

impl SchedulerState {
    pub fn new(episode: EpisodeNumber) -> Self {
        Self {
            episode,
            early_probe_done: false,
            fast_path: false,
            last_url: None,
        }
    }

    fn advance(&mut self, url: StreamUrl) {
        self.episode = self.episode.next();
        self.early_probe_done = false;
        self.fast_path = false;
        self.last_url = Some(url);
    }
}

/// Resultado de un ciclo completo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub episode: EpisodeNumber,
    pub stream: StreamUrl,
    pub destination: PathBuf,
    pub fast_path: bool,
    /// Espera antes de buscar el siguiente episodio.
    pub sleep: Duration,
}

/// Bucle principal: un ciclo por episodio, limitado a la ventana de estreno.
pub struct Scheduler<C, R, D> {
    catalog: Arc<C>,
    poller: AvailabilityPoller<C, R>,
    trigger: DownloadTrigger<D>,
    window: ReleaseWindow,
    retry: RetryPolicy,
    state: SchedulerState,
    salida: ConsoleOutput,
}

impl<C, R, D> Scheduler<C, R, D>
where
    C: EpisodeCatalog<Error = InfrastructureError>,
    R: StreamResolver<Error = InfrastructureError>,
    D: Downloader<Error = InfrastructureError>,
{
    /// # Arguments
    /// - `first_episode`: primer episodio a buscar (el mayor en disco + 1).
    pub fn new(
        catalog: Arc<C>,
        resolver: R,
        trigger: DownloadTrigger<D>,
        window: ReleaseWindow,
        retry: RetryPolicy,
        first_episode: EpisodeNumber,
    ) -> Self {
        let poller = AvailabilityPoller::new(Arc::clone(&catalog), resolver, retry.clone());
        Self {
            catalog,
            poller,
            trigger,
            window,
            retry,
            state: SchedulerState::new(first_episode),
            salida: ConsoleOutput::new(),
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn trigger(&self) -> &DownloadTrigger<D> {
        &self.trigger
    }

    /// Ejecuta ciclos indefinidamente. Solo termina por cancelacion o por un
    /// error no recuperable (manifiesto invalido, descarga fallida, disco).
    /// # Errors
    /// - `InfrastructureError::Cancelled` al recibir la senal de parada.
    pub async fn run(&mut self) -> Result<(), InfrastructureError> {
        self.salida.mostrar_inicio_vigilancia(
            self.state.episode,
            &self.window,
            self.trigger.output_dir(),
        );
        loop {
            match self.run_cycle().await {
                Ok(report) => {
                    self.salida
                        .mostrar_espera_entre_ciclos(report.sleep, report.fast_path);
                    self.retry.wait(report.sleep).await?;
                }
                Err(err) if err.is_transient() => {
                    let espera = self.retry.backoff_interval();
                    self.salida
                        .advertir_ciclo_fallido(self.state.episode, &err.to_string(), espera);
                    self.retry.wait(espera).await?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Un ciclo: espera a la ventana (o via rapida), obtiene el stream,
    /// descarga y avanza al siguiente episodio. No duerme al final.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, InfrastructureError> {
        let episode = self.state.episode;
        self.salida.mostrar_buscando_episodio(episode);

        let inicio_sondeo = loop {
            self.retry.check_cancelled()?;

            if !self.state.early_probe_done {
                self.state.early_probe_done = true;
                if self.sondeo_anticipado(episode).await? {
                    self.state.fast_path = true;
                    self.salida.mostrar_episodio_anticipado(episode);
                }
            }

            let now = self.retry.clock().now();
            match self.window.evaluate(now, self.state.fast_path) {
                WindowDecision::Sleep { state, duration } => {
                    self.salida
                        .mostrar_espera_ventana(state, day_index(now.weekday()), duration);
                    self.retry.wait(duration).await?;
                }
                WindowDecision::Poll => break now,
            }
        };

        self.salida.mostrar_sondeando(
            episode,
            day_index(inicio_sondeo.weekday()),
            &inicio_sondeo.format("%H:%M").to_string(),
        );

        let stream = self.poller.resolve(episode).await?;
        let destination = self.trigger.trigger(&stream, episode).await?;
        self.salida.mostrar_descarga_completada(episode, &destination);

        let fast_path = self.state.fast_path;
        let sleep = post_download_sleep(inicio_sondeo.weekday(), fast_path);
        self.state.advance(stream.clone());

        Ok(CycleReport {
            episode,
            stream,
            destination,
            fast_path,
            sleep,
        })
    }

    /// Sondeo unico al empezar cada ciclo, sin mirar la ventana.
    async fn sondeo_anticipado(&self, episode: EpisodeNumber) -> Result<bool, InfrastructureError> {
        match self.catalog.probe(episode).await {
            Ok(ProbeResult::Published(_)) => Ok(true),
            Ok(ProbeResult::NotPublished) => Ok(false),
            Err(InfrastructureError::Cancelled) => Err(InfrastructureError::Cancelled),
            Err(err) => {
                self.salida
                    .advertir_sondeo_anticipado_fallido(episode, &err.to_string());
                Ok(false)
            }
        }
    }
}
