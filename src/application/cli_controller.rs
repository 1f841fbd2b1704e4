use crate::application::download_trigger::DownloadTrigger;
use crate::application::scheduler::Scheduler;
use crate::domain::repositories::{Clock, Downloader, EpisodeCatalog};
use crate::domain::value_objects::{DownloadRequest, EpisodeNumber, ProbeResult};
use crate::infrastructure::config::app_config::expandir_tilde;
use crate::infrastructure::storage::next_episode;
use crate::infrastructure::{
    AppConfig, BrowserResolver, CatalogClient, ExternalDownloader, InfrastructureError,
    ManifestClient, RetryPolicy, SystemClock,
};
use crate::presentation::{Cli, Commands, ConsoleOutput};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

/// Orquesta la ejecucion de la CLI.
pub async fn ejecutar_cli(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let salida = ConsoleOutput::new();
    let config = aplicar_overrides(config, &cli);
    config.validate()?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let retry = RetryPolicy::new(config.backoff(), clock, cancel_rx.clone());
    let downloader = ExternalDownloader::new(
        config.downloader_program.clone(),
        config.downloader_args.clone(),
    )
    .with_cancel_receiver(cancel_rx);

    let resultado = match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => vigilar(&config, retry, downloader).await,
        Commands::Check { episode } => verificar_episodio(&config, &salida, episode).await,
        Commands::Next => mostrar_siguiente(&config, &salida, downloader),
        Commands::Fetch { url, output_path } => {
            descarga_manual(&salida, downloader, &url, &expandir_tilde(&output_path)).await
        }
    };

    match resultado {
        Ok(()) => Ok(()),
        Err(InfrastructureError::Cancelled) => {
            salida.mostrar_cancelacion();
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn aplicar_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(output) = cli.output.as_deref() {
        config = config.with_output_dir(output);
    }
    if let Some(season) = cli.season.as_deref() {
        config.season = season.to_string();
    }
    if let Some(catalog_url) = cli.catalog_url.as_deref() {
        config.catalog_url = catalog_url.to_string();
    }
    if let Some(downloader) = cli.downloader.as_deref() {
        config.downloader_program = expandir_tilde(downloader);
    }
    config
}

fn crear_trigger<D>(config: &AppConfig, downloader: D) -> Result<DownloadTrigger<D>, InfrastructureError>
where
    D: Downloader<Error = InfrastructureError>,
{
    Ok(DownloadTrigger::new(
        downloader,
        config.output_dir.clone(),
        config.season_label()?,
        &config.extension,
    ))
}

async fn vigilar(
    config: &AppConfig,
    retry: RetryPolicy,
    downloader: ExternalDownloader,
) -> Result<(), InfrastructureError> {
    let catalog = Arc::new(CatalogClient::new(config.catalog_base_url()?)?);
    let resolver = BrowserResolver::new(
        config.browser_settings(),
        ManifestClient::new()?,
        retry.clone(),
    );
    let trigger = crear_trigger(config, downloader)?;
    let primer_episodio = next_episode(&config.output_dir)?;

    let mut scheduler = Scheduler::new(
        catalog,
        resolver,
        trigger,
        config.release_window()?,
        retry,
        primer_episodio,
    );
    scheduler.run().await
}

async fn verificar_episodio(
    config: &AppConfig,
    salida: &ConsoleOutput,
    episode: Option<u32>,
) -> Result<(), InfrastructureError> {
    let episode = match episode {
        Some(numero) => EpisodeNumber::new(numero)?,
        None => next_episode(&config.output_dir)?,
    };
    let catalog = CatalogClient::new(config.catalog_base_url()?)?;

    match catalog.probe(episode).await? {
        ProbeResult::Published(url) => salida.mostrar_estado_episodio(episode, Some(&url)),
        ProbeResult::NotPublished => salida.mostrar_estado_episodio(episode, None),
    }
    Ok(())
}

fn mostrar_siguiente(
    config: &AppConfig,
    salida: &ConsoleOutput,
    downloader: ExternalDownloader,
) -> Result<(), InfrastructureError> {
    let trigger = crear_trigger(config, downloader)?;
    let episode = next_episode(trigger.output_dir())?;
    salida.mostrar_siguiente_episodio(episode, &trigger.output_path(episode));
    Ok(())
}

async fn descarga_manual(
    salida: &ConsoleOutput,
    downloader: ExternalDownloader,
    manifest_url: &str,
    output_path: &Path,
) -> Result<(), InfrastructureError> {
    let stream = ManifestClient::new()?.resolve(manifest_url).await?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let destino: PathBuf = output_path.to_path_buf();
    downloader
        .download(DownloadRequest::new(stream, destino.clone()))
        .await?;
    salida.mostrar_archivo_guardado(&destino);
    Ok(())
}
