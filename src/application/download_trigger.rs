use crate::domain::repositories::Downloader;
use crate::domain::value_objects::{DownloadRequest, EpisodeNumber, Season, StreamUrl};
use crate::infrastructure::InfrastructureError;
use std::path::{Path, PathBuf};

/// Compone la ruta de salida de cada episodio y lanza el descargador.
pub struct DownloadTrigger<D> {
    downloader: D,
    output_dir: PathBuf,
    season: Season,
    extension: String,
}

impl<D> DownloadTrigger<D>
where
    D: Downloader<Error = InfrastructureError>,
{
    pub fn new(downloader: D, output_dir: impl Into<PathBuf>, season: Season, extension: &str) -> Self {
        Self {
            downloader,
            output_dir: output_dir.into(),
            season,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `{output_dir}/S{temporada}E{episodio}.{ext}`
    pub fn output_path(&self, episode: EpisodeNumber) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            self.season.episode_key(episode),
            self.extension
        ))
    }

    /// Crea el directorio de salida y descarga el stream. Sin reintentos.
    /// # Returns
    /// - Ruta del archivo descargado.
    /// # Errors
    /// - `InfrastructureError::Io` si no se puede crear el directorio.
    /// - El error del descargador tal cual.
    pub async fn trigger(
        &self,
        stream: &StreamUrl,
        episode: EpisodeNumber,
    ) -> Result<PathBuf, InfrastructureError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let destination = self.output_path(episode);
        self.downloader
            .download(DownloadRequest::new(stream.clone(), destination.clone()))
            .await?;
        Ok(destination)
    }
}
