use crate::domain::repositories::Downloader;
use crate::domain::value_objects::DownloadRequest;
use crate::infrastructure::retry::cancelled;
use crate::infrastructure::InfrastructureError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

/// Argumentos por defecto para ffmpeg: copia el stream HLS sin recodificar.
pub const DEFAULT_ARGS: &[&str] = &[
    "-nostdin",
    "-hide_banner",
    "-loglevel",
    "error",
    "-i",
    "{source}",
    "-c",
    "copy",
    "-y",
    "{output}",
];

/// Descargador externo invocado con el origen y la ruta de destino.
#[derive(Clone)]
pub struct ExternalDownloader {
    program: PathBuf,
    args: Vec<String>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl ExternalDownloader {
    /// Crea un descargador que ejecuta `program` con la plantilla `args`.
    /// # Arguments
    /// - `args`: admite los marcadores `{source}` y `{output}`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cancel_rx: None,
        }
    }

    /// Configura un receptor de cancelacion global.
    pub fn with_cancel_receiver(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argumentos finales con los marcadores sustituidos.
    pub fn build_args(&self, request: &DownloadRequest) -> Vec<String> {
        let output = request.destination.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{source}", request.source.as_str())
                    .replace("{output}", &output)
            })
            .collect()
    }
}

#[async_trait]
impl Downloader for ExternalDownloader {
    type Error = InfrastructureError;

    async fn download(&self, request: DownloadRequest) -> Result<(), InfrastructureError> {
        tracing::info!(
            source = %request.source,
            output = %request.destination.display(),
            "Starting download"
        );

        let mut cancel_rx = self.cancel_rx.clone();
        if cancel_rx.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Err(InfrastructureError::Cancelled);
        }

        let mut command = tokio::process::Command::new(&self.program);
        command.kill_on_drop(true).args(self.build_args(&request));
        let mut child = command.spawn().map_err(|e| {
            InfrastructureError::DownloadFailed(format!(
                "Failed to start {}: {}",
                self.program.display(),
                e
            ))
        })?;
        tracing::info!(pid = ?child.id(), "Downloader process started");

        let status = match cancel_rx.as_mut() {
            Some(cancel_rx) => {
                tokio::select! {
                    status = child.wait() => status,
                    _ = cancelled(cancel_rx) => {
                        tracing::warn!("Cancellation requested, stopping downloader");
                        let _ = child.kill().await;
                        descartar_parcial(&request.destination).await;
                        return Err(InfrastructureError::Cancelled);
                    }
                }
            }
            None => child.wait().await,
        };

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                descartar_parcial(&request.destination).await;
                return Err(InfrastructureError::DownloadFailed(format!(
                    "Failed to wait for downloader: {}",
                    e
                )));
            }
        };

        if !status.success() {
            descartar_parcial(&request.destination).await;
            return Err(InfrastructureError::DownloadFailed(format!(
                "{} exited with status: {}",
                self.program.display(),
                status
            )));
        }

        match tokio::fs::metadata(&request.destination).await {
            Ok(metadata) => tracing::info!(
                output = %request.destination.display(),
                size_mb = %format!("{:.2}", metadata.len() as f64 / BYTES_PER_MEGABYTE),
                "Download completed"
            ),
            Err(_) => tracing::warn!(
                output = %request.destination.display(),
                "Downloader finished but output file is missing"
            ),
        }
        Ok(())
    }
}

/// Borra la salida de una descarga interrumpida para que el indice de
/// episodios no la cuente como completa.
async fn descartar_parcial(ruta: &Path) {
    match tokio::fs::remove_file(ruta).await {
        Ok(()) => tracing::info!(output = %ruta.display(), "Partial output removed"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => tracing::warn!(
            output = %ruta.display(),
            error = %err,
            "Cannot remove partial output"
        ),
    }
}
