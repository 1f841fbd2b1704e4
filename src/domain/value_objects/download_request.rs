use crate::domain::value_objects::StreamUrl;
use std::path::PathBuf;

/// Peticion tipada para el descargador externo: origen y destino.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source: StreamUrl,
    pub destination: PathBuf,
}

impl DownloadRequest {
    pub fn new(source: StreamUrl, destination: impl Into<PathBuf>) -> Self {
        Self {
            source,
            destination: destination.into(),
        }
    }
}
