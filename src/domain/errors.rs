use thiserror::Error;

/// Errores del dominio.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid stream URL: {0}")]
    InvalidStreamUrl(String),

    #[error("Invalid episode number: {0}")]
    InvalidEpisodeNumber(String),

    #[error("Invalid season: {0}")]
    InvalidSeason(String),

    #[error("Invalid release window: {0}")]
    InvalidReleaseWindow(String),
}
