use crate::domain::errors::DomainError;
use std::fmt;

/// Numero de episodio, positivo y creciente a lo largo de la serie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpisodeNumber(u32);

impl EpisodeNumber {
    /// Crea un numero de episodio valido.
    /// # Errors
    /// - `DomainError::InvalidEpisodeNumber` si el valor es 0.
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidEpisodeNumber(
                "Episode number must be positive".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Episodio que sigue al ultimo descargado (`0` si no hay ninguno).
    pub fn after(latest: u32) -> Self {
        Self(latest.saturating_add(1).max(1))
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<&str> for EpisodeNumber {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parsed = value
            .trim()
            .parse::<u32>()
            .map_err(|e| DomainError::InvalidEpisodeNumber(format!("{}: {}", value, e)))?;
        Self::new(parsed)
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
