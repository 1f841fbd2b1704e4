use crate::domain::errors::DomainError;
use crate::domain::value_objects::EpisodeNumber;
use std::fmt;

/// Etiqueta de temporada (opaca, p. ej. `01`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Season(String);

impl Season {
    /// Crea una etiqueta de temporada valida.
    /// # Arguments
    /// - `label`: etiqueta cruda.
    /// # Errors
    /// - `DomainError::InvalidSeason` si esta vacia o no sirve como nombre de archivo.
    pub fn new(label: impl Into<String>) -> Result<Self, DomainError> {
        let label = label.into().trim().to_string();

        if label.is_empty() {
            return Err(DomainError::InvalidSeason(
                "Season cannot be empty".to_string(),
            ));
        }

        if label
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '.' | 'E'))
        {
            return Err(DomainError::InvalidSeason(format!(
                "Season contains invalid characters: {}",
                label
            )));
        }

        Ok(Self(label))
    }

    /// Clave de salida del episodio: `S{temporada}E{episodio}`.
    pub fn episode_key(&self, episode: EpisodeNumber) -> String {
        format!("S{}E{}", self.0, episode)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Season {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_key() {
        let season = Season::new("01").unwrap();
        let episode = EpisodeNumber::new(7).unwrap();
        assert_eq!(season.episode_key(episode), "S01E7");
    }

    #[test]
    fn test_invalid_labels() {
        for label in ["", "  ", "0/1", "a b", "1.5", "E1"] {
            assert!(Season::new(label).is_err(), "Expected {:?} to fail", label);
        }
    }
}
