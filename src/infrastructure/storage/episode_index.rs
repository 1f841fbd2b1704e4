use crate::domain::value_objects::EpisodeNumber;
use crate::infrastructure::InfrastructureError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Numero de episodio de un archivo `S{temporada}E{episodio}.{ext}`.
///
/// Toma lo que hay entre la primera `E` y el primer `.`; sin `E`, el nombre
/// completo hasta el punto.
pub fn parse_episode_from_file_name(file_name: &str) -> Option<u32> {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let digits = stem.split_once('E').map_or(stem, |(_, resto)| resto);
    digits.parse::<u32>().ok()
}

/// Mayor episodio presente en `dir`, o 0 si no hay ninguno.
/// # Errors
/// - `InfrastructureError::Io` si el directorio existe pero no se puede leer.
pub fn latest_episode(dir: &Path) -> Result<u32, InfrastructureError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err.into()),
    };

    let mut max_val = 0;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        match parse_episode_from_file_name(&file_name) {
            Some(numero) => max_val = max_val.max(numero),
            None => tracing::debug!(file = %file_name, "Skipping file without episode number"),
        }
    }
    Ok(max_val)
}

/// Siguiente episodio a buscar: el mayor ya descargado + 1.
pub fn next_episode(dir: &Path) -> Result<EpisodeNumber, InfrastructureError> {
    Ok(EpisodeNumber::after(latest_episode(dir)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_episode_numbers() {
        assert_eq!(parse_episode_from_file_name("S01E1.mp4"), Some(1));
        assert_eq!(parse_episode_from_file_name("S01E12.part.mp4"), Some(12));
        assert_eq!(parse_episode_from_file_name("S01Ebad.mp4"), None);
        assert_eq!(parse_episode_from_file_name("notes.txt"), None);
        assert_eq!(parse_episode_from_file_name("42"), Some(42));
    }

    #[test]
    fn latest_ignores_unparsable_entries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["S01E1.mp4", "S01E3.mp4", "S01Ebad.mp4"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        assert_eq!(latest_episode(dir.path()).unwrap(), 3);
        assert_eq!(next_episode(dir.path()).unwrap().value(), 4);
    }

    #[test]
    fn missing_directory_starts_at_one() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-yet");
        assert_eq!(latest_episode(&missing).unwrap(), 0);
        assert_eq!(next_episode(&missing).unwrap().value(), 1);
    }
}
