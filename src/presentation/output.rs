use crate::domain::value_objects::{EpisodeNumber, ReleaseWindow, WindowState};
use std::path::Path;
use std::time::Duration;

/// Salida del programa: eventos con marca de tiempo via `tracing` y
/// respuestas directas de los subcomandos por stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }

    pub fn mostrar_inicio_vigilancia(&self, episodio: EpisodeNumber, ventana: &ReleaseWindow, salida: &Path) {
        let dias: Vec<String> = ventana.days().map(|d| d.to_string()).collect();
        tracing::info!(
            episode = %episodio,
            days = %dias.join(","),
            start = %ventana.start().format("%H:%M"),
            output = %salida.display(),
            "Vigilando estrenos"
        );
    }

    pub fn mostrar_buscando_episodio(&self, episodio: EpisodeNumber) {
        tracing::info!(episode = %episodio, "Buscando episodio {}", episodio);
    }

    pub fn mostrar_episodio_anticipado(&self, episodio: EpisodeNumber) {
        tracing::info!(
            episode = %episodio,
            "Episodio {} disponible antes de tiempo, se intenta descargar ya",
            episodio
        );
    }

    pub fn advertir_sondeo_anticipado_fallido(&self, episodio: EpisodeNumber, error: &str) {
        tracing::warn!(episode = %episodio, error, "Fallo el sondeo anticipado");
    }

    pub fn mostrar_espera_ventana(&self, estado: WindowState, dia: u8, duracion: Duration) {
        tracing::info!(
            state = %estado,
            day = dia,
            wait = %formatear_duracion(duracion),
            "Fuera de la ventana de estreno, esperando"
        );
    }

    pub fn mostrar_sondeando(&self, episodio: EpisodeNumber, dia: u8, hora: &str) {
        tracing::info!(
            state = %WindowState::Polling,
            episode = %episodio,
            day = dia,
            time = hora,
            "Dentro de la ventana, buscando URL"
        );
    }

    pub fn mostrar_episodio_no_publicado(&self, episodio: EpisodeNumber, espera: Duration) {
        tracing::info!(
            episode = %episodio,
            wait = %formatear_duracion(espera),
            "Episodio {} aun no esta en el servidor, esperando",
            episodio
        );
    }

    pub fn advertir_fallo_sondeo(&self, episodio: EpisodeNumber, error: &str, espera: Duration) {
        tracing::warn!(
            episode = %episodio,
            error,
            wait = %formatear_duracion(espera),
            "No se pudo consultar el catalogo, se reintentara"
        );
    }

    pub fn mostrar_episodio_publicado(&self, episodio: EpisodeNumber, url: &str) {
        tracing::info!(episode = %episodio, url, "Episodio publicado, abriendo navegador");
    }

    pub fn mostrar_stream_resuelto(&self, episodio: EpisodeNumber, url: &str) {
        tracing::info!(episode = %episodio, stream = url, "Stream resuelto");
    }

    pub fn mostrar_descarga_completada(&self, episodio: EpisodeNumber, ruta: &Path) {
        tracing::info!(
            state = %WindowState::Downloaded,
            episode = %episodio,
            path = %ruta.display(),
            "[OK] Episodio descargado"
        );
    }

    pub fn mostrar_espera_entre_ciclos(&self, duracion: Duration, via_rapida: bool) {
        tracing::info!(
            wait = %formatear_duracion(duracion),
            fast_path = via_rapida,
            "Durmiendo hasta el siguiente episodio"
        );
    }

    pub fn advertir_ciclo_fallido(&self, episodio: EpisodeNumber, error: &str, espera: Duration) {
        tracing::warn!(
            episode = %episodio,
            error,
            wait = %formatear_duracion(espera),
            "Ciclo fallido, se repetira"
        );
    }

    pub fn mostrar_cancelacion(&self) {
        tracing::warn!("Cancelacion solicitada, terminando");
    }

    pub fn mostrar_estado_episodio(&self, episodio: EpisodeNumber, url: Option<&str>) {
        match url {
            Some(url) => println!("[OK] Episodio {} publicado: {}", episodio, url),
            None => println!("[PENDIENTE] Episodio {} aun no publicado", episodio),
        }
    }

    pub fn mostrar_siguiente_episodio(&self, episodio: EpisodeNumber, ruta: &Path) {
        println!("Siguiente episodio: {}", episodio);
        println!("Archivo: {}", ruta.display());
    }

    pub fn mostrar_archivo_guardado(&self, ruta: &Path) {
        println!("[OK] Archivo guardado: {}", ruta.display());
    }
}

/// `22h`, `12m`, `45s`...
pub fn formatear_duracion(duracion: Duration) -> String {
    let segundos = duracion.as_secs();
    if segundos >= 3600 && segundos % 3600 == 0 {
        format!("{}h", segundos / 3600)
    } else if segundos >= 60 && segundos % 60 == 0 {
        format!("{}m", segundos / 60)
    } else {
        format!("{}s", segundos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations() {
        assert_eq!(formatear_duracion(Duration::from_secs(22 * 3600)), "22h");
        assert_eq!(formatear_duracion(Duration::from_secs(720)), "12m");
        assert_eq!(formatear_duracion(Duration::from_secs(60)), "1m");
        assert_eq!(formatear_duracion(Duration::from_secs(5)), "5s");
    }
}
