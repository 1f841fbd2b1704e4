use crate::domain::value_objects::{Backoff, ReleaseWindow, Season};
use crate::infrastructure::external::external_downloader::DEFAULT_ARGS;
use crate::infrastructure::external::BrowserSettings;
use crate::infrastructure::InfrastructureError;
use directories::UserDirs;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

const OUTPUT_FOLDER: &str = "epwatch";
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
/// Tope de los intervalos de reintento (un dia).
const MAX_BACKOFF_MINUTES: u64 = 24 * 60;

/// Configuracion del proceso. Se carga una vez y no cambia durante la ejecucion.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub season: String,
    pub catalog_url: String,
    pub output_dir: PathBuf,
    pub extension: String,
    pub release_days: Vec<u8>,
    pub start_time: String,
    pub late_hour: u32,
    pub normal_minutes: u64,
    pub late_minutes: u64,
    pub browser_program: PathBuf,
    pub debug_port: u16,
    pub settle_secs: u64,
    pub headless: bool,
    pub downloader_program: PathBuf,
    pub downloader_args: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let output_root = if let Some(dirs) = UserDirs::new() {
            dirs.video_dir()
                .map(PathBuf::from)
                .unwrap_or_else(|| dirs.home_dir().to_path_buf())
        } else {
            PathBuf::from(".")
        };
        Self {
            season: "01".to_string(),
            catalog_url: String::new(),
            output_dir: output_root.join(OUTPUT_FOLDER),
            extension: "mp4".to_string(),
            release_days: vec![0, 1, 2],
            start_time: "22:50".to_string(),
            late_hour: 23,
            normal_minutes: 5,
            late_minutes: 3,
            browser_program: PathBuf::from("google-chrome"),
            debug_port: 9222,
            settle_secs: 5,
            headless: false,
            downloader_program: PathBuf::from("ffmpeg"),
            downloader_args: DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Carga la configuracion desde `path` o desde `config/default.toml`.
    /// # Notas
    /// - Si el archivo no existe, usa valores por defecto.
    /// # Errors
    /// - `InfrastructureError::Config` si el archivo existe pero no es TOML valido.
    pub fn load(path: Option<&Path>) -> Result<Self, InfrastructureError> {
        let ruta_config = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        match fs::read_to_string(ruta_config) {
            Ok(contenido) => Self::from_toml(&contenido).map_err(|e| match e {
                InfrastructureError::Config(msg) => {
                    InfrastructureError::Config(format!("{}: {}", ruta_config.display(), msg))
                }
                other => other,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound && path.is_none() => Ok(Self::default()),
            Err(err) => Err(InfrastructureError::Config(format!(
                "Cannot read {}: {}",
                ruta_config.display(),
                err
            ))),
        }
    }

    /// Aplica sobre los valores por defecto las claves presentes en `contenido`.
    /// # Errors
    /// - `InfrastructureError::Config` si el TOML no es valido.
    pub fn from_toml(contenido: &str) -> Result<Self, InfrastructureError> {
        let file_config = toml::from_str::<FileConfig>(contenido)
            .map_err(|e| InfrastructureError::Config(e.to_string()))?;
        let mut config = Self::default();

        if let Some(show) = file_config.show {
            if let Some(season) = show.season {
                config.season = season;
            }
            if let Some(catalog_url) = show.catalog_url {
                config.catalog_url = catalog_url;
            }
            if let Some(output_dir) = show.output_dir {
                config.output_dir = expandir_tilde(&output_dir);
            }
            if let Some(extension) = show.extension {
                config.extension = extension.trim_start_matches('.').to_string();
            }
        }
        if let Some(schedule) = file_config.schedule {
            if let Some(release_days) = schedule.release_days {
                config.release_days = release_days;
            }
            if let Some(start_time) = schedule.start_time {
                config.start_time = start_time;
            }
            if let Some(late_hour) = schedule.late_hour {
                config.late_hour = late_hour;
            }
        }
        if let Some(retry) = file_config.retry {
            if let Some(normal_minutes) = retry.normal_minutes {
                config.normal_minutes = normal_minutes;
            }
            if let Some(late_minutes) = retry.late_minutes {
                config.late_minutes = late_minutes;
            }
        }
        if let Some(browser) = file_config.browser {
            if let Some(program) = browser.program {
                config.browser_program = expandir_tilde(&program);
            }
            if let Some(debug_port) = browser.debug_port {
                config.debug_port = debug_port;
            }
            if let Some(settle_secs) = browser.settle_secs {
                config.settle_secs = settle_secs;
            }
            if let Some(headless) = browser.headless {
                config.headless = headless;
            }
        }
        if let Some(downloader) = file_config.downloader {
            if let Some(program) = downloader.program {
                config.downloader_program = expandir_tilde(&program);
            }
            if let Some(args) = downloader.args {
                config.downloader_args = args;
            }
        }

        Ok(config)
    }

    /// Sustituye la raiz de salida (p. ej. desde la CLI).
    pub fn with_output_dir(mut self, output_dir: &str) -> Self {
        self.output_dir = expandir_tilde(output_dir);
        self
    }

    pub fn release_window(&self) -> Result<ReleaseWindow, InfrastructureError> {
        Ok(ReleaseWindow::parse(
            self.release_days.iter().copied(),
            &self.start_time,
        )?)
    }

    pub fn season_label(&self) -> Result<Season, InfrastructureError> {
        Ok(Season::new(self.season.as_str())?)
    }

    /// URL base del catalogo.
    /// # Errors
    /// - `InfrastructureError::Config` si no esta configurada.
    pub fn catalog_base_url(&self) -> Result<&str, InfrastructureError> {
        let url = self.catalog_url.trim();
        if url.is_empty() {
            return Err(InfrastructureError::Config(
                "catalog_url is not set (use [show].catalog_url or --catalog-url)".to_string(),
            ));
        }
        Ok(url)
    }

    pub fn backoff(&self) -> Backoff {
        Backoff {
            normal: Duration::from_secs(self.normal_minutes.saturating_mul(60)),
            late: Duration::from_secs(self.late_minutes.saturating_mul(60)),
            late_hour: self.late_hour,
        }
    }

    /// Parametros del navegador; el perfil aislado vive junto a la salida.
    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            program: self.browser_program.clone(),
            debug_port: self.debug_port,
            settle: Duration::from_secs(self.settle_secs),
            headless: self.headless,
            profile_dir: std::env::temp_dir().join(format!("{}-browser-profile", OUTPUT_FOLDER)),
        }
    }

    /// Valida todos los valores derivados de una vez.
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        self.release_window()?;
        self.season_label()?;
        if self.extension.is_empty() {
            return Err(InfrastructureError::Config(
                "extension cannot be empty".to_string(),
            ));
        }
        for (clave, minutos) in [
            ("normal_minutes", self.normal_minutes),
            ("late_minutes", self.late_minutes),
        ] {
            if !(1..=MAX_BACKOFF_MINUTES).contains(&minutos) {
                return Err(InfrastructureError::Config(format!(
                    "{} out of range (1-{}): {}",
                    clave, MAX_BACKOFF_MINUTES, minutos
                )));
            }
        }
        if self.late_hour > 23 {
            return Err(InfrastructureError::Config(format!(
                "late_hour out of range (0-23): {}",
                self.late_hour
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    show: Option<ShowConfig>,
    schedule: Option<ScheduleConfig>,
    retry: Option<RetryConfig>,
    browser: Option<BrowserConfig>,
    downloader: Option<DownloaderConfig>,
}

#[derive(Debug, Deserialize)]
struct ShowConfig {
    season: Option<String>,
    catalog_url: Option<String>,
    output_dir: Option<String>,
    extension: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleConfig {
    release_days: Option<Vec<u8>>,
    start_time: Option<String>,
    late_hour: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RetryConfig {
    normal_minutes: Option<u64>,
    late_minutes: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BrowserConfig {
    program: Option<String>,
    debug_port: Option<u16>,
    settle_secs: Option<u64>,
    headless: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DownloaderConfig {
    program: Option<String>,
    args: Option<Vec<String>>,
}

pub(crate) fn expandir_tilde(ruta: &str) -> PathBuf {
    let ruta_normalizada = ruta.trim();
    if let Some(resto) = ruta_normalizada.strip_prefix("~/") {
        if let Some(home) = obtener_home_dir() {
            return home.join(resto);
        }
    }
    if let Some(resto) = ruta_normalizada.strip_prefix("~\\") {
        if let Some(home) = obtener_home_dir() {
            return home.join(resto);
        }
    }

    PathBuf::from(ruta_normalizada)
}

fn obtener_home_dir() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}
