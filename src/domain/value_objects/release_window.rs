use crate::domain::errors::DomainError;
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(3600);

/// Espera cuando el dia actual no es de estreno.
pub const OUTSIDE_WINDOW_SLEEP: Duration = Duration::from_secs(22 * 3600);
/// Espera fina cerca de la hora de inicio.
pub const BEFORE_START_SLEEP: Duration = Duration::from_secs(60);
/// Espera tras una descarga por la via rapida (0.2 h).
pub const FAST_PATH_SLEEP: Duration = Duration::from_secs(720);

/// Estados del planificador por ciclo de episodio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    IdleOutsideWindow,
    IdleBeforeDailyStart,
    Polling,
    Downloaded,
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IdleOutsideWindow => "idle-outside-window",
            Self::IdleBeforeDailyStart => "idle-before-daily-start",
            Self::Polling => "polling",
            Self::Downloaded => "downloaded",
        };
        f.write_str(name)
    }
}

/// Siguiente accion que decide la ventana de estreno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    Sleep { state: WindowState, duration: Duration },
    Poll,
}

/// Dias de la semana (0 = domingo .. 6 = sabado) y hora diaria de estreno.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseWindow {
    days: BTreeSet<u8>,
    start: NaiveTime,
}

impl ReleaseWindow {
    /// Crea una ventana de estreno.
    /// # Arguments
    /// - `days`: dias de estreno, 0 = domingo.
    /// - `start`: hora del dia a partir de la cual se sondea.
    /// # Errors
    /// - `DomainError::InvalidReleaseWindow` si no hay dias o alguno es mayor que 6.
    pub fn new(days: impl IntoIterator<Item = u8>, start: NaiveTime) -> Result<Self, DomainError> {
        let days: BTreeSet<u8> = days.into_iter().collect();
        if days.is_empty() {
            return Err(DomainError::InvalidReleaseWindow(
                "At least one release day is required".to_string(),
            ));
        }
        if let Some(day) = days.iter().find(|d| **d > 6) {
            return Err(DomainError::InvalidReleaseWindow(format!(
                "Release day out of range (0-6): {}",
                day
            )));
        }
        Ok(Self { days, start })
    }

    /// Igual que `new` pero interpretando la hora como `HH:MM`.
    pub fn parse(days: impl IntoIterator<Item = u8>, start: &str) -> Result<Self, DomainError> {
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").map_err(|e| {
            DomainError::InvalidReleaseWindow(format!("Invalid start time {:?}: {}", start, e))
        })?;
        Self::new(days, start)
    }

    pub fn contains_day(&self, weekday: Weekday) -> bool {
        self.days.contains(&day_index(weekday))
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.days.iter().copied()
    }

    /// Decide si sondear ya o cuanto esperar antes de reevaluar.
    ///
    /// Con la via rapida activa la ventana no se aplica.
    pub fn evaluate(&self, now: NaiveDateTime, fast_path: bool) -> WindowDecision {
        if fast_path {
            return WindowDecision::Poll;
        }
        if !self.contains_day(now.weekday()) {
            return WindowDecision::Sleep {
                state: WindowState::IdleOutsideWindow,
                duration: OUTSIDE_WINDOW_SLEEP,
            };
        }
        if now.time() < self.start {
            return WindowDecision::Sleep {
                state: WindowState::IdleBeforeDailyStart,
                duration: BEFORE_START_SLEEP,
            };
        }
        WindowDecision::Poll
    }
}

/// Espera tras una descarga: 0.2 h con via rapida, 23 h en fin de semana,
/// 115 h el lunes y 24 h el resto.
pub fn post_download_sleep(weekday: Weekday, fast_path: bool) -> Duration {
    if fast_path {
        return FAST_PATH_SLEEP;
    }
    match weekday {
        Weekday::Sat | Weekday::Sun => HOUR * 23,
        Weekday::Mon => HOUR * 115,
        _ => HOUR * 24,
    }
}

/// Intervalo entre reintentos: normal, o mas corto durante la hora nocturna.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub normal: Duration,
    pub late: Duration,
    pub late_hour: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            normal: Duration::from_secs(5 * 60),
            late: Duration::from_secs(3 * 60),
            late_hour: 23,
        }
    }
}

impl Backoff {
    pub fn interval_at(&self, now: NaiveDateTime) -> Duration {
        if now.hour() == self.late_hour {
            self.late
        } else {
            self.normal
        }
    }
}

/// Indice del dia con domingo = 0.
pub fn day_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}
