use crate::domain::repositories::Clock;
use chrono::NaiveDateTime;

/// Reloj del sistema en hora local.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
