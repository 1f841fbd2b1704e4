use chrono::NaiveDateTime;

/// Fuente de la hora local.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
