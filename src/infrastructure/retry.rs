use crate::domain::repositories::Clock;
use crate::domain::value_objects::Backoff;
use crate::infrastructure::InfrastructureError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Politica de reintentos con senal de cancelacion.
///
/// Toda espera larga del programa pasa por aqui, de modo que un Ctrl+C
/// corta el sueno en curso y el llamador recibe `InfrastructureError::Cancelled`.
#[derive(Clone)]
pub struct RetryPolicy {
    backoff: Backoff,
    clock: Arc<dyn Clock>,
    cancel_rx: watch::Receiver<bool>,
}

impl RetryPolicy {
    pub fn new(backoff: Backoff, clock: Arc<dyn Clock>, cancel_rx: watch::Receiver<bool>) -> Self {
        Self {
            backoff,
            clock,
            cancel_rx,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn cancel_receiver(&self) -> watch::Receiver<bool> {
        self.cancel_rx.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }

    /// # Errors
    /// - `InfrastructureError::Cancelled` si ya se pidio la cancelacion.
    pub fn check_cancelled(&self) -> Result<(), InfrastructureError> {
        if self.is_cancelled() {
            return Err(InfrastructureError::Cancelled);
        }
        Ok(())
    }

    /// Intervalo de reintento para la hora actual.
    pub fn backoff_interval(&self) -> Duration {
        self.backoff.interval_at(self.clock.now())
    }

    /// Duerme `duration` salvo que llegue la cancelacion antes.
    /// # Errors
    /// - `InfrastructureError::Cancelled` si se cancela antes o durante la espera.
    pub async fn wait(&self, duration: Duration) -> Result<(), InfrastructureError> {
        self.check_cancelled()?;
        let mut cancel_rx = self.cancel_rx.clone();
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = cancelled(&mut cancel_rx) => Err(InfrastructureError::Cancelled),
        }
    }
}

/// Se completa cuando la senal pasa a `true`. Si el emisor desaparece sin
/// cancelar, no se completa nunca.
pub async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    if cancel_rx.wait_for(|cancel| *cancel).await.is_err() {
        std::future::pending::<()>().await;
    }
}
