use crate::domain::repositories::StreamResolver;
use crate::domain::value_objects::StreamUrl;
use crate::infrastructure::external::manifest::ManifestClient;
use crate::infrastructure::retry::RetryPolicy;
use crate::infrastructure::InfrastructureError;
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Child;
use tokio::task::JoinHandle;

const ATTACH_ATTEMPTS: usize = 20;
const ATTACH_DELAY_MS: u64 = 500;

/// Parametros del navegador controlado por el puerto de depuracion remota.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub program: PathBuf,
    pub debug_port: u16,
    /// Espera fija tras abrir la pagina. No hay senal de DOM listo, asi que
    /// es una fuente conocida de latencia e inestabilidad.
    pub settle: Duration,
    pub headless: bool,
    pub profile_dir: PathBuf,
}

impl BrowserSettings {
    fn debug_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}

/// Pagina que puede exponer un elemento de video.
#[async_trait]
pub trait MediaPage: Send + Sync {
    /// `src` del primer hijo del elemento `video`, si existe.
    async fn media_source(&self) -> Result<Option<String>, InfrastructureError>;

    async fn reload(&self) -> Result<(), InfrastructureError>;
}

/// Resuelve streams abriendo la pagina del episodio en un navegador.
#[derive(Clone)]
pub struct BrowserResolver {
    settings: BrowserSettings,
    manifests: ManifestClient,
    retry: RetryPolicy,
}

impl BrowserResolver {
    pub fn new(settings: BrowserSettings, manifests: ManifestClient, retry: RetryPolicy) -> Self {
        Self {
            settings,
            manifests,
            retry,
        }
    }

    async fn obtener_url_manifiesto(
        &self,
        session: &mut BrowserSession,
        detail_url: &str,
    ) -> Result<String, InfrastructureError> {
        let page = session.open(detail_url).await?;
        self.retry.wait(self.settings.settle).await?;
        wait_for_media_source(&ChromePage { page }, &self.retry).await
    }
}

#[async_trait]
impl StreamResolver for BrowserResolver {
    type Error = InfrastructureError;

    async fn resolve(&self, detail_url: &str) -> Result<StreamUrl, InfrastructureError> {
        let mut session = BrowserSession::start(&self.settings).await?;
        let resultado = self.obtener_url_manifiesto(&mut session, detail_url).await;
        session.shutdown().await;

        let manifest_url = resultado?;
        tracing::info!(manifest = %manifest_url, "Media source found, reading manifest");
        self.manifests.resolve(&manifest_url).await
    }
}

/// Busca la fuente de video hasta encontrarla, recargando la pagina entre intentos.
///
/// No hay limite de intentos mientras la pagina responda: solo termina con la
/// fuente, con la cancelacion de `retry` o con un fallo del navegador.
/// # Errors
/// - `InfrastructureError::Cancelled` si se cancela en una espera.
/// - `InfrastructureError::Browser` si la sesion deja de responder.
pub async fn wait_for_media_source<P>(page: &P, retry: &RetryPolicy) -> Result<String, InfrastructureError>
where
    P: MediaPage + ?Sized,
{
    loop {
        retry.check_cancelled()?;

        match page.media_source().await? {
            Some(src) if !src.trim().is_empty() => return Ok(src.trim().to_string()),
            _ => tracing::info!("Episode is on server, but no video source yet"),
        }

        let espera = retry.backoff_interval();
        tracing::info!(
            minutes = espera.as_secs() / 60,
            "Cannot find video source, waiting before reload"
        );
        retry.wait(espera).await?;

        page.reload().await?;
    }
}

struct ChromePage {
    page: Page,
}

#[async_trait]
impl MediaPage for ChromePage {
    async fn media_source(&self) -> Result<Option<String>, InfrastructureError> {
        let video = match self.page.find_element("video").await {
            Ok(video) => video,
            Err(err) if nodo_ausente(&err) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let source = match video.find_element("*").await {
            Ok(source) => source,
            Err(err) if nodo_ausente(&err) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(source.attribute("src").await?)
    }

    async fn reload(&self) -> Result<(), InfrastructureError> {
        self.page.reload().await?;
        Ok(())
    }
}

/// El navegador respondio pero el selector no encontro nodo. El resto de
/// errores (websocket, canal del handler, timeouts) indican una sesion muerta.
fn nodo_ausente(err: &CdpError) -> bool {
    matches!(err, CdpError::NotFound | CdpError::Chrome(_))
}

/// Sesion de navegador de una resolucion. Se cierra siempre antes de devolver.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    child: Option<Child>,
    pages: Vec<Page>,
}

impl BrowserSession {
    /// Se adjunta a un navegador ya escuchando en el puerto o lanza uno nuevo.
    async fn start(settings: &BrowserSettings) -> Result<Self, InfrastructureError> {
        if let Ok((browser, handler)) = Browser::connect(settings.debug_url()).await {
            tracing::info!(port = settings.debug_port, "Attached to running browser");
            return Ok(Self::with_handler(browser, handler, None));
        }

        let mut child = lanzar_navegador(settings)?;
        tracing::info!(
            program = %settings.program.display(),
            pid = ?child.id(),
            port = settings.debug_port,
            "Browser process started"
        );

        let mut ultimo_error = String::new();
        for _ in 0..ATTACH_ATTEMPTS {
            tokio::time::sleep(Duration::from_millis(ATTACH_DELAY_MS)).await;
            match Browser::connect(settings.debug_url()).await {
                Ok((browser, handler)) => {
                    return Ok(Self::with_handler(browser, handler, Some(child)));
                }
                Err(err) => ultimo_error = err.to_string(),
            }
        }

        let _ = child.kill().await;
        Err(InfrastructureError::Browser(format!(
            "Cannot attach to {}: {}",
            settings.debug_url(),
            ultimo_error
        )))
    }

    fn with_handler(browser: Browser, mut handler: chromiumoxide::Handler, child: Option<Child>) -> Self {
        let handler = tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });
        Self {
            browser,
            handler,
            child,
            pages: Vec::new(),
        }
    }

    async fn open(&mut self, url: &str) -> Result<Page, InfrastructureError> {
        let page = self.browser.new_page("about:blank").await?;
        self.pages.push(page.clone());
        page.goto(url).await?;
        Ok(page)
    }

    /// Cierra las paginas abiertas y, si el proceso es propio, el navegador.
    async fn shutdown(mut self) {
        match self.child.take() {
            Some(mut child) => {
                if let Err(err) = self.browser.close().await {
                    tracing::debug!(error = %err, "Browser close command failed");
                }
                self.handler.abort();
                if let Err(err) = child.kill().await {
                    tracing::debug!(error = %err, "Browser process already exited");
                }
            }
            None => {
                for page in self.pages.drain(..) {
                    if let Err(err) = page.close().await {
                        tracing::debug!(error = %err, "Page close failed");
                    }
                }
                self.handler.abort();
            }
        }
        tracing::info!("Browser session closed");
    }
}

fn lanzar_navegador(settings: &BrowserSettings) -> Result<Child, InfrastructureError> {
    let mut command = tokio::process::Command::new(&settings.program);
    command
        .kill_on_drop(true)
        .arg(format!("--remote-debugging-port={}", settings.debug_port))
        .arg(format!("--user-data-dir={}", settings.profile_dir.display()))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if settings.headless {
        command.arg("--headless=new");
    }
    command.spawn().map_err(|e| {
        InfrastructureError::Browser(format!(
            "Failed to start {}: {}",
            settings.program.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::Clock;
    use crate::domain::value_objects::Backoff;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::watch;

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    /// Pagina que expone la fuente tras `missing` intentos fallidos.
    struct FakePage {
        missing: usize,
        crashed: bool,
        reload_fails: bool,
        lookups: AtomicUsize,
        reloads: AtomicUsize,
    }

    impl FakePage {
        fn new(missing: usize) -> Self {
            Self {
                missing,
                crashed: false,
                reload_fails: false,
                lookups: AtomicUsize::new(0),
                reloads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaPage for FakePage {
        async fn media_source(&self) -> Result<Option<String>, InfrastructureError> {
            let intento = self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.crashed {
                return Err(InfrastructureError::Browser("connection closed".to_string()));
            }
            if intento < self.missing {
                return Ok(None);
            }
            Ok(Some(" https://cdn.example.com/master.m3u8 ".to_string()))
        }

        async fn reload(&self) -> Result<(), InfrastructureError> {
            self.reloads.fetch_add(1, Ordering::SeqCst);
            if self.reload_fails {
                return Err(InfrastructureError::Browser("target crashed".to_string()));
            }
            Ok(())
        }
    }

    fn retry(hour: u32) -> (watch::Sender<bool>, RetryPolicy) {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap();
        let (tx, rx) = watch::channel(false);
        (tx, RetryPolicy::new(Backoff::default(), Arc::new(FixedClock(now)), rx))
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_reload_until_source_appears() {
        let (_tx, retry) = retry(21);
        let page = FakePage::new(2);
        let start = tokio::time::Instant::now();

        let src = wait_for_media_source(&page, &retry).await.unwrap();

        assert_eq!(src, "https://cdn.example.com/master.m3u8");
        assert_eq!(page.reloads.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() >= Duration::from_secs(2 * 5 * 60));
    }

    #[tokio::test(start_paused = true)]
    async fn late_hour_uses_shorter_backoff() {
        let (_tx, retry) = retry(23);
        let page = FakePage::new(1);
        let start = tokio::time::Instant::now();

        wait_for_media_source(&page, &retry).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3 * 60));
        assert!(elapsed < Duration::from_secs(5 * 60));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_unbounded_loop() {
        let (tx, retry) = retry(21);
        let page = Arc::new(FakePage::new(usize::MAX));
        let tarea = tokio::spawn({
            let page = Arc::clone(&page);
            let retry = retry.clone();
            async move { wait_for_media_source(page.as_ref(), &retry).await }
        });

        tokio::time::sleep(Duration::from_secs(3600)).await;
        tx.send(true).unwrap();

        let result = tarea.await.unwrap();
        assert!(matches!(result, Err(InfrastructureError::Cancelled)));
        assert!(page.lookups.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dead_session_ends_the_loop_without_waiting() {
        let (_tx, retry) = retry(21);
        let mut page = FakePage::new(0);
        page.crashed = true;
        let start = tokio::time::Instant::now();

        let result = wait_for_media_source(&page, &retry).await;

        assert!(matches!(result, Err(InfrastructureError::Browser(_))));
        assert!(result.unwrap_err().is_transient());
        assert_eq!(page.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reload_is_reported() {
        let (_tx, retry) = retry(21);
        let mut page = FakePage::new(usize::MAX);
        page.reload_fails = true;

        let result = wait_for_media_source(&page, &retry).await;

        assert!(matches!(result, Err(InfrastructureError::Browser(_))));
        assert_eq!(page.reloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn only_missing_nodes_count_as_absent() {
        assert!(nodo_ausente(&CdpError::NotFound));
        assert!(!nodo_ausente(&CdpError::NoResponse));
        assert!(!nodo_ausente(&CdpError::Timeout));
    }
}
