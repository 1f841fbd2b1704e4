use epwatch::domain::repositories::EpisodeCatalog;
use epwatch::domain::value_objects::{EpisodeNumber, ProbeResult};
use epwatch::infrastructure::{CatalogClient, InfrastructureError, ManifestClient};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const CATALOG_PAGE: &str = r#"<ul>
<li><a href="/my-show-season-2-vostfr-4/watch/d4">4</a> my-show-season-2-vostfr-4/watch/d4 </li>
<li><a href="/my-show-season-2-vostfr-5/watch/e5">5</a> my-show-season-2-vostfr-5/watch/e5 </li>
</ul>"#;

const MASTER_PLAYLIST: &str = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=800000
http://plain.example.com/low.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2400000
https://cdn.example.com/high.m3u8
https://cdn.example.com/other.m3u8
";

struct StubServer {
    base_url: String,
    shutdown_tx: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl StubServer {
    fn stop(self) {
        let _ = self.shutdown_tx.send(());
        self.handle.join().unwrap();
    }
}

fn spawn_stub_server() -> StubServer {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        let request = match server.recv_timeout(Duration::from_millis(50)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(_) => break,
        };

        let (status, body) = match request.url() {
            "/my-show-season-2" => (200, CATALOG_PAGE),
            "/master.m3u8" => (200, MASTER_PLAYLIST),
            "/plain.m3u8" => (200, "#EXTM3U\nhttp://plain.example.com/low.m3u8\n"),
            _ => (500, "boom"),
        };
        let _ = request.respond(tiny_http::Response::from_string(body).with_status_code(status));
    });

    StubServer {
        base_url,
        shutdown_tx,
        handle,
    }
}

fn ep(n: u32) -> EpisodeNumber {
    EpisodeNumber::new(n).unwrap()
}

#[tokio::test]
async fn probe_finds_published_episode() {
    let server = spawn_stub_server();
    let base = format!("{}/my-show-season-2", server.base_url);
    let catalog = CatalogClient::new(format!("{base}/")).unwrap();

    let result = catalog.probe(ep(5)).await.unwrap();

    assert_eq!(
        result,
        ProbeResult::Published(format!("{base}-vostfr-5/watch/e5"))
    );
    server.stop();
}

#[tokio::test]
async fn probe_reports_missing_episode() {
    let server = spawn_stub_server();
    let catalog = CatalogClient::new(format!("{}/my-show-season-2", server.base_url)).unwrap();

    let result = catalog.probe(ep(6)).await.unwrap();

    assert_eq!(result, ProbeResult::NotPublished);
    server.stop();
}

#[tokio::test]
async fn probe_surfaces_http_errors() {
    let server = spawn_stub_server();
    let catalog = CatalogClient::new(format!("{}/gone", server.base_url)).unwrap();

    let err = catalog.probe(ep(1)).await.unwrap_err();

    assert!(matches!(err, InfrastructureError::ExternalService(_)));
    assert!(err.is_transient());
    server.stop();
}

#[tokio::test]
async fn manifest_resolves_first_secure_entry() {
    let server = spawn_stub_server();
    let manifests = ManifestClient::new().unwrap();

    let stream = manifests
        .resolve(&format!("{}/master.m3u8", server.base_url))
        .await
        .unwrap();

    assert_eq!(stream.as_str(), "https://cdn.example.com/high.m3u8");
    server.stop();
}

#[tokio::test]
async fn manifest_without_secure_entry_is_malformed() {
    let server = spawn_stub_server();
    let manifests = ManifestClient::new().unwrap();

    let err = manifests
        .resolve(&format!("{}/plain.m3u8", server.base_url))
        .await
        .unwrap_err();

    match err {
        InfrastructureError::ManifestMalformed { content } => {
            assert!(content.contains("http://plain.example.com/low.m3u8"));
        }
        other => panic!("Se esperaba ManifestMalformed, obtenido {other:?}"),
    }
    server.stop();
}
