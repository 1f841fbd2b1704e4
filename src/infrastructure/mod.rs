pub mod clock;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod retry;
pub mod storage;

pub use clock::SystemClock;
pub use config::AppConfig;
pub use errors::InfrastructureError;
pub use external::{BrowserResolver, CatalogClient, ExternalDownloader, ManifestClient};
pub use retry::RetryPolicy;
