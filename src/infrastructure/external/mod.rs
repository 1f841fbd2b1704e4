pub mod browser_resolver;
pub mod catalog_client;
pub mod external_downloader;
pub mod manifest;

pub use browser_resolver::{BrowserResolver, BrowserSettings, MediaPage};
pub use catalog_client::CatalogClient;
pub use external_downloader::ExternalDownloader;
pub use manifest::ManifestClient;
