pub mod clock;
pub mod downloader;
pub mod episode_catalog;
pub mod stream_resolver;

pub use clock::Clock;
pub use downloader::Downloader;
pub use episode_catalog::EpisodeCatalog;
pub use stream_resolver::StreamResolver;
