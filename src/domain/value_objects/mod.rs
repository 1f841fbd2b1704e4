pub mod download_request;
pub mod episode_number;
pub mod probe_result;
pub mod release_window;
pub mod season;
pub mod stream_url;

pub use download_request::DownloadRequest;
pub use episode_number::EpisodeNumber;
pub use probe_result::ProbeResult;
pub use release_window::{post_download_sleep, Backoff, ReleaseWindow, WindowDecision, WindowState};
pub use season::Season;
pub use stream_url::StreamUrl;
