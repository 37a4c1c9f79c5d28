// Downloader module - orchestration over yt-dlp, ffmpeg and HTTP

pub mod display;
pub mod errors;
pub mod events;
pub mod models;
pub mod orchestrator;
pub mod provider;
pub mod selector;
pub mod transcode;
pub mod utils;

pub use errors::DownloadError;
pub use events::{DownloadEvents, NoopEvents};
pub use models::{DownloaderConfig, PlaylistSummary, VideoSummary};
pub use orchestrator::Downloader;
pub use provider::{MetadataProvider, StreamFormat, YtDlpProvider};
pub use transcode::Transcoder;
