pub mod downloader;

pub use downloader::{
    DownloadError, DownloadEvents, Downloader, DownloaderConfig, MetadataProvider, NoopEvents,
    PlaylistSummary, VideoSummary,
};
