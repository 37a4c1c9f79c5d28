// MetadataProvider trait and common types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::Date;

use crate::downloader::errors::DownloadError;
use crate::downloader::events::DownloadEvents;

/// A single downloadable stream exposed by the provider.
///
/// Adaptive streams carry exactly one track: `audio_only` streams have a
/// codec but no video, `video_only` streams the reverse. Progressive
/// streams (both flags false, both codecs set) are never selected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamFormat {
    /// Provider format ID (e.g. "137", "140")
    pub format_id: String,
    /// File extension (mp4, webm, m4a)
    pub ext: String,
    /// Video width in pixels
    pub width: Option<u32>,
    /// Video height in pixels
    pub height: Option<u32>,
    /// Average audio bitrate in kbps
    pub abr: Option<f32>,
    /// Video codec (avc1, vp9, av01, none)
    pub vcodec: Option<String>,
    /// Audio codec (mp4a, opus, none)
    pub acodec: Option<String>,
    /// File size in bytes, when the provider knows it
    pub filesize: Option<u64>,
    /// Audio track only, no video
    pub audio_only: bool,
    /// Video track only, no audio
    pub video_only: bool,
}

/// Raw single-video metadata from the provider, before display formatting.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    pub uploader: String,
    pub channel_url: String,
    pub thumbnail_url: String,
    pub view_count: u64,
    pub upload_date: Option<Date>,
    pub formats: Vec<StreamFormat>,
}

/// Raw playlist-level metadata. Member videos are listed by URL only;
/// per-video details come from separate `video_metadata` calls.
#[derive(Debug, Clone)]
pub struct PlaylistMetadata {
    pub title: String,
    pub uploader: String,
    pub view_count: u64,
    pub modified_date: Option<Date>,
    pub entry_urls: Vec<String>,
}

/// Seam over the external metadata/stream extraction tool.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// Fetch single-video metadata with all stream formats.
    async fn video_metadata(&self, url: &str) -> Result<VideoMetadata, DownloadError>;

    /// Fetch playlist-level metadata and member URLs.
    async fn playlist_metadata(&self, url: &str) -> Result<PlaylistMetadata, DownloadError>;

    /// Download one stream into `dir/filename` (filename is used verbatim,
    /// no extension appended). Progress and per-item completion are
    /// reported through `events` while the download runs; returns the path
    /// of the raw file.
    async fn download_stream(
        &self,
        url: &str,
        format: &StreamFormat,
        dir: &Path,
        filename: &str,
        events: &dyn DownloadEvents,
    ) -> Result<PathBuf, DownloadError>;
}
