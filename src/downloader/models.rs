// Common data models for the downloader

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Single-video details as shown to a caller.
///
/// View count and publish date arrive pre-formatted for display
/// ("1.2M views", "3 months ago"); raw numbers stay inside the provider
/// layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub title: String,
    /// Channel/author name
    pub owner: String,
    pub channel_url: String,
    pub thumbnail_url: String,
    /// Local copy of the thumbnail; `None` when the fetch was skipped
    /// (invalid URL or non-success response)
    pub thumbnail_path: Option<PathBuf>,
    pub views: String,
    pub publish_date: String,
}

/// Playlist details plus a summary per member video, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub title: String,
    pub owner: String,
    pub video_count: usize,
    pub views: String,
    pub last_updated: String,
    pub videos: Vec<VideoSummary>,
    pub video_urls: Vec<String>,
}

/// Downloader configuration
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Where finished .mp3/.mp4 files land
    pub output_dir: PathBuf,

    /// Scratch directory for raw stream downloads, intermediate transcode
    /// files and fetched thumbnails
    pub work_dir: PathBuf,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        let downloads = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            output_dir: downloads.clone(),
            work_dir: downloads,
        }
    }
}

impl DownloaderConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }
}
