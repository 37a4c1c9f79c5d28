// Downloader - the public orchestration surface
//
// Sequential glue over three collaborators: the metadata provider, the
// ffmpeg transcoder and an HTTP client for thumbnails. Nothing here runs
// concurrently; every call drives its collaborators to completion in
// order.

use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use super::display::{format_publish_date, format_view_count, sanitize_title};
use super::errors::DownloadError;
use super::events::DownloadEvents;
use super::models::{DownloaderConfig, PlaylistSummary, VideoSummary};
use super::provider::{MetadataProvider, YtDlpProvider};
use super::selector;
use super::transcode::Transcoder;
use super::utils::{remove_file, remove_files, validate_url};

/// Orchestrates metadata lookups and audio/video downloads.
///
/// Failure handling is deliberately asymmetric: a malformed URL and a
/// non-success thumbnail response are swallowed (the operation returns
/// nothing), while every provider, subprocess, network or filesystem
/// failure propagates as an error with no retry.
pub struct Downloader {
    config: DownloaderConfig,
    provider: Box<dyn MetadataProvider>,
    transcoder: Transcoder,
    http: reqwest::Client,
    events: Box<dyn DownloadEvents>,
}

impl Downloader {
    pub fn new(config: DownloaderConfig, events: Box<dyn DownloadEvents>) -> Self {
        Self::with_provider(config, Box::new(YtDlpProvider::new()), events)
    }

    /// Construct with a custom provider (used by tests and embedders that
    /// bring their own extraction tool).
    pub fn with_provider(
        config: DownloaderConfig,
        provider: Box<dyn MetadataProvider>,
        events: Box<dyn DownloadEvents>,
    ) -> Self {
        Self {
            config,
            provider,
            transcoder: Transcoder::new(),
            http: reqwest::Client::new(),
            events,
        }
    }

    /// Syntax-only URL check. Every other operation silently no-ops when
    /// this fails.
    pub fn validate(&self, url: &str) -> bool {
        validate_url(url)
    }

    /// Download thumbnail bytes into the work directory under a random
    /// unique name. A non-success response yields `None`, not an error.
    pub async fn fetch_thumbnail(&self, url: &str) -> Result<Option<PathBuf>, DownloadError> {
        if !validate_url(url) {
            return Ok(None);
        }

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            debug!(url, status = %response.status(), "thumbnail fetch skipped");
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        let path = self.config.work_dir.join(format!("{}.jpg", Uuid::new_v4()));
        std::fs::write(&path, &bytes)?;
        Ok(Some(path))
    }

    /// Fetch display-ready details for a single video.
    pub async fn quick_search(&self, url: &str) -> Result<Option<VideoSummary>, DownloadError> {
        if !validate_url(url) {
            return Ok(None);
        }

        let meta = self.provider.video_metadata(url).await?;
        let thumbnail_path = self.fetch_thumbnail(&meta.thumbnail_url).await?;

        Ok(Some(VideoSummary {
            views: format_view_count(meta.view_count),
            publish_date: meta.upload_date.map(format_publish_date).unwrap_or_default(),
            title: meta.title,
            owner: meta.uploader,
            channel_url: meta.channel_url,
            thumbnail_url: meta.thumbnail_url,
            thumbnail_path,
        }))
    }

    /// Fetch playlist details plus a `quick_search` summary per member
    /// video, sequentially, in source order.
    pub async fn search_playlist(&self, url: &str) -> Result<Option<PlaylistSummary>, DownloadError> {
        if !validate_url(url) {
            return Ok(None);
        }

        let meta = self.provider.playlist_metadata(url).await?;

        let mut videos = Vec::with_capacity(meta.entry_urls.len());
        let mut video_urls = Vec::with_capacity(meta.entry_urls.len());

        for entry_url in &meta.entry_urls {
            video_urls.push(entry_url.clone());
            if let Some(summary) = self.quick_search(entry_url).await? {
                videos.push(summary);
            }
        }

        Ok(Some(PlaylistSummary {
            video_count: meta.entry_urls.len(),
            views: format_view_count(meta.view_count),
            last_updated: meta.modified_date.map(format_publish_date).unwrap_or_default(),
            title: meta.title,
            owner: meta.uploader,
            videos,
            video_urls,
        }))
    }

    /// Download the best audio stream and re-encode it to
    /// `<output_dir>/<title>.mp3`.
    pub async fn download_audio(&self, url: &str) -> Result<(), DownloadError> {
        if !validate_url(url) {
            return Ok(());
        }

        let meta = self.provider.video_metadata(url).await?;
        let title = sanitize_title(&meta.title);
        let output = self.config.output_dir.join(format!("{}.mp3", title));

        let stream = selector::best_audio(&meta.formats)
            .ok_or_else(|| DownloadError::NoMatchingStream("audio".to_string()))?;

        info!(url, title = %title, format_id = %stream.format_id, "downloading audio");
        let raw_audio = self
            .provider
            .download_stream(url, stream, &self.config.work_dir, "audio", self.events.as_ref())
            .await?;

        self.transcoder.audio_to_mp3(&raw_audio, &output).await?;

        remove_file(&raw_audio)?;

        self.events.on_all_complete();
        Ok(())
    }

    /// Download the best video and audio streams, then run three transcode
    /// steps: rewrap the video, re-encode the audio to MP3, and mux both
    /// into `<output_dir>/<title>.mp4` with AAC audio.
    pub async fn download_video(&self, url: &str) -> Result<(), DownloadError> {
        if !validate_url(url) {
            return Ok(());
        }

        let meta = self.provider.video_metadata(url).await?;
        let title = sanitize_title(&meta.title);
        let output = self.config.output_dir.join(format!("{}.mp4", title));

        let video_stream = selector::best_video(&meta.formats)
            .ok_or_else(|| DownloadError::NoMatchingStream("video".to_string()))?;
        let audio_stream = selector::best_audio(&meta.formats)
            .ok_or_else(|| DownloadError::NoMatchingStream("audio".to_string()))?;

        info!(
            url,
            title = %title,
            video_format = %video_stream.format_id,
            audio_format = %audio_stream.format_id,
            "downloading video"
        );

        let raw_video = self
            .provider
            .download_stream(url, video_stream, &self.config.work_dir, "video", self.events.as_ref())
            .await?;
        let raw_audio = self
            .provider
            .download_stream(url, audio_stream, &self.config.work_dir, "audio", self.events.as_ref())
            .await?;

        let video_mp4 = self.config.work_dir.join("video.mp4");
        let audio_mp3 = self.config.work_dir.join("audio.mp3");

        self.transcoder.remux_video(&raw_video, &video_mp4).await?;
        self.transcoder.audio_to_mp3(&raw_audio, &audio_mp3).await?;
        self.transcoder.mux(&video_mp4, &audio_mp3, &output).await?;

        remove_files(&[&audio_mp3, &raw_audio, &video_mp4, &raw_video])?;

        self.events.on_all_complete();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::events::NoopEvents;
    use crate::downloader::provider::{PlaylistMetadata, StreamFormat, VideoMetadata};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Provider returning canned metadata; panics if a download is asked
    /// for (none of these tests should reach one).
    struct StubProvider {
        entry_urls: Vec<String>,
        metadata_calls: Arc<AtomicUsize>,
    }

    impl StubProvider {
        fn new(entry_urls: Vec<String>) -> Self {
            Self {
                entry_urls,
                metadata_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl MetadataProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn video_metadata(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
            self.metadata_calls.fetch_add(1, Ordering::SeqCst);
            Ok(VideoMetadata {
                title: format!("Video at {}", url),
                uploader: "Stub Channel".to_string(),
                channel_url: "https://www.youtube.com/channel/UCstub".to_string(),
                // Empty thumbnail URL fails validation, so no HTTP happens
                thumbnail_url: String::new(),
                view_count: 1_234,
                upload_date: None,
                formats: Vec::new(),
            })
        }

        async fn playlist_metadata(&self, _url: &str) -> Result<PlaylistMetadata, DownloadError> {
            Ok(PlaylistMetadata {
                title: "Stub Playlist".to_string(),
                uploader: "Stub Channel".to_string(),
                view_count: 2_500_000,
                modified_date: None,
                entry_urls: self.entry_urls.clone(),
            })
        }

        async fn download_stream(
            &self,
            _url: &str,
            _format: &StreamFormat,
            _dir: &Path,
            _filename: &str,
            _events: &dyn DownloadEvents,
        ) -> Result<PathBuf, DownloadError> {
            panic!("download_stream not expected in this test");
        }
    }

    struct RecordingEvents {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl DownloadEvents for RecordingEvents {
        fn on_progress(&self, bytes_downloaded: u64, total_bytes: u64) {
            self.log
                .lock()
                .unwrap()
                .push(format!("progress {}/{}", bytes_downloaded, total_bytes));
        }

        fn on_item_complete(&self, path: &Path) {
            self.log
                .lock()
                .unwrap()
                .push(format!("item {}", path.display()));
        }

        fn on_all_complete(&self) {
            self.log.lock().unwrap().push("all".to_string());
        }
    }

    fn downloader_with(provider: StubProvider) -> Downloader {
        let dir = tempfile::tempdir().unwrap().into_path();
        let config = DownloaderConfig::default()
            .with_output_dir(dir.clone())
            .with_work_dir(dir);
        Downloader::with_provider(config, Box::new(provider), Box::new(NoopEvents))
    }

    #[tokio::test]
    async fn test_quick_search_invalid_url_returns_none() {
        let provider = StubProvider::new(Vec::new());
        let calls = provider.metadata_calls.clone();
        let dl = downloader_with(provider);

        let result = dl.quick_search("not a url").await.unwrap();
        assert!(result.is_none());
        // The provider is never consulted for a malformed URL
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_quick_search_formats_fields() {
        let dl = downloader_with(StubProvider::new(Vec::new()));
        let summary = dl
            .quick_search("https://youtu.be/abc")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.title, "Video at https://youtu.be/abc");
        assert_eq!(summary.owner, "Stub Channel");
        assert_eq!(summary.views, "1.2K views");
        assert!(summary.thumbnail_path.is_none());
    }

    #[tokio::test]
    async fn test_search_playlist_invalid_url_returns_none() {
        let dl = downloader_with(StubProvider::new(Vec::new()));
        assert!(dl.search_playlist("::::").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_playlist_preserves_source_order() {
        let urls = vec![
            "https://youtu.be/first".to_string(),
            "https://youtu.be/second".to_string(),
            "https://youtu.be/third".to_string(),
        ];
        let dl = downloader_with(StubProvider::new(urls.clone()));

        let playlist = dl
            .search_playlist("https://www.youtube.com/playlist?list=PLx")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(playlist.title, "Stub Playlist");
        assert_eq!(playlist.video_count, 3);
        assert_eq!(playlist.views, "2.5M views");
        assert_eq!(playlist.video_urls, urls);
        assert_eq!(playlist.videos.len(), 3);

        // Every entry matches a standalone quick_search on the same URL
        for (url, entry) in urls.iter().zip(&playlist.videos) {
            let standalone = dl.quick_search(url).await.unwrap().unwrap();
            assert_eq!(entry, &standalone);
        }
    }

    #[tokio::test]
    async fn test_download_audio_invalid_url_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let provider = StubProvider::new(Vec::new());
        let calls = provider.metadata_calls.clone();
        let dir = tempfile::tempdir().unwrap().into_path();
        let config = DownloaderConfig::default()
            .with_output_dir(dir.clone())
            .with_work_dir(dir);
        let dl = Downloader::with_provider(
            config,
            Box::new(provider),
            Box::new(RecordingEvents { log: log.clone() }),
        );

        dl.download_audio("not a url").await.unwrap();
        dl.download_video("also not a url").await.unwrap();

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_thumbnail_invalid_url_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = DownloaderConfig::default()
            .with_output_dir(dir.path())
            .with_work_dir(dir.path());
        let dl = Downloader::with_provider(
            config,
            Box::new(StubProvider::new(Vec::new())),
            Box::new(NoopEvents),
        );

        let result = dl.fetch_thumbnail("not a url").await.unwrap();
        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
