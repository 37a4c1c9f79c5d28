// yt-dlp MetadataProvider - drives the native `yt-dlp` binary
//
// Metadata comes from `--dump-json` (single video) and
// `--flat-playlist --dump-single-json` (playlist); stream downloads run
// `-f <format_id>` with `--newline` so progress can be parsed line by line
// from stdout.

use async_trait::async_trait;
use regex::Regex;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use time::macros::format_description;
use time::Date;
use tracing::{debug, warn};

use super::traits::{MetadataProvider, PlaylistMetadata, StreamFormat, VideoMetadata};
use crate::downloader::errors::DownloadError;
use crate::downloader::events::DownloadEvents;
use crate::downloader::utils::run_output;

/// Provider backed by the yt-dlp executable.
pub struct YtDlpProvider {
    ytdlp_path: String,
}

impl YtDlpProvider {
    pub fn new() -> Self {
        Self {
            ytdlp_path: find_ytdlp(),
        }
    }

    /// Override the binary location instead of probing for it.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            ytdlp_path: path.into(),
        }
    }

    fn parse_video_json(stdout: &[u8]) -> Result<VideoMetadata, DownloadError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| DownloadError::ParseError(format!("Invalid JSON: {}", e)))?;

        let formats = Self::parse_formats(&json)?;

        Ok(VideoMetadata {
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            uploader: json["uploader"].as_str().unwrap_or("Unknown").to_string(),
            channel_url: json["channel_url"]
                .as_str()
                .or_else(|| json["uploader_url"].as_str())
                .unwrap_or("")
                .to_string(),
            thumbnail_url: json["thumbnail"].as_str().unwrap_or("").to_string(),
            view_count: json["view_count"].as_u64().unwrap_or(0),
            upload_date: json["upload_date"].as_str().and_then(parse_compact_date),
            formats,
        })
    }

    fn parse_formats(json: &serde_json::Value) -> Result<Vec<StreamFormat>, DownloadError> {
        let formats_array = json["formats"]
            .as_array()
            .ok_or_else(|| DownloadError::ParseError("No formats array in JSON".to_string()))?;

        let mut formats = Vec::new();

        for f in formats_array {
            let vcodec = f["vcodec"].as_str().map(|s| s.to_string());
            let acodec = f["acodec"].as_str().map(|s| s.to_string());

            let video_only = vcodec.as_ref().map_or(false, |v| v != "none")
                && acodec.as_ref().map_or(true, |a| a == "none");
            let audio_only = acodec.as_ref().map_or(false, |a| a != "none")
                && vcodec.as_ref().map_or(true, |v| v == "none");

            formats.push(StreamFormat {
                format_id: f["format_id"].as_str().unwrap_or("").to_string(),
                ext: f["ext"].as_str().unwrap_or("").to_string(),
                width: f["width"].as_u64().map(|w| w as u32),
                height: f["height"].as_u64().map(|h| h as u32),
                abr: f["abr"].as_f64().map(|a| a as f32),
                vcodec,
                acodec,
                filesize: f["filesize"].as_u64().or_else(|| f["filesize_approx"].as_u64()),
                audio_only,
                video_only,
            });
        }

        Ok(formats)
    }

    fn parse_playlist_json(stdout: &[u8]) -> Result<PlaylistMetadata, DownloadError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| DownloadError::ParseError(format!("Invalid JSON: {}", e)))?;

        let entries = json["entries"]
            .as_array()
            .ok_or_else(|| DownloadError::ParseError("No entries array in JSON".to_string()))?;

        let entry_urls = entries
            .iter()
            .filter_map(|e| {
                e["url"]
                    .as_str()
                    .map(|u| u.to_string())
                    .or_else(|| {
                        e["id"]
                            .as_str()
                            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
                    })
            })
            .collect();

        Ok(PlaylistMetadata {
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            uploader: json["uploader"]
                .as_str()
                .or_else(|| json["channel"].as_str())
                .unwrap_or("Unknown")
                .to_string(),
            view_count: json["view_count"].as_u64().unwrap_or(0),
            modified_date: json["modified_date"].as_str().and_then(parse_compact_date),
            entry_urls,
        })
    }
}

impl Default for YtDlpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn video_metadata(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        let args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ];

        debug!(url, "fetching video metadata");
        let output = run_output(&self.ytdlp_path, &args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::ExecutionError(format!(
                "yt-dlp metadata fetch failed: {}",
                stderr
            )));
        }

        Self::parse_video_json(&output.stdout)
    }

    async fn playlist_metadata(&self, url: &str) -> Result<PlaylistMetadata, DownloadError> {
        let args = vec![
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ];

        debug!(url, "fetching playlist metadata");
        let output = run_output(&self.ytdlp_path, &args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::ExecutionError(format!(
                "yt-dlp playlist fetch failed: {}",
                stderr
            )));
        }

        Self::parse_playlist_json(&output.stdout)
    }

    async fn download_stream(
        &self,
        url: &str,
        format: &StreamFormat,
        dir: &Path,
        filename: &str,
        events: &dyn DownloadEvents,
    ) -> Result<PathBuf, DownloadError> {
        let dest = dir.join(filename);

        let args = vec![
            "-f".to_string(),
            format.format_id.clone(),
            "--newline".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
            "-P".to_string(),
            dir.to_string_lossy().to_string(),
            // Verbatim filename; the caller owns extension handling
            "-o".to_string(),
            filename.to_string(),
            url.to_string(),
        ];

        debug!(url, format_id = %format.format_id, dest = %dest.display(), "downloading stream");

        let mut child = StdCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DownloadError::ExecutionError(format!("Failed to start yt-dlp: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::ExecutionError("Failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::ExecutionError("Failed to capture stderr".to_string()))?;

        let stderr_handle = std::thread::spawn(move || {
            let reader = BufReader::new(stderr);
            let mut lines = Vec::new();
            for line in reader.lines().map_while(Result::ok) {
                lines.push(line);
            }
            lines.join("\n")
        });

        // Known size beats the per-line estimate when the provider has one
        let reported_size = format.filesize;

        let reader = BufReader::new(stdout);
        for line in reader.lines().map_while(Result::ok) {
            if let Some((downloaded, total)) = parse_progress_line(&line) {
                let total = reported_size.unwrap_or(total);
                events.on_progress(downloaded.min(total), total);
            }
        }

        let status = child
            .wait()
            .map_err(|e| DownloadError::ExecutionError(format!("Process error: {}", e)))?;
        let stderr_output = stderr_handle.join().unwrap_or_default();

        if !status.success() {
            warn!(url, "yt-dlp download failed");
            return Err(DownloadError::ExecutionError(format!(
                "yt-dlp download failed: {}",
                stderr_output
            )));
        }

        events.on_item_complete(&dest);
        Ok(dest)
    }
}

/// Find the yt-dlp binary: common install paths first, then `which`,
/// then hope it is in PATH.
fn find_ytdlp() -> String {
    find_binary("yt-dlp")
}

pub(crate) fn find_binary(name: &str) -> String {
    let common_paths = vec![
        format!("/opt/homebrew/bin/{}", name), // Homebrew on Apple Silicon
        format!("/usr/local/bin/{}", name),    // Homebrew on Intel Mac
        format!("/usr/bin/{}", name),          // System installation
    ];

    for path in common_paths {
        if std::path::Path::new(&path).exists() {
            return path;
        }
    }

    if let Ok(output) = StdCommand::new("which").arg(name).output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    name.to_string()
}

/// Parse a compact `YYYYMMDD` date as yt-dlp emits for upload/modified dates.
fn parse_compact_date(s: &str) -> Option<Date> {
    let fmt = format_description!("[year][month][day]");
    Date::parse(s, &fmt).ok()
}

/// Parse a yt-dlp progress line like:
/// `[download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32`
/// into (bytes_downloaded, total_bytes).
fn parse_progress_line(line: &str) -> Option<(u64, u64)> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex = Regex::new(
            r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*(\d+\.?\d*)\s*([KMGT]?i?B)"
        ).unwrap();
    }

    let caps = PROGRESS_RE.captures(line)?;
    let percent: f64 = caps.get(1)?.as_str().parse().ok()?;
    let size_value: f64 = caps.get(2)?.as_str().parse().ok()?;
    let total = parse_size(size_value, caps.get(3)?.as_str())?;

    let downloaded = (total as f64 * percent / 100.0) as u64;
    Some((downloaded, total))
}

fn parse_size(value: f64, unit: &str) -> Option<u64> {
    let multiplier: f64 = match unit {
        "B" => 1.0,
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        "TiB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        "KB" => 1e3,
        "MB" => 1e6,
        "GB" => 1e9,
        "TB" => 1e12,
        _ => return None,
    };
    Some((value * multiplier) as u64)
}
