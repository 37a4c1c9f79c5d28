// ffmpeg invocation wrapper
//
// Each conversion step is a single fire-and-wait process invocation;
// a non-zero exit aborts the surrounding download with the captured
// stderr. Inputs may be extension-less raw downloads - ffmpeg probes the
// container from content.

use std::path::Path;
use tracing::debug;

use super::errors::DownloadError;
use super::provider::find_binary;
use super::utils::run_output;

pub struct Transcoder {
    ffmpeg_path: String,
}

impl Transcoder {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: find_binary("ffmpeg"),
        }
    }

    /// Override the binary location instead of probing for it.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: path.into(),
        }
    }

    /// Re-encode an audio track to MP3 (`-c:a libmp3lame`).
    pub async fn audio_to_mp3(&self, input: &Path, output: &Path) -> Result<(), DownloadError> {
        self.run(&[
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            output.to_string_lossy().to_string(),
        ])
        .await
    }

    /// Rewrap a video track into a clean container without re-encoding
    /// (`-c:v copy`).
    pub async fn remux_video(&self, input: &Path, output: &Path) -> Result<(), DownloadError> {
        self.run(&[
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ])
        .await
    }

    /// Mux separate video and audio tracks into one file, copying the video
    /// track and re-encoding audio to AAC.
    pub async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), DownloadError> {
        self.run(&[
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-i".to_string(),
            audio.to_string_lossy().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            output.to_string_lossy().to_string(),
        ])
        .await
    }

    async fn run(&self, args: &[String]) -> Result<(), DownloadError> {
        debug!(ffmpeg = %self.ffmpeg_path, ?args, "running transcode step");
        let output = run_output(&self.ffmpeg_path, args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::TranscodeFailed(stderr.to_string()));
        }
        Ok(())
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new()
    }
}
