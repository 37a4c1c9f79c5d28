// Error types for the downloader

use std::fmt;

#[derive(Debug)]
pub enum DownloadError {
    /// yt-dlp or ffmpeg not found in system
    ToolNotFound(String),

    /// Subprocess spawn/exit failure
    ExecutionError(String),

    /// Failed to parse yt-dlp output
    ParseError(String),

    /// HTTP request failure (thumbnail fetch)
    Network(String),

    /// Filesystem failure
    Io(std::io::Error),

    /// No stream matched the selection heuristic
    NoMatchingStream(String),

    /// ffmpeg exited with a non-zero status
    TranscodeFailed(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolNotFound(tool) => write!(f, "Tool not found: {}", tool),
            Self::ExecutionError(msg) => write!(f, "Execution error: {}", msg),
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::NoMatchingStream(kind) => write!(f, "No matching {} stream", kind),
            Self::TranscodeFailed(msg) => write!(f, "Transcode failed: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
