// Helper functions shared across the downloader

use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use url::Url;

use super::errors::DownloadError;

/// Syntax-only URL check. Anything `Url` cannot parse, or that parses
/// without a host (relative references, `mailto:`, bare paths), fails.
pub fn validate_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.has_host(),
        Err(_) => false,
    }
}

/// Run a command to completion and collect its output. Blocks the caller
/// until the process exits; there is no timeout or cancellation.
pub async fn run_output(program: &str, args: &[String]) -> Result<std::process::Output, DownloadError> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to start {}: {}", program, e)))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| DownloadError::ExecutionError(format!("Failed to capture stdout from {}", program)))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| DownloadError::ExecutionError(format!("Failed to capture stderr from {}", program)))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    let status = child
        .wait()
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to wait for {}: {}", program, e)))?;
    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    Ok(std::process::Output { status, stdout, stderr })
}

/// Delete a file if it exists. Missing paths are not an error.
pub fn remove_file(path: &Path) -> Result<(), DownloadError> {
    if path.is_file() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

pub fn remove_files<P: AsRef<Path>>(paths: &[P]) -> Result<(), DownloadError> {
    for path in paths {
        remove_file(path.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://youtu.be/abc"));
        assert!(validate_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(validate_url("http://example.com/a.jpg"));

        assert!(!validate_url("not a url"));
        assert!(!validate_url(""));
        assert!(!validate_url("youtube.com/watch?v=abc")); // no scheme
        assert!(!validate_url("mailto:someone@example.com")); // no host
    }

    #[test]
    fn test_remove_file_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(remove_file(&missing).is_ok());
    }

    #[test]
    fn test_remove_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&b, b"y").unwrap();

        remove_files(&[&a, &b]).unwrap();
        assert!(!a.exists());
        assert!(!b.exists());
    }
}
