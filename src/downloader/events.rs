// Download event callbacks

use std::path::Path;

/// Caller-supplied callbacks fired during a download.
///
/// The provider invokes these synchronously from the download call stack,
/// at whatever cadence the underlying tool emits progress; there is no
/// throttling or ordering guarantee beyond "during download, before
/// completion".
pub trait DownloadEvents: Send + Sync {
    /// Fired while a stream downloads. `total_bytes` is the stream size as
    /// reported by the provider.
    fn on_progress(&self, bytes_downloaded: u64, total_bytes: u64);

    /// Fired once per downloaded stream, with the raw file path.
    fn on_item_complete(&self, path: &Path);

    /// Fired after transcoding finishes and temp files are removed.
    fn on_all_complete(&self);
}

/// Events sink that ignores everything.
pub struct NoopEvents;

impl DownloadEvents for NoopEvents {
    fn on_progress(&self, _bytes_downloaded: u64, _total_bytes: u64) {}
    fn on_item_complete(&self, _path: &Path) {}
    fn on_all_complete(&self) {}
}
