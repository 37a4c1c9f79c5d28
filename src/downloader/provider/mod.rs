// Metadata provider module
//
// The `MetadataProvider` trait is the seam over the external extraction
// tool; `YtDlpProvider` is the production implementation.

mod traits;
mod ytdlp;

pub use traits::{MetadataProvider, PlaylistMetadata, StreamFormat, VideoMetadata};
pub use ytdlp::YtDlpProvider;

pub(crate) use ytdlp::find_binary;
