// Stream selection heuristics
//
// Candidates are sorted on a single numeric quality field, descending,
// and the first one wins: average bitrate for audio, resolution height
// for video. No codec preference, no size estimation.

use super::provider::StreamFormat;

/// Pick the audio-only stream with the highest average bitrate.
pub fn best_audio(formats: &[StreamFormat]) -> Option<&StreamFormat> {
    formats
        .iter()
        .filter(|f| f.audio_only)
        .max_by_key(|f| f.abr.map(|b| (b * 100.0) as u32).unwrap_or(0))
}

/// Pick the video-only (adaptive) stream with the highest resolution.
pub fn best_video(formats: &[StreamFormat]) -> Option<&StreamFormat> {
    formats
        .iter()
        .filter(|f| f.video_only)
        .max_by_key(|f| f.height.unwrap_or(0))
}
