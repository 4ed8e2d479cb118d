//! Caption generation from transcript segments
//!
//! Two output formats: plain SRT entries and animated ASS with per-word
//! highlighting. All user-supplied text passes through the sanitizer before
//! it is embedded in a subtitle track.

use serde::{Deserialize, Serialize};

pub mod ass;
pub mod sanitize;
pub mod srt;

pub use ass::write_animated_ass;
pub use sanitize::Sanitizer;
pub use srt::write_srt;

/// A timed transcript segment destined for a subtitle track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Segment start in seconds
    pub start: f64,
    /// Segment end in seconds
    pub end: f64,
    /// Spoken text (untrusted)
    pub text: String,
}

/// Parse transcript segments from JSON (an array of `{start, end, text}`)
pub fn parse_segments(raw: &str) -> Result<Vec<Segment>, serde_json::Error> {
    serde_json::from_str(raw)
}
