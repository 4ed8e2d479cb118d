//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

/// CRF must stay inside libx264's accepted range
fn crf_in_range(s: &str) -> Result<u8, String> {
    number_range(s, 0, 51)
}

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Source video: an allow-listed URL or a local file path
    #[arg(short, long)]
    pub input: String,

    /// Output video file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Segment start in seconds (URL inputs only)
    #[arg(long)]
    pub start: Option<f64>,

    /// Segment end in seconds (URL inputs only)
    #[arg(long)]
    pub end: Option<f64>,

    /// Transcript JSON file (array of {start, end, text} segments)
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Directory of background music tracks
    #[arg(long)]
    pub music_dir: Option<PathBuf>,

    /// Mood keyword steering music selection
    #[arg(long, default_value = "chill")]
    pub mood: String,

    /// Sample every Nth frame during focus analysis
    #[arg(long)]
    pub stride: Option<u32>,

    /// Skip the crop stage and its focus analysis
    #[arg(long)]
    pub no_crop: bool,

    /// Decode failure handling while sampling (abort or skip)
    #[arg(long, default_value = "abort")]
    pub on_decode_error: String,

    /// Constant Rate Factor (0-51)
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,

    /// Additional allow-listed host (repeatable)
    #[arg(long = "allow")]
    pub allow: Vec<String>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// URL to check against the scheme and host allow-list
    #[arg(short, long)]
    pub url: String,

    /// Additional allow-listed host (repeatable)
    #[arg(long = "allow")]
    pub allow: Vec<String>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output video file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Crop geometry as WIDTHxHEIGHT
    #[arg(long)]
    pub crop: Option<String>,

    /// Normalized horizontal focus (0-1) for the crop window
    #[arg(long)]
    pub focus: Option<f64>,

    /// Subtitle file to burn in (.ass taken as-is, anything else styled SRT)
    #[arg(long)]
    pub subtitles: Option<PathBuf>,

    /// Background music track to mix under the source audio
    #[arg(long)]
    pub music: Option<PathBuf>,

    /// Source duration in seconds, sizes the music loop
    #[arg(long, default_value = "30")]
    pub duration: f64,

    /// Constant Rate Factor (0-51)
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,

    /// Print the invocation spec as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crf_range_bounds() {
        assert_eq!(crf_in_range("0"), Ok(0));
        assert_eq!(crf_in_range("51"), Ok(51));
        assert!(crf_in_range("52").is_err());
        assert!(crf_in_range("-1").is_err());
    }
}
