//! Transform planning: one filter graph, one invocation
//!
//! Collects the requested stages (crop, subtitle burn, audio mix) and
//! composes them into a single filter-graph description with explicit
//! input/output labels, so that exactly one external FFmpeg invocation
//! encodes the video per job regardless of how many stages are requested.
//! With no stages the plan degrades to a stream-copy pass-through.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::CaptionSettings;
use crate::error::{ClipgateError, ClipgateResult};

/// Loop buffer sample rate used to size the music loop
const MIX_SAMPLE_RATE: u64 = 48_000;

/// Crop stage: scale to output height, then crop to the output window.
///
/// `focus_x` is the normalized horizontal center of interest; the crop
/// window is centered on it when known, otherwise on the frame center.
#[derive(Debug, Clone, Serialize)]
pub struct CropStage {
    pub width: u32,
    pub height: u32,
    pub focus_x: Option<f64>,
}

impl CropStage {
    fn validate(&self) -> ClipgateResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ClipgateError::InvalidStageParams {
                stage: "crop",
                message: format!("dimensions must be non-zero, got {}x{}", self.width, self.height),
            });
        }
        if let Some(focus) = self.focus_x {
            if !(0.0..=1.0).contains(&focus) {
                return Err(ClipgateError::InvalidStageParams {
                    stage: "crop",
                    message: format!("focus_x {} outside 0.0..=1.0", focus),
                });
            }
        }
        Ok(())
    }

    fn render(&self) -> String {
        let x_expr = match self.focus_x {
            Some(focus) => format!("(in_w*{:.4})-(out_w/2)", focus),
            None => "(in_w-out_w)/2".to_string(),
        };
        format!(
            "scale=-1:{},crop={}:{}:{}:0",
            self.height, self.width, self.height, x_expr
        )
    }
}

/// Subtitle burn stage: render a subtitle file onto the video.
///
/// `force_style` applies only to formats without embedded styling (SRT);
/// ASS files carry their own style section.
#[derive(Debug, Clone, Serialize)]
pub struct SubtitleStage {
    pub path: PathBuf,
    pub force_style: Option<String>,
}

impl SubtitleStage {
    /// Burn a subtitle file as-is (ASS, or unstyled SRT)
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            force_style: None,
        }
    }

    /// Burn an SRT file with styling derived from caption settings
    pub fn styled_srt(path: PathBuf, settings: &CaptionSettings) -> Self {
        Self {
            path,
            force_style: Some(srt_force_style(settings)),
        }
    }

    fn validate(&self) -> ClipgateResult<()> {
        if self.path.file_name().is_none() {
            return Err(ClipgateError::InvalidStageParams {
                stage: "subtitles",
                message: format!("not a file path: {}", self.path.display()),
            });
        }
        Ok(())
    }

    fn render(&self) -> String {
        let escaped = escape_filter_path(&self.path);
        match &self.force_style {
            Some(style) => format!("subtitles='{}':force_style='{}'", escaped, style),
            None => format!("subtitles='{}'", escaped),
        }
    }
}

/// Audio mix stage: loop background music under the original audio
#[derive(Debug, Clone, Serialize)]
pub struct AudioMixStage {
    pub music_path: PathBuf,
    pub music_volume: f64,
    pub source_volume: f64,
    /// Output duration in seconds, used to size the music loop
    pub duration: f64,
}

impl AudioMixStage {
    fn validate(&self) -> ClipgateResult<()> {
        if !(0.0..=1.0).contains(&self.music_volume) || !(0.0..=1.0).contains(&self.source_volume)
        {
            return Err(ClipgateError::InvalidStageParams {
                stage: "audio_mix",
                message: "volumes must be within 0.0..=1.0".to_string(),
            });
        }
        if self.duration <= 0.0 {
            return Err(ClipgateError::InvalidStageParams {
                stage: "audio_mix",
                message: format!("duration must be positive, got {}", self.duration),
            });
        }
        Ok(())
    }

    /// Music is input 1, original audio input 0; result is labeled [aout].
    fn render(&self) -> String {
        format!(
            "[1:a]volume={},aloop=loop=-1:size={}[bgm];[0:a]volume={}[src];[src][bgm]amix=inputs=2:duration=first[aout]",
            self.music_volume,
            (self.duration * MIX_SAMPLE_RATE as f64) as u64,
            self.source_volume
        )
    }
}

/// Escape a path for use inside an FFmpeg filter argument
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "'\\''")
}

/// Render an SRT force_style clause from caption settings
fn srt_force_style(settings: &CaptionSettings) -> String {
    format!(
        "FontName={},FontSize={},PrimaryColour=&H00FFFFFF,OutlineColour=&H00000000,BackColour=&H80000000,Outline={},Shadow={},Alignment=2,MarginV={}",
        settings.font,
        settings.font_size,
        settings.outline_width,
        settings.shadow_depth,
        settings.margin_bottom
    )
}

/// Video encoding parameters for the single encode pass
#[derive(Debug, Clone, Serialize)]
pub struct EncodeParams {
    pub crf: u8,
    pub preset: String,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            crf: 18,
            preset: "slow".to_string(),
        }
    }
}

/// How the video stream leaves the invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "codec")]
pub enum VideoCodec {
    /// Stream copy, no re-encode
    Copy,
    /// libx264 encode
    X264 { crf: u8, preset: String },
}

/// How the audio stream leaves the invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    Copy,
    Aac,
}

/// A complete description of one external-process invocation.
///
/// Built once per job and handed whole to the executor; the executor never
/// composes additional passes from it.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationSpec {
    /// Input files, in FFmpeg input order
    pub inputs: Vec<PathBuf>,
    /// Combined filter graph, absent for pass-through
    pub filter_complex: Option<String>,
    /// Names of the stages baked into the graph
    pub stages: Vec<String>,
    /// Stream/label selected as video output
    pub video_map: String,
    /// Stream/label selected as audio output
    pub audio_map: String,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    pub output: PathBuf,
}

impl InvocationSpec {
    /// Whether this spec copies streams without re-encoding
    pub fn is_passthrough(&self) -> bool {
        self.filter_complex.is_none() && self.video_codec == VideoCodec::Copy
    }

    /// Render the spec as FFmpeg command-line arguments
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-y".to_string()];

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().into_owned());
        }

        if let Some(ref graph) = self.filter_complex {
            args.push("-filter_complex".to_string());
            args.push(graph.clone());
            args.push("-map".to_string());
            args.push(self.video_map.clone());
            args.push("-map".to_string());
            args.push(self.audio_map.clone());
        }

        match &self.video_codec {
            VideoCodec::Copy => {
                if self.filter_complex.is_some() {
                    args.push("-c:v".to_string());
                    args.push("copy".to_string());
                } else {
                    args.push("-c".to_string());
                    args.push("copy".to_string());
                }
            }
            VideoCodec::X264 { crf, preset } => {
                args.extend(
                    [
                        "-c:v",
                        "libx264",
                        "-crf",
                        &crf.to_string(),
                        "-preset",
                        preset,
                        "-pix_fmt",
                        "yuv420p",
                    ]
                    .map(str::to_string),
                );
            }
        }

        match self.audio_codec {
            AudioCodec::Copy => {
                if self.filter_complex.is_some() {
                    args.push("-c:a".to_string());
                    args.push("copy".to_string());
                }
            }
            AudioCodec::Aac => {
                args.extend(["-c:a", "aac", "-b:a", "192k"].map(str::to_string));
            }
        }

        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

/// Builder collecting the requested transform stages for one job
#[derive(Debug, Clone, Default)]
pub struct TransformPlan {
    crop: Option<CropStage>,
    subtitles: Option<SubtitleStage>,
    audio_mix: Option<AudioMixStage>,
}

impl TransformPlan {
    /// Start an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a crop stage; a second request is a conflict
    pub fn with_crop(mut self, stage: CropStage) -> ClipgateResult<Self> {
        if self.crop.is_some() {
            return Err(ClipgateError::ConflictingStages {
                message: "crop stage requested twice".to_string(),
            });
        }
        self.crop = Some(stage);
        Ok(self)
    }

    /// Request a subtitle-burn stage; a second request is a conflict
    pub fn with_subtitles(mut self, stage: SubtitleStage) -> ClipgateResult<Self> {
        if self.subtitles.is_some() {
            return Err(ClipgateError::ConflictingStages {
                message: "subtitle stage requested twice".to_string(),
            });
        }
        self.subtitles = Some(stage);
        Ok(self)
    }

    /// Request an audio-mix stage; a second request is a conflict
    pub fn with_audio_mix(mut self, stage: AudioMixStage) -> ClipgateResult<Self> {
        if self.audio_mix.is_some() {
            return Err(ClipgateError::ConflictingStages {
                message: "audio mix stage requested twice".to_string(),
            });
        }
        self.audio_mix = Some(stage);
        Ok(self)
    }

    /// Number of stages requested so far
    pub fn stage_count(&self) -> usize {
        [
            self.crop.is_some(),
            self.subtitles.is_some(),
            self.audio_mix.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// Compose the requested stages into exactly one invocation spec.
    ///
    /// Zero stages yield a pass-through spec (stream copy). Stage parameter
    /// validation happens here, before any external process is started.
    pub fn plan(
        &self,
        input: &Path,
        output: &Path,
        encode: &EncodeParams,
    ) -> ClipgateResult<InvocationSpec> {
        let mut inputs = vec![input.to_path_buf()];
        let mut stages = Vec::new();
        let mut video_chain: Vec<String> = Vec::new();

        if let Some(ref crop) = self.crop {
            crop.validate()?;
            video_chain.push(crop.render());
            stages.push("crop".to_string());
        }
        if let Some(ref subtitles) = self.subtitles {
            subtitles.validate()?;
            video_chain.push(subtitles.render());
            stages.push("subtitles".to_string());
        }

        let video_graph = if video_chain.is_empty() {
            None
        } else {
            Some(format!("[0:v]{}[vout]", video_chain.join(",")))
        };

        let audio_graph = match self.audio_mix {
            Some(ref mix) => {
                mix.validate()?;
                inputs.push(mix.music_path.clone());
                stages.push("audio_mix".to_string());
                Some(mix.render())
            }
            None => None,
        };

        let filter_complex = match (&video_graph, &audio_graph) {
            (Some(v), Some(a)) => Some(format!("{};{}", v, a)),
            (Some(v), None) => Some(v.clone()),
            (None, Some(a)) => Some(a.clone()),
            (None, None) => None,
        };

        let video_map = if video_graph.is_some() {
            "[vout]".to_string()
        } else {
            "0:v".to_string()
        };
        let audio_map = if audio_graph.is_some() {
            "[aout]".to_string()
        } else {
            "0:a".to_string()
        };

        let video_codec = if video_graph.is_some() {
            VideoCodec::X264 {
                crf: encode.crf,
                preset: encode.preset.clone(),
            }
        } else {
            VideoCodec::Copy
        };
        let audio_codec = if audio_graph.is_some() {
            AudioCodec::Aac
        } else {
            AudioCodec::Copy
        };

        Ok(InvocationSpec {
            inputs,
            filter_complex,
            stages,
            video_map,
            audio_map,
            video_codec,
            audio_codec,
            output: output.to_path_buf(),
        })
    }
}
