//! Application layer - use case interactors
//!
//! Wires the validator, fetcher, sampler, caption generators, and planner
//! into the end-to-end pipeline. External tools are reached only through
//! the port traits so every use case can run against fakes in tests.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::adapters::LibavFrameSource;
use crate::analysis::FocusAnalyzer;
use crate::captions::{parse_segments, write_animated_ass, write_srt, Segment};
use crate::config::{CaptionStyle, PipelineConfig};
use crate::error::{ClipgateError, ClipgateResult};
use crate::planner::{
    AudioMixStage, CropStage, EncodeParams, InvocationSpec, SubtitleStage, TransformPlan,
};
use crate::ports::{ExecutionReport, MediaFetcher, TransformExecutor};
use crate::sampler::{FrameSampler, FrameSource, SampleStride, StepOutcome};
use crate::utils::music::select_music_for_mood;
use crate::validator::{HostAllowList, UrlValidator};

/// What to do when a sampled frame fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorPolicy {
    /// Stop the pipeline on the first decode failure
    Abort,
    /// Log the failure and keep sampling
    Skip,
}

impl DecodeErrorPolicy {
    /// Parse a policy name from the command line
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!(
                "unknown decode-error policy '{}' (expected 'abort' or 'skip')",
                other
            )),
        }
    }
}

/// Outcome of a focus-analysis pass over a frame source
#[derive(Debug, Clone, Copy)]
pub struct SampleSummary {
    /// Frames the source yielded, selected or not
    pub frames_seen: u64,
    /// Frames materialized and fed to the analyzer
    pub frames_processed: u64,
    /// Selected frames dropped under the skip policy
    pub frames_failed: u64,
    /// Normalized horizontal focus, if any frame carried signal
    pub focus_x: Option<f64>,
}

/// Sample a frame source at the given stride and estimate the horizontal
/// focus point of the footage.
///
/// Decode failures follow `policy`: `Abort` surfaces the error to the
/// caller with the failing frame index attached, `Skip` logs it and moves
/// on to the next frame.
pub fn analyze_frames<S: FrameSource>(
    source: S,
    stride: SampleStride,
    policy: DecodeErrorPolicy,
) -> ClipgateResult<SampleSummary> {
    let mut sampler = FrameSampler::new(source, stride);
    let mut analyzer = FocusAnalyzer::new();
    let mut frames_failed = 0u64;

    for step in sampler.by_ref() {
        match step {
            Ok(StepOutcome::Processed { frame, .. }) => analyzer.observe(&frame),
            Ok(StepOutcome::Skipped { .. }) => {}
            Err(err) => match policy {
                DecodeErrorPolicy::Abort => return Err(err),
                DecodeErrorPolicy::Skip => {
                    warn!("{}, continuing", err);
                    frames_failed += 1;
                }
            },
        }
    }

    let report = sampler.report();
    Ok(SampleSummary {
        frames_seen: report.frames_seen,
        frames_processed: report.frames_processed,
        frames_failed,
        focus_x: analyzer.focus_x(),
    })
}

/// Parameters for the end-to-end process use case
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Source video: an allow-listed URL or a local file path
    pub input: String,
    /// Output video file path
    pub output: PathBuf,
    /// Segment start in seconds (URL inputs)
    pub start: Option<f64>,
    /// Segment end in seconds (URL inputs)
    pub end: Option<f64>,
    /// Transcript JSON file with `{start, end, text}` segments
    pub transcript: Option<PathBuf>,
    /// Directory of background music tracks
    pub music_dir: Option<PathBuf>,
    /// Mood keyword steering music selection
    pub mood: String,
    /// Sampling stride override
    pub stride: Option<u32>,
    /// Skip cropping (and the focus analysis that feeds it)
    pub no_crop: bool,
    /// Decode failure handling during sampling
    pub decode_error_policy: DecodeErrorPolicy,
    /// CRF override
    pub crf: Option<u8>,
}

/// End-to-end pipeline: validate/fetch, analyze, generate captions, select
/// music, and run exactly one transform invocation.
pub struct ProcessInteractor<F, E> {
    fetcher: F,
    executor: E,
    config: PipelineConfig,
}

impl<F: MediaFetcher, E: TransformExecutor> ProcessInteractor<F, E> {
    pub fn new(fetcher: F, executor: E, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            executor,
            config,
        }
    }

    /// Run the pipeline to completion
    pub fn run(&self, request: &ProcessRequest) -> ClipgateResult<ExecutionReport> {
        self.config.validate()?;

        // Intermediate artifacts (fetched segment, caption files) live here
        // and are removed when the transform finishes.
        let workspace = tempfile::TempDir::new()?;

        let (local, fetched_duration) = self.resolve_input(request, workspace.path())?;

        let source = LibavFrameSource::open(&local)?;
        let duration = fetched_duration.unwrap_or_else(|| source.duration_seconds());

        let focus_x = if request.no_crop {
            None
        } else {
            let stride =
                SampleStride::new(request.stride.unwrap_or(self.config.video.sample_stride))?;
            let summary = analyze_frames(source, stride, request.decode_error_policy)?;
            info!(
                "Sampled {} of {} frames ({} failed), focus at {:?}",
                summary.frames_processed, summary.frames_seen, summary.frames_failed,
                summary.focus_x
            );
            summary.focus_x
        };

        let mut plan = TransformPlan::new();

        if !request.no_crop {
            plan = plan.with_crop(CropStage {
                width: self.config.video.output_width,
                height: self.config.video.output_height,
                focus_x,
            })?;
        }

        if let Some(ref transcript) = request.transcript {
            let raw = std::fs::read_to_string(transcript)?;
            let segments =
                parse_segments(&raw).map_err(|e| ClipgateError::ConfigError {
                    message: format!("unparseable transcript {}: {}", transcript.display(), e),
                })?;
            let stage = self.caption_stage(&segments, workspace.path())?;
            plan = plan.with_subtitles(stage)?;
        }

        if let Some(ref music_dir) = request.music_dir {
            match select_music_for_mood(music_dir, &request.mood) {
                Some(track) => {
                    plan = plan.with_audio_mix(AudioMixStage {
                        music_path: track,
                        music_volume: self.config.audio.music_volume,
                        source_volume: self.config.audio.source_volume,
                        duration,
                    })?;
                }
                None => warn!("No music tracks found in {}", music_dir.display()),
            }
        }

        let encode = EncodeParams {
            crf: request.crf.unwrap_or(self.config.video.crf),
            preset: self.config.video.preset.clone(),
        };

        let spec = plan.plan(&local, &request.output, &encode)?;
        self.executor.execute(&spec)
    }

    /// Turn the request's input into a local file. URLs are validated
    /// against the allow-list and fetched as a time-bounded segment; local
    /// paths must already exist.
    fn resolve_input(
        &self,
        request: &ProcessRequest,
        workspace: &Path,
    ) -> ClipgateResult<(PathBuf, Option<f64>)> {
        if request.input.starts_with("http://") || request.input.starts_with("https://") {
            let validator =
                UrlValidator::new(HostAllowList::new(self.config.allowed_hosts.iter()));
            let url = validator.validate(&request.input)?;

            let probed = self.fetcher.probe(&url)?;
            let start = request.start.unwrap_or(0.0);
            let end = request.end.unwrap_or(probed.duration);
            if end <= start {
                return Err(ClipgateError::ConfigError {
                    message: format!("empty time range {:.2}..{:.2}", start, end),
                });
            }

            info!("Fetching \"{}\" [{:.1}s..{:.1}s]", probed.title, start, end);
            let segment =
                self.fetcher
                    .fetch_segment(&url, start, end, &workspace.join("segment.mp4"))?;
            Ok((segment, Some(end - start)))
        } else {
            let local = PathBuf::from(&request.input);
            std::fs::metadata(&local)?;
            Ok((local, None))
        }
    }

    /// Write the caption file for the configured style and wrap it in a
    /// subtitle stage.
    fn caption_stage(
        &self,
        segments: &[Segment],
        workspace: &Path,
    ) -> ClipgateResult<SubtitleStage> {
        match self.config.captions.style {
            CaptionStyle::Animated => {
                let path = workspace.join("captions.ass");
                write_animated_ass(segments, &path, &self.config.captions)?;
                Ok(SubtitleStage::new(path))
            }
            CaptionStyle::Simple => {
                let path = workspace.join("captions.srt");
                write_srt(segments, &path, self.config.captions.words_per_line)?;
                Ok(SubtitleStage::styled_srt(path, &self.config.captions))
            }
        }
    }
}

/// Parameters for the plan use case (compose stages without executing)
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Crop geometry as (width, height)
    pub crop: Option<(u32, u32)>,
    /// Normalized horizontal focus for the crop window
    pub focus_x: Option<f64>,
    /// Subtitle file to burn in (.ass taken as-is, anything else styled SRT)
    pub subtitles: Option<PathBuf>,
    /// Background music track to mix under the source audio
    pub music: Option<PathBuf>,
    /// Source duration in seconds, sizes the music loop
    pub duration: f64,
    /// CRF override
    pub crf: Option<u8>,
}

/// Compose the requested stages into one invocation spec without running it
pub fn plan_invocation(
    request: &PlanRequest,
    config: &PipelineConfig,
) -> ClipgateResult<InvocationSpec> {
    let mut plan = TransformPlan::new();

    if let Some((width, height)) = request.crop {
        plan = plan.with_crop(CropStage {
            width,
            height,
            focus_x: request.focus_x,
        })?;
    }

    if let Some(ref subtitles) = request.subtitles {
        let stage = match subtitles.extension().and_then(|ext| ext.to_str()) {
            Some("ass") => SubtitleStage::new(subtitles.clone()),
            _ => SubtitleStage::styled_srt(subtitles.clone(), &config.captions),
        };
        plan = plan.with_subtitles(stage)?;
    }

    if let Some(ref music) = request.music {
        plan = plan.with_audio_mix(AudioMixStage {
            music_path: music.clone(),
            music_volume: config.audio.music_volume,
            source_volume: config.audio.source_volume,
            duration: request.duration,
        })?;
    }

    let encode = EncodeParams {
        crf: request.crf.unwrap_or(config.video.crf),
        preset: config.video.preset.clone(),
    };

    plan.plan(&request.input, &request.output, &encode)
}
