//! Ports - capability interfaces to external media tools
//!
//! The core never talks to a concrete tool directly: it depends on these
//! traits so the pipeline can be exercised against fakes in tests. The
//! frame-source capability pair lives with the sampler
//! ([`crate::sampler::FrameSource`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ClipgateResult;
use crate::planner::InvocationSpec;
use crate::validator::ValidatedUrl;

/// Executes one transform invocation per spec
pub trait TransformExecutor {
    /// Run the invocation to completion; failure carries the tool's
    /// diagnostic output.
    fn execute(&self, spec: &InvocationSpec) -> ClipgateResult<ExecutionReport>;
}

/// Result of a completed transform invocation
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Path of the produced artifact
    pub output: PathBuf,
    /// Wall-clock execution time
    pub elapsed: Duration,
}

/// Fetches remote media. Every method takes a [`ValidatedUrl`], so an
/// unvalidated URL cannot reach the fetching tool through this interface.
pub trait MediaFetcher {
    /// Probe remote metadata without downloading
    fn probe(&self, url: &ValidatedUrl) -> ClipgateResult<VideoInfo>;

    /// Download the audio track only
    fn fetch_audio(&self, url: &ValidatedUrl, output_dir: &Path) -> ClipgateResult<PathBuf>;

    /// Download a time-bounded segment of the video
    fn fetch_segment(
        &self,
        url: &ValidatedUrl,
        start: f64,
        end: f64,
        output_path: &Path,
    ) -> ClipgateResult<PathBuf>;
}

/// Remote video metadata
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub uploader: String,
}
