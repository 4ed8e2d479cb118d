//! FFmpeg execution adapter
//!
//! Spawns exactly one ffmpeg process per invocation spec and blocks until
//! it exits. A non-zero exit surfaces as `ExecutionFailed` with the tool's
//! stderr attached.

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{ClipgateError, ClipgateResult};
use crate::planner::InvocationSpec;
use crate::ports::{ExecutionReport, TransformExecutor};

/// FFmpeg subprocess executor
#[derive(Debug, Clone)]
pub struct FfmpegExecutor {
    binary: PathBuf,
}

impl Default for FfmpegExecutor {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegExecutor {
    /// Use a specific ffmpeg binary instead of the one on PATH
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl TransformExecutor for FfmpegExecutor {
    fn execute(&self, spec: &InvocationSpec) -> ClipgateResult<ExecutionReport> {
        let args = spec.to_args();
        debug!("ffmpeg {}", args.join(" "));

        let started = Instant::now();
        let output = Command::new(&self.binary).args(&args).output()?;

        if !output.status.success() {
            return Err(ClipgateError::ExecutionFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let elapsed = started.elapsed();
        info!(
            "Transform completed in {:.2}s: {}",
            elapsed.as_secs_f64(),
            spec.output.display()
        );

        Ok(ExecutionReport {
            output: spec.output.clone(),
            elapsed,
        })
    }
}
