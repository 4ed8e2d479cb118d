//! Command executors
//!
//! Each executor builds the concrete adapters, loads configuration, and
//! hands off to the application layer.

use std::path::Path;

use anyhow::Result;

use crate::adapters::{FfmpegExecutor, YtDlpFetcher};
use crate::app::{plan_invocation, DecodeErrorPolicy, PlanRequest, ProcessInteractor, ProcessRequest};
use crate::cli::args::{PlanArgs, ProcessArgs, ValidateArgs};
use crate::config::PipelineConfig;
use crate::validator::{HostAllowList, UrlValidator};

/// Load pipeline configuration, falling back to built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => Ok(PipelineConfig::load(p)?),
        None => Ok(PipelineConfig::default()),
    }
}

/// Parse WIDTHxHEIGHT crop geometry
fn parse_geometry(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", raw))?;
    let width = w.parse().map_err(|_| format!("bad width '{}'", w))?;
    let height = h.parse().map_err(|_| format!("bad height '{}'", h))?;
    Ok((width, height))
}

/// Execute the process command: the full pipeline against real tools
pub fn execute_process_command(args: ProcessArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.allowed_hosts.extend(args.allow.iter().cloned());

    let policy = DecodeErrorPolicy::parse(&args.on_decode_error).map_err(anyhow::Error::msg)?;

    let request = ProcessRequest {
        input: args.input,
        output: args.output,
        start: args.start,
        end: args.end,
        transcript: args.transcript,
        music_dir: args.music_dir,
        mood: args.mood,
        stride: args.stride,
        no_crop: args.no_crop,
        decode_error_policy: policy,
        crf: args.crf,
    };

    let interactor =
        ProcessInteractor::new(YtDlpFetcher::default(), FfmpegExecutor::default(), config);
    let report = interactor.run(&request)?;

    println!(
        "Wrote {} in {:.2}s",
        report.output.display(),
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

/// Execute the validate command: allow-list check with no side effects
pub fn execute_validate_command(args: ValidateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.allowed_hosts.extend(args.allow.iter().cloned());

    let validator = UrlValidator::new(HostAllowList::new(config.allowed_hosts.iter()));
    let url = validator.validate(&args.url)?;

    println!("OK: {} (host {})", url, url.host());
    Ok(())
}

/// Execute the plan command: compose stages and print the invocation
pub fn execute_plan_command(args: PlanArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    let crop = args
        .crop
        .as_deref()
        .map(parse_geometry)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let request = PlanRequest {
        input: args.input,
        output: args.output,
        crop,
        focus_x: args.focus,
        subtitles: args.subtitles,
        music: args.music,
        duration: args.duration,
        crf: args.crf,
    };

    let spec = plan_invocation(&request, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
    } else {
        println!("ffmpeg {}", spec.to_args().join(" "));
    }
    Ok(())
}
