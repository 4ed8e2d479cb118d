//! End-to-end pipeline tests over the library surface
//!
//! Exercise caption generation, stage composition, and the port seams
//! together, with fakes standing in for the external tools.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clipgate::app::{plan_invocation, PlanRequest};
use clipgate::captions::{parse_segments, write_animated_ass};
use clipgate::config::PipelineConfig;
use clipgate::error::{ClipgateError, ClipgateResult};
use clipgate::planner::{
    AudioMixStage, CropStage, EncodeParams, InvocationSpec, SubtitleStage, TransformPlan,
};
use clipgate::ports::{ExecutionReport, MediaFetcher, TransformExecutor, VideoInfo};
use clipgate::validator::{HostAllowList, UrlValidator, ValidatedUrl};

/// Executor fake that records every spec it is asked to run
#[derive(Default)]
struct RecordingExecutor {
    specs: RefCell<Vec<InvocationSpec>>,
}

impl TransformExecutor for RecordingExecutor {
    fn execute(&self, spec: &InvocationSpec) -> ClipgateResult<ExecutionReport> {
        self.specs.borrow_mut().push(spec.clone());
        Ok(ExecutionReport {
            output: spec.output.clone(),
            elapsed: Duration::from_millis(1),
        })
    }
}

/// Fetcher fake that records the URLs it is handed
struct RecordingFetcher {
    seen: RefCell<Vec<String>>,
}

impl MediaFetcher for RecordingFetcher {
    fn probe(&self, url: &ValidatedUrl) -> ClipgateResult<VideoInfo> {
        self.seen.borrow_mut().push(url.as_str().to_string());
        Ok(VideoInfo {
            title: "a clip".to_string(),
            duration: 10.0,
            uploader: "someone".to_string(),
        })
    }

    fn fetch_audio(&self, _url: &ValidatedUrl, _output_dir: &Path) -> ClipgateResult<PathBuf> {
        unreachable!("not exercised here")
    }

    fn fetch_segment(
        &self,
        url: &ValidatedUrl,
        _start: f64,
        _end: f64,
        output_path: &Path,
    ) -> ClipgateResult<PathBuf> {
        self.seen.borrow_mut().push(url.as_str().to_string());
        Ok(output_path.to_path_buf())
    }
}

#[test]
fn three_stage_pipeline_yields_single_invocation() {
    let dir = tempfile::TempDir::new().unwrap();

    // Transcript text carries an override-tag injection attempt.
    let transcript = r#"[{"start": 0.0, "end": 1.2, "text": "hello {\\b1}world"}]"#;
    let segments = parse_segments(transcript).unwrap();

    let captions = dir.path().join("captions.ass");
    write_animated_ass(&segments, &captions, &PipelineConfig::default().captions).unwrap();

    // The user-supplied braces and backslash must land as full-width
    // substitutes, never as live ASS syntax.
    let content = std::fs::read_to_string(&captions).unwrap();
    assert!(content.contains('｛'));
    assert!(content.contains('＼'));
    assert!(!content.contains("{\\b1}"));

    let music = dir.path().join("track.mp3");
    std::fs::write(&music, b"id3").unwrap();

    let spec = TransformPlan::new()
        .with_crop(CropStage {
            width: 1080,
            height: 1920,
            focus_x: Some(0.25),
        })
        .unwrap()
        .with_subtitles(SubtitleStage::new(captions))
        .unwrap()
        .with_audio_mix(AudioMixStage {
            music_path: music,
            music_volume: 0.15,
            source_volume: 1.0,
            duration: 30.0,
        })
        .unwrap()
        .plan(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &EncodeParams::default(),
        )
        .unwrap();

    assert_eq!(spec.inputs.len(), 2);
    let graph = spec.filter_complex.as_deref().unwrap();
    assert!(graph.contains("crop=1080:1920"));
    assert!(graph.contains("subtitles='"));
    assert!(graph.contains("amix=inputs=2"));

    let args = spec.to_args();
    assert_eq!(args.iter().filter(|a| *a == "-filter_complex").count(), 1);
    assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
}

#[test]
fn executor_port_receives_exactly_one_spec() {
    let executor = RecordingExecutor::default();
    let spec = TransformPlan::new()
        .plan(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &EncodeParams::default(),
        )
        .unwrap();

    let report = executor.execute(&spec).unwrap();

    assert_eq!(report.output, PathBuf::from("out.mp4"));
    assert_eq!(executor.specs.borrow().len(), 1);
    assert!(executor.specs.borrow()[0].is_passthrough());
}

#[test]
fn fetcher_only_sees_validated_urls() {
    let validator = UrlValidator::new(HostAllowList::new(["youtube.com"]));

    assert!(matches!(
        validator.validate("https://evil.internal/payload").unwrap_err(),
        ClipgateError::HostNotAllowed { .. }
    ));

    let url = validator
        .validate("https://www.youtube.com/watch?v=abc")
        .unwrap();
    let fetcher = RecordingFetcher {
        seen: RefCell::new(Vec::new()),
    };
    fetcher.probe(&url).unwrap();
    fetcher
        .fetch_segment(&url, 0.0, 10.0, Path::new("segment.mp4"))
        .unwrap();

    let seen = fetcher.seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|u| u == "https://www.youtube.com/watch?v=abc"));
}

#[test]
fn srt_subtitles_get_force_style() {
    let request = PlanRequest {
        input: PathBuf::from("in.mp4"),
        output: PathBuf::from("out.mp4"),
        crop: None,
        focus_x: None,
        subtitles: Some(PathBuf::from("captions.srt")),
        music: None,
        duration: 30.0,
        crf: None,
    };

    let spec = plan_invocation(&request, &PipelineConfig::default()).unwrap();
    let graph = spec.filter_complex.as_deref().unwrap();
    assert!(graph.contains("force_style='FontName="));
}

#[test]
fn ass_subtitles_keep_their_own_style() {
    let request = PlanRequest {
        input: PathBuf::from("in.mp4"),
        output: PathBuf::from("out.mp4"),
        crop: None,
        focus_x: None,
        subtitles: Some(PathBuf::from("captions.ass")),
        music: None,
        duration: 30.0,
        crf: None,
    };

    let spec = plan_invocation(&request, &PipelineConfig::default()).unwrap();
    let graph = spec.filter_complex.as_deref().unwrap();
    assert!(graph.contains("subtitles='captions.ass'"));
    assert!(!graph.contains("force_style"));
}
