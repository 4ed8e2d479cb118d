//! Selective frame sampling
//!
//! Iterates a video's frame sequence while only materializing (fully
//! decoding and converting) the frames selected by a stride predicate.
//! Skipped frames cost a cheap `advance` on the underlying source. The
//! sampler is lazy, finite, and single-pass; it never decides error policy
//! itself — decode failures surface per frame with their index and the
//! caller chooses abort-vs-continue.

use crate::error::{ClipgateError, ClipgateResult};

/// A materialized video frame, tightly packed RGB24
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGB24 pixel data, `width * height * 3` bytes
    pub data: Vec<u8>,
}

/// Capability pair the sampler depends on.
///
/// `advance` moves the decode position one frame forward without producing
/// pixel data; `materialize` produces the frame at the current position.
/// Implementations own the underlying stream resource and release it when
/// dropped, so early termination and error paths cannot leak it.
pub trait FrameSource {
    /// Move to the next frame. Returns `Ok(false)` at end of stream.
    fn advance(&mut self) -> ClipgateResult<bool>;

    /// Produce the frame at the current position (expensive).
    fn materialize(&mut self) -> ClipgateResult<Frame>;
}

/// Stateless, deterministic sampling decision: process every Nth frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleStride(u32);

impl SampleStride {
    /// Create a stride; `n` must be at least 1
    pub fn new(n: u32) -> ClipgateResult<Self> {
        if n == 0 {
            return Err(ClipgateError::ConfigError {
                message: "sampling stride must be at least 1".to_string(),
            });
        }
        Ok(Self(n))
    }

    /// Whether the frame at `index` should be fully processed
    pub fn selects(&self, index: u64) -> bool {
        index % self.0 as u64 == 0
    }
}

/// Outcome of one sampling step
#[derive(Debug)]
pub enum StepOutcome {
    /// Frame advanced past without materializing pixel data
    Skipped { index: u64 },
    /// Frame fully decoded for analysis
    Processed { index: u64, frame: Frame },
}

impl StepOutcome {
    /// The frame index this step covered
    pub fn index(&self) -> u64 {
        match self {
            StepOutcome::Skipped { index } => *index,
            StepOutcome::Processed { index, .. } => *index,
        }
    }
}

/// Totals reported when the stream is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleReport {
    /// Total frames stepped over (skipped + processed)
    pub frames_seen: u64,
    /// Frames fully materialized
    pub frames_processed: u64,
}

/// Lazy single-pass sampling iterator over a frame source
pub struct FrameSampler<S: FrameSource> {
    source: S,
    stride: SampleStride,
    index: u64,
    report: SampleReport,
    finished: bool,
}

impl<S: FrameSource> FrameSampler<S> {
    /// Create a sampler over a source with the given stride
    pub fn new(source: S, stride: SampleStride) -> Self {
        Self {
            source,
            stride,
            index: 0,
            report: SampleReport::default(),
            finished: false,
        }
    }

    /// Totals seen so far (final once the iterator returns `None`)
    pub fn report(&self) -> SampleReport {
        self.report
    }
}

impl<S: FrameSource> Iterator for FrameSampler<S> {
    type Item = ClipgateResult<StepOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.source.advance() {
            Ok(false) => {
                self.finished = true;
                None
            }
            Ok(true) => {
                let index = self.index;
                self.index += 1;
                self.report.frames_seen += 1;

                if self.stride.selects(index) {
                    match self.source.materialize() {
                        Ok(frame) => {
                            self.report.frames_processed += 1;
                            Some(Ok(StepOutcome::Processed { index, frame }))
                        }
                        Err(e) => Some(Err(ClipgateError::DecodeError {
                            frame_index: index,
                            message: e.to_string(),
                        })),
                    }
                } else {
                    Some(Ok(StepOutcome::Skipped { index }))
                }
            }
            // An advance failure indicates stream corruption; it is surfaced
            // with the index of the step that failed, never swallowed.
            Err(e) => {
                let index = self.index;
                self.index += 1;
                self.report.frames_seen += 1;
                Some(Err(ClipgateError::DecodeError {
                    frame_index: index,
                    message: e.to_string(),
                }))
            }
        }
    }
}
