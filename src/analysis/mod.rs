//! Crop focus analysis over sampled frames
//!
//! Accumulates the horizontal luma centroid of every materialized frame and
//! averages it into a normalized focus position (0.0 = left edge, 1.0 =
//! right edge). The crop planner centers the output window on this focus;
//! with no observed frames the caller falls back to a center crop.

use tracing::debug;

use crate::sampler::Frame;

/// Running horizontal-focus estimate
#[derive(Debug, Default)]
pub struct FocusAnalyzer {
    centroid_sum: f64,
    frames_observed: u64,
}

impl FocusAnalyzer {
    /// Create an empty analyzer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one materialized frame into the estimate
    pub fn observe(&mut self, frame: &Frame) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }

        let width = frame.width as usize;
        let mut weighted = 0.0f64;
        let mut total = 0.0f64;

        for row in frame.data.chunks_exact(width * 3) {
            for (x, px) in row.chunks_exact(3).enumerate() {
                // BT.601 luma from RGB.
                let luma =
                    0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64;
                weighted += luma * x as f64;
                total += luma;
            }
        }

        if total > 0.0 {
            let centroid = (weighted / total) / (frame.width.saturating_sub(1).max(1)) as f64;
            self.centroid_sum += centroid.clamp(0.0, 1.0);
            self.frames_observed += 1;
            debug!(
                "Frame centroid {:.3} ({} frames observed)",
                centroid, self.frames_observed
            );
        }
    }

    /// Number of frames folded in so far
    pub fn frames_observed(&self) -> u64 {
        self.frames_observed
    }

    /// Average focus position, clamped to 0.0..=1.0; `None` until at least
    /// one frame has been observed
    pub fn focus_x(&self) -> Option<f64> {
        if self.frames_observed == 0 {
            return None;
        }
        Some((self.centroid_sum / self.frames_observed as f64).clamp(0.0, 1.0))
    }
}
