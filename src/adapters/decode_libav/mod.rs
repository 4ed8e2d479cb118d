//! libav-backed frame source
//!
//! Implements the sampler's advance/materialize capability pair on top of
//! ffmpeg-next. `advance` pulls the next decoded frame out of the codec
//! without any pixel-format conversion; `materialize` runs the RGB24
//! scaler and row copy, which dominates per-frame cost. The demuxer and
//! decoder are owned by this struct, so the stream is closed on every exit
//! path, including early termination and error.

use std::path::Path;

use ffmpeg_next as ffmpeg;

use ffmpeg::format::Pixel;
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

use crate::error::{ClipgateError, ClipgateResult};
use crate::sampler::{Frame, FrameSource};

/// Frame source reading a local video file through libav
pub struct LibavFrameSource {
    ictx: ffmpeg::format::context::Input,
    decoder: ffmpeg::decoder::Video,
    scaler: SwsContext,
    video_index: usize,
    duration_seconds: f64,
    pending: Option<ffmpeg::util::frame::video::Video>,
    draining: bool,
    finished: bool,
}

impl LibavFrameSource {
    /// Open a video file and prepare its primary video stream for sampling
    pub fn open(path: &Path) -> ClipgateResult<Self> {
        ffmpeg::init().map_err(|e| ClipgateError::FFmpegInitError {
            message: e.to_string(),
        })?;

        let ictx = ffmpeg::format::input(&path)?;

        let video_index = ictx
            .streams()
            .best(Type::Video)
            .ok_or_else(|| ClipgateError::StreamError {
                message: format!("no video stream in {}", path.display()),
            })?
            .index();

        let parameters = ictx
            .stream(video_index)
            .ok_or_else(|| ClipgateError::StreamError {
                message: "video stream disappeared during open".to_string(),
            })?
            .parameters();

        let decoder = ffmpeg::codec::context::Context::from_parameters(parameters)?
            .decoder()
            .video()?;

        let scaler = SwsContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            Flags::BILINEAR,
        )?;

        let duration_seconds = if ictx.duration() >= 0 {
            ictx.duration() as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE)
        } else {
            0.0
        };

        Ok(Self {
            ictx,
            decoder,
            scaler,
            video_index,
            duration_seconds,
            pending: None,
            draining: false,
            finished: false,
        })
    }

    /// Container duration in seconds, zero when the container does not report one
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Feed the next video packet into the decoder; `Ok(false)` at demux EOF
    fn feed_next_packet(&mut self) -> ClipgateResult<bool> {
        loop {
            match self.ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.video_index {
                        continue;
                    }
                    self.decoder
                        .send_packet(&packet)
                        .map_err(|e| ClipgateError::StreamError {
                            message: format!("packet rejected by decoder: {}", e),
                        })?;
                    return Ok(true);
                }
                None => return Ok(false),
            }
        }
    }
}

impl FrameSource for LibavFrameSource {
    fn advance(&mut self) -> ClipgateResult<bool> {
        if self.finished {
            return Ok(false);
        }

        let mut decoded = ffmpeg::util::frame::video::Video::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                self.pending = Some(decoded);
                return Ok(true);
            }

            if self.draining {
                self.finished = true;
                return Ok(false);
            }

            if !self.feed_next_packet()? {
                // Demux EOF: flush the decoder and drain buffered frames.
                self.decoder
                    .send_eof()
                    .map_err(|e| ClipgateError::StreamError {
                        message: format!("decoder flush failed: {}", e),
                    })?;
                self.draining = true;
            }
        }
    }

    fn materialize(&mut self) -> ClipgateResult<Frame> {
        let decoded = self
            .pending
            .take()
            .ok_or_else(|| ClipgateError::StreamError {
                message: "materialize called without a pending frame".to_string(),
            })?;

        let mut converted = ffmpeg::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut converted)?;

        let width = converted.width();
        let height = converted.height();
        let stride = converted.stride(0);
        let raw = converted.data(0);
        let row_bytes = width as usize * 3;

        let mut data = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            data.extend_from_slice(&raw[start..start + row_bytes]);
        }

        Ok(Frame {
            width,
            height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_fails() {
        assert!(LibavFrameSource::open(Path::new("/nonexistent/video.mp4")).is_err());
    }

    #[test]
    fn test_open_non_media_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("not_video.mp4");
        std::fs::write(&path, b"this is not a video").unwrap();
        assert!(LibavFrameSource::open(&path).is_err());
    }
}
