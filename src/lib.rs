//! clipgate library
//!
//! Safe media ingestion and transform pipeline: URL validation against a
//! host allow-list, decode-skipping frame sampling for focus analysis,
//! sanitized caption generation, and composition of every transform stage
//! into a single ffmpeg invocation.

pub mod adapters;
pub mod analysis;
pub mod app;
pub mod captions;
pub mod cli;
pub mod config;
pub mod error;
pub mod planner;
pub mod ports;
pub mod sampler;
pub mod utils;
pub mod validator;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{ClipgateError, ClipgateResult};
pub use validator::{UrlValidator, ValidatedUrl};

/// Initialize libav once per process
pub fn init() -> ClipgateResult<()> {
    ffmpeg_next::init().map_err(|e| ClipgateError::FFmpegInitError {
        message: e.to_string(),
    })?;

    Ok(())
}
