//! Error handling module for clipgate

use thiserror::Error;

/// Main error type for clipgate operations
#[derive(Error, Debug)]
pub enum ClipgateError {
    /// Input could not be parsed as an absolute URL
    #[error("Malformed URL: {input}")]
    MalformedUrl { input: String },

    /// URL scheme outside the http/https allow set
    #[error("Scheme not allowed: {scheme}. Only http and https are accepted")]
    SchemeNotAllowed { scheme: String },

    /// URL host not covered by the configured allow-list
    #[error("Host not allowed: {host}")]
    HostNotAllowed { host: String },

    /// Decode failure while sampling, with the index of the failing frame
    #[error("Decode error at frame {frame_index}: {message}")]
    DecodeError { frame_index: u64, message: String },

    /// A transform stage was requested more than once
    #[error("Conflicting stages: {message}")]
    ConflictingStages { message: String },

    /// A transform stage carries parameters that fail validation
    #[error("Invalid parameters for {stage} stage: {message}")]
    InvalidStageParams {
        stage: &'static str,
        message: String,
    },

    /// External transform process exited with a failure
    #[error("Transform execution failed (exit status {status:?}): {stderr}")]
    ExecutionFailed {
        status: Option<i32>,
        stderr: String,
    },

    /// Media fetch (download/probe) failure
    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },

    /// Frame source / stream handling error
    #[error("Stream error: {message}")]
    StreamError { message: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// FFmpeg error
    #[error("FFmpeg error: {0}")]
    FFmpegError(#[from] ffmpeg_next::Error),
}

/// Result type alias for clipgate operations
pub type ClipgateResult<T> = std::result::Result<T, ClipgateError>;
