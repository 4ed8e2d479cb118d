//! Adapters - concrete implementations of the external-tool ports

pub mod decode_libav;
pub mod exec_ffmpeg;
pub mod fetch_ytdlp;

pub use decode_libav::LibavFrameSource;
pub use exec_ffmpeg::FfmpegExecutor;
pub use fetch_ytdlp::YtDlpFetcher;
