//! yt-dlp fetch adapter
//!
//! Downloads remote media through a yt-dlp subprocess. Every entry point
//! takes a [`ValidatedUrl`], so this adapter can never be handed a URL the
//! validator has not approved.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{ClipgateError, ClipgateResult};
use crate::ports::{MediaFetcher, VideoInfo};
use crate::validator::ValidatedUrl;

/// yt-dlp subprocess fetcher
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    binary: PathBuf,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
        }
    }
}

impl YtDlpFetcher {
    /// Use a specific yt-dlp binary instead of the one on PATH
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    fn run(&self, args: &[String]) -> ClipgateResult<String> {
        let output = Command::new(&self.binary).args(args).output()?;
        if !output.status.success() {
            return Err(ClipgateError::FetchFailed {
                message: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Format seconds as HH:MM:SS for --download-sections
fn seconds_to_hhmmss(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

impl MediaFetcher for YtDlpFetcher {
    fn probe(&self, url: &ValidatedUrl) -> ClipgateResult<VideoInfo> {
        let stdout = self.run(&[
            "--dump-json".to_string(),
            "--no-download".to_string(),
            "--no-playlist".to_string(),
            url.as_str().to_string(),
        ])?;

        serde_json::from_str(&stdout).map_err(|e| ClipgateError::FetchFailed {
            message: format!("unparseable metadata: {}", e),
        })
    }

    fn fetch_audio(&self, url: &ValidatedUrl, output_dir: &Path) -> ClipgateResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let template = output_dir.join("%(title)s.%(ext)s");

        info!("Downloading audio from: {}", url);
        let stdout = self.run(&[
            "-x".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            "192K".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "--no-playlist".to_string(),
            // Print the final path so we can return it without guessing.
            "--print".to_string(),
            "after_move:filepath".to_string(),
            url.as_str().to_string(),
        ])?;

        let path = stdout
            .lines()
            .last()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .ok_or_else(|| ClipgateError::FetchFailed {
                message: "yt-dlp did not report an output path".to_string(),
            })?;

        info!("Audio downloaded: {}", path);
        Ok(PathBuf::from(path))
    }

    fn fetch_segment(
        &self,
        url: &ValidatedUrl,
        start: f64,
        end: f64,
        output_path: &Path,
    ) -> ClipgateResult<PathBuf> {
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let section = format!(
            "*{}-{}",
            seconds_to_hhmmss(start),
            seconds_to_hhmmss(end)
        );

        info!("Downloading video segment: {}", section);
        self.run(&[
            "--download-sections".to_string(),
            section,
            "-f".to_string(),
            "bestvideo[height<=1080]+bestaudio/best[height<=1080]".to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            output_path.to_string_lossy().into_owned(),
            "--no-playlist".to_string(),
            "--force-keyframes-at-cuts".to_string(),
            url.as_str().to_string(),
        ])?;

        info!("Video segment downloaded: {}", output_path.display());
        Ok(output_path.to_path_buf())
    }
}
