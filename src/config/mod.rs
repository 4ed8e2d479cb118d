//! Pipeline configuration
//!
//! Loaded from a TOML file when given, otherwise defaults mirror the
//! standard short-form output profile (1080x1920, CRF 18, slow preset).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClipgateError, ClipgateResult};

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Hosts permitted for URL fetches
    pub allowed_hosts: Vec<String>,
    /// Video output settings
    pub video: VideoSettings,
    /// Audio mixing settings
    pub audio: AudioSettings,
    /// Caption rendering settings
    pub captions: CaptionSettings,
}

/// Video output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Output width in pixels
    pub output_width: u32,
    /// Output height in pixels
    pub output_height: u32,
    /// Constant Rate Factor (0-51)
    pub crf: u8,
    /// x264 encoding preset
    pub preset: String,
    /// Sampling stride for frame analysis (process every Nth frame)
    pub sample_stride: u32,
}

/// Audio mixing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f64,
    /// Original audio volume (0.0 - 1.0)
    pub source_volume: f64,
}

/// Caption style and layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Font family name
    pub font: String,
    /// Font size for the 1080x1920 ASS play resolution
    pub font_size: u32,
    /// Outline thickness
    pub outline_width: u32,
    /// Shadow depth
    pub shadow_depth: u32,
    /// Margin from the bottom edge
    pub margin_bottom: u32,
    /// Words shown per subtitle entry
    pub words_per_line: usize,
    /// Caption style: "simple" (SRT) or "animated" (ASS word highlight)
    pub style: CaptionStyle,
    /// Highlight color for the active word, ASS &HBBGGRR format
    pub highlight_color: String,
}

/// Caption rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    /// Plain SRT entries
    Simple,
    /// ASS with per-word highlight animation
    Animated,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: vec![
                "youtube.com".to_string(),
                "www.youtube.com".to_string(),
                "youtu.be".to_string(),
            ],
            video: VideoSettings::default(),
            audio: AudioSettings::default(),
            captions: CaptionSettings::default(),
        }
    }
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            output_width: 1080,
            output_height: 1920,
            crf: 18,
            preset: "slow".to_string(),
            sample_stride: 10,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_volume: 0.15,
            source_volume: 1.0,
        }
    }
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            font: "Segoe UI Semibold".to_string(),
            font_size: 72,
            outline_width: 3,
            shadow_depth: 2,
            margin_bottom: 120,
            words_per_line: 2,
            style: CaptionStyle::Animated,
            highlight_color: "&H0000FFFF".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ClipgateResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw).map_err(|e| ClipgateError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants
    pub fn validate(&self) -> ClipgateResult<()> {
        if self.video.output_width == 0 || self.video.output_height == 0 {
            return Err(ClipgateError::ConfigError {
                message: "output dimensions must be non-zero".to_string(),
            });
        }
        if self.video.crf > 51 {
            return Err(ClipgateError::ConfigError {
                message: format!("crf {} out of range (0-51)", self.video.crf),
            });
        }
        if self.video.sample_stride == 0 {
            return Err(ClipgateError::ConfigError {
                message: "sample_stride must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.audio.music_volume)
            || !(0.0..=1.0).contains(&self.audio.source_volume)
        {
            return Err(ClipgateError::ConfigError {
                message: "audio volumes must be within 0.0-1.0".to_string(),
            });
        }
        if self.captions.words_per_line == 0 {
            return Err(ClipgateError::ConfigError {
                message: "words_per_line must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_partial_toml_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clipgate.toml");
        std::fs::write(
            &path,
            r#"
allowed_hosts = ["example.com"]

[video]
output_width = 720
output_height = 1280
"#,
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.allowed_hosts, vec!["example.com"]);
        assert_eq!(config.video.output_width, 720);
        assert_eq!(config.video.crf, 18); // default preserved
        assert_eq!(config.captions.words_per_line, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = PipelineConfig::default();
        config.video.crf = 99;
        assert!(matches!(
            config.validate().unwrap_err(),
            ClipgateError::ConfigError { .. }
        ));

        let mut config = PipelineConfig::default();
        config.video.sample_stride = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.audio.music_volume = 1.5;
        assert!(config.validate().is_err());
    }
}
