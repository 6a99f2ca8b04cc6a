use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Full configuration surface of the composition engine.
///
/// Every field has a default, so an empty JSON object (or no config file at
/// all) is a valid configuration. Deserialized via Serde from JSON.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Output canvas width in pixels. Must be even (yuv420p output).
    pub width: u32,
    /// Output canvas height in pixels. Must be even (yuv420p output).
    pub height: u32,
    /// Output video frame rate.
    pub fps: u32,
    /// Sample rate all audio is decoded and mixed at, in Hz.
    pub audio_sample_rate: u32,
    /// ffmpeg audio encoder name for the output container (e.g. "aac").
    pub audio_codec: String,
    /// Audio/visual fade length at each page's head and tail, in seconds.
    pub fade_duration: f64,
    /// Overlap window during which adjacent pages cross-slide, in seconds.
    pub slide_duration: f64,
    /// Zoom effect speed multiplier.
    pub zoom_speed: f64,
    /// Overscan ratio for the pan effect; must lie in (0, 1).
    pub move_ratio: f64,
    /// Base volume of per-page sound effects before loudness balancing.
    pub sound_volume: f32,
    /// Base volume of the background music before loudness balancing.
    pub music_volume: f32,
    /// How loud background tracks are relative to speech.
    pub bg_speech_ratio: f32,
    /// Subtitle segmentation and styling.
    pub caption: CaptionConfig,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 10,
            audio_sample_rate: 16_000,
            audio_codec: "aac".to_string(),
            fade_duration: 1.0,
            slide_duration: 0.4,
            zoom_speed: 0.5,
            move_ratio: 0.95,
            sound_volume: 0.2,
            music_volume: 0.2,
            bg_speech_ratio: 0.4,
            caption: CaptionConfig::default(),
        }
    }
}

/// Subtitle segmentation and styling options.
///
/// `fontsize` and `area_height` default to values derived from the output
/// resolution when left unset.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Maximum displayed characters per subtitle line.
    pub max_length: usize,
    /// Subtitle font size; derived from the resolution when `None`.
    pub fontsize: Option<u32>,
    /// Height of the solid caption bar at the bottom of the frame;
    /// derived from the resolution when `None`.
    pub area_height: Option<u32>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            max_length: 30,
            fontsize: None,
            area_height: None,
        }
    }
}

impl CaptionConfig {
    /// Effective font size for a `width` x `height` canvas.
    pub fn resolved_fontsize(&self, width: u32, height: u32) -> u32 {
        self.fontsize
            .unwrap_or((f64::from(width + height) / 2.0 * 0.025) as u32)
    }

    /// Effective caption bar height for a canvas of the given `height`.
    pub fn resolved_area_height(&self, height: u32) -> u32 {
        self.area_height.unwrap_or((f64::from(height) * 0.06) as u32)
    }
}

impl ComposeConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> StoryreelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the engine cannot render.
    pub fn validate(&self) -> StoryreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StoryreelError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output requires even dimensions.
            return Err(StoryreelError::validation(
                "canvas width/height must be even",
            ));
        }
        if self.fps == 0 {
            return Err(StoryreelError::validation("fps must be non-zero"));
        }
        if self.audio_sample_rate == 0 {
            return Err(StoryreelError::validation(
                "audio_sample_rate must be non-zero",
            ));
        }
        if self.audio_codec.trim().is_empty() {
            return Err(StoryreelError::validation("audio_codec must be non-empty"));
        }
        if !(self.fade_duration.is_finite() && self.fade_duration >= 0.0) {
            return Err(StoryreelError::validation(
                "fade_duration must be finite and >= 0",
            ));
        }
        if !(self.slide_duration.is_finite() && self.slide_duration > 0.0) {
            return Err(StoryreelError::validation(
                "slide_duration must be finite and > 0",
            ));
        }
        if !(self.zoom_speed.is_finite() && self.zoom_speed >= 0.0) {
            return Err(StoryreelError::validation(
                "zoom_speed must be finite and >= 0",
            ));
        }
        if !(self.move_ratio.is_finite() && self.move_ratio > 0.0 && self.move_ratio < 1.0) {
            return Err(StoryreelError::validation(
                "move_ratio must lie strictly between 0 and 1",
            ));
        }
        if self.caption.max_length == 0 {
            return Err(StoryreelError::validation(
                "caption.max_length must be >= 1",
            ));
        }
        Ok(())
    }
}
