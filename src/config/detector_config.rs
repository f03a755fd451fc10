// src/config/detector_config.rs
//
// Tunable parameters for the key detection pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::analysis::RoundingMode;
use crate::core::decoder::Downmix;
use crate::core::dsp::WindowType;
use crate::error::{KeyError, Result};

/// Complete detector configuration
///
/// Every field has a default, so a JSON file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// FFT frame size in samples
    pub frame_size: usize,
    /// Hop between successive frames in samples
    pub hop_size: usize,
    /// Analysis window applied to each frame
    pub window: WindowType,
    /// Lowest bin frequency folded into the pitch-class profile (Hz)
    pub min_frequency: f32,
    /// Highest bin frequency folded into the pitch-class profile (Hz)
    pub max_frequency: f32,
    /// Frequency of A4 (Hz)
    pub reference_frequency: f32,
    /// How fractional semitone distances are rounded
    pub rounding: RoundingMode,
    /// PCP peak above which the input is reported as a single tone.
    /// `None` always runs the scale resolver.
    pub single_tone_threshold: Option<f32>,
    /// How multichannel files are reduced to mono
    pub downmix: Downmix,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            frame_size: 16384,
            hop_size: 8192,
            window: WindowType::Hann,
            min_frequency: 20.0,
            max_frequency: 5000.0,
            reference_frequency: 440.0,
            rounding: RoundingMode::HalfEven,
            single_tone_threshold: Some(0.4),
            downmix: Downmix::FirstChannel,
        }
    }
}

impl DetectorConfig {
    /// Create a builder seeded with the defaults
    pub fn builder() -> DetectorConfigBuilder {
        DetectorConfigBuilder::new()
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.frame_size < 2 {
            return Err(KeyError::Config(format!(
                "frame_size must be at least 2, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 {
            return Err(KeyError::Config("hop_size must be non-zero".to_string()));
        }
        if !(self.reference_frequency > 0.0) {
            return Err(KeyError::Config(format!(
                "reference_frequency must be positive, got {}",
                self.reference_frequency
            )));
        }
        if !self.min_frequency.is_finite()
            || !self.max_frequency.is_finite()
            || !(self.min_frequency > 0.0)
            || self.min_frequency >= self.max_frequency
        {
            return Err(KeyError::Config(format!(
                "frequency band {}..{} Hz is empty, unbounded or includes DC",
                self.min_frequency, self.max_frequency
            )));
        }
        if let Some(threshold) = self.single_tone_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(KeyError::Config(format!(
                    "single_tone_threshold must lie in [0, 1], got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::debug!("Loaded detector config from {}", path.as_ref().display());
        Ok(config)
    }
}

/// Fluent builder for [`DetectorConfig`]
pub struct DetectorConfigBuilder {
    config: DetectorConfig,
}

impl DetectorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }

    pub fn frame_size(mut self, size: usize) -> Self {
        self.config.frame_size = size;
        self
    }

    pub fn hop_size(mut self, size: usize) -> Self {
        self.config.hop_size = size;
        self
    }

    pub fn window(mut self, window: WindowType) -> Self {
        self.config.window = window;
        self
    }

    pub fn frequency_range(mut self, min_hz: f32, max_hz: f32) -> Self {
        self.config.min_frequency = min_hz;
        self.config.max_frequency = max_hz;
        self
    }

    pub fn reference_frequency(mut self, hz: f32) -> Self {
        self.config.reference_frequency = hz;
        self
    }

    pub fn rounding(mut self, rounding: RoundingMode) -> Self {
        self.config.rounding = rounding;
        self
    }

    pub fn single_tone_threshold(mut self, threshold: Option<f32>) -> Self {
        self.config.single_tone_threshold = threshold;
        self
    }

    pub fn downmix(mut self, downmix: Downmix) -> Self {
        self.config.downmix = downmix;
        self
    }

    /// Finish building, validating the result
    pub fn build(self) -> Result<DetectorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for DetectorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
