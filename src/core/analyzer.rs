// src/core/analyzer.rs
//
// High-level key detection API: the in-memory pipeline plus a file-backed
// analyzer with builder-style configuration.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::analysis::{
    score_candidates, KeyResolver, PitchClassProfile, PitchClassProfiler, Signal,
    SpectralAnalyzer, Spectrum,
};
use super::decoder::{decode_audio, to_signal, AudioData, Downmix};
use super::dsp::rms;
use super::visualization::{save_spectrum_plot, PlotConfig};
use crate::config::DetectorConfig;
use crate::detection::{DetectionResult, KeyDetection, MatchScore};
use crate::error::Result;

/// Everything one run of the pipeline produced
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Source file, when the signal came from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    pub sample_rate: u32,
    pub duration_secs: f64,
    /// Fixed-format result line, e.g. `Detected Key: C Major`
    pub headline: String,
    pub detection: KeyDetection,
    pub profile: PitchClassProfile,
    /// All 108 candidates, best first
    pub scores: Vec<MatchScore>,
    #[serde(skip)]
    pub spectrum: Spectrum,
}

/// Run the full pipeline on an in-memory signal
pub fn analyze_signal(signal: &Signal, config: &DetectorConfig) -> Result<AnalysisReport> {
    config.validate()?;

    log::debug!(
        "Analyzing {} samples at {} Hz (RMS {:.4})",
        signal.samples().len(),
        signal.sample_rate(),
        rms(signal.samples())
    );

    let spectrum = SpectralAnalyzer::from_config(config).analyze(signal)?;
    let profiler = PitchClassProfiler::from_config(config);
    let profile = profiler.profile(&spectrum)?;
    let bass = profiler.bass(&spectrum);
    let scores = score_candidates(&profile);
    let DetectionResult { detection, ranked } =
        KeyResolver::from_config(config).resolve(&profile, bass, scores);

    log::info!("{}", detection);

    Ok(AnalysisReport {
        source: None,
        sample_rate: signal.sample_rate(),
        duration_secs: signal.duration_secs(),
        headline: detection.to_string(),
        detection,
        profile,
        scores: ranked,
        spectrum,
    })
}

/// Run the full pipeline on raw mono samples
///
/// # Errors
///
/// Returns [`crate::KeyError::InvalidInput`] for an empty buffer, a
/// non-finite sample or a zero sample rate.
pub fn analyze_samples(
    samples: &[f32],
    sample_rate: u32,
    config: &DetectorConfig,
) -> Result<AnalysisReport> {
    let signal = Signal::new(samples.to_vec(), sample_rate)?;
    analyze_signal(&signal, config)
}

/// Builder for KeyAnalyzer configuration
pub struct AnalyzerBuilder {
    config: DetectorConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }

    pub fn config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn downmix(mut self, downmix: Downmix) -> Self {
        self.config.downmix = downmix;
        self
    }

    pub fn single_tone_threshold(mut self, threshold: Option<f32>) -> Self {
        self.config.single_tone_threshold = threshold;
        self
    }

    pub fn build<P: AsRef<Path>>(self, path: P) -> Result<KeyAnalyzer> {
        self.config.validate()?;
        let audio = decode_audio(path.as_ref())?;
        Ok(KeyAnalyzer {
            path: path.as_ref().to_path_buf(),
            audio,
            config: self.config,
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Key analyzer bound to one decoded audio file
pub struct KeyAnalyzer {
    path: PathBuf,
    audio: AudioData,
    config: DetectorConfig,
}

impl KeyAnalyzer {
    /// Decode a file with the default configuration
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        AnalyzerBuilder::new().build(path)
    }

    /// Decode a file with a custom configuration
    pub fn with_config<P: AsRef<Path>>(path: P, config: DetectorConfig) -> Result<Self> {
        AnalyzerBuilder::new().config(config).build(path)
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Run the pipeline on the decoded audio
    pub fn analyze(&self) -> Result<AnalysisReport> {
        let signal = to_signal(&self.audio, self.config.downmix)?;
        let mut report = analyze_signal(&signal, &self.config)?;
        report.source = Some(self.path.clone());
        Ok(report)
    }

    pub fn audio_data(&self) -> &AudioData {
        &self.audio
    }

    /// Render the averaged spectrum of a finished report to a PNG
    pub fn generate_plot(&self, report: &AnalysisReport, output_path: &Path) -> Result<()> {
        let plot = PlotConfig {
            reference_frequency: self.config.reference_frequency,
            ..PlotConfig::default()
        };
        save_spectrum_plot(&report.spectrum, &plot, output_path)
    }
}
