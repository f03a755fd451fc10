//! audiokey - Detect the musical key of short recordings
//!
//! Estimates the tonic and mode of a monophonic or sparse recording (a held
//! scale, a simple melody) by folding its spectrum into a pitch-class profile
//! and correlating that profile against nine scale templates rotated onto all
//! twelve tonics.
//!
//! ## Pipeline
//!
//! 1. **Spectral analysis**: averaged magnitude spectrum over 16384-sample
//!    Hann frames with 50% overlap
//! 2. **Pitch-class profile**: bins between 20 Hz and 5 kHz folded into 12
//!    energy-weighted pitch classes, sum-normalized
//! 3. **Template matching**: dot product against 108 rotated templates
//! 4. **Key resolution**: deterministic ranking (score ties go to the
//!    candidate whose tonic is the lowest prominent spectral peak),
//!    single-tone and silence handling
//!
//! ## Module Structure
//!
//! - `core` - Decoding, DSP, the detection pipeline and plotting
//! - `cli` - Command-line interface
//! - `config` - Detector configuration
//! - `detection` - Result types
//! - `testgen` - Synthetic scale and tone generation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use audiokey::{analyze_samples, DetectorConfig};
//!
//! let report = analyze_samples(&samples, 44100, &DetectorConfig::default())?;
//! println!("{}", report.headline); // "Detected Key: C Major"
//! ```
//!
//! ## Supported Scales
//!
//! | Kind | Scales                                              |
//! |------|-----------------------------------------------------|
//! | Key  | Major, Natural Minor, Harmonic Minor, Melodic Minor |
//! | Mode | Dorian, Phrygian, Lydian, Mixolydian, Locrian       |

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Detector configuration
pub mod config;

// Detection result types
pub mod detection;

pub mod error;

// Synthetic test signals
pub mod testgen;

// Re-export commonly used types at crate root for convenience
pub use config::{DetectorConfig, DetectorConfigBuilder};
pub use self::core::{
    analyze_samples, analyze_signal, AnalysisReport, AnalyzerBuilder, AudioData, Downmix,
    KeyAnalyzer, Mode, PitchClass, PitchClassProfile, RoundingMode, ScaleKind, Signal, Spectrum,
};
pub use detection::{DetectionResult, KeyDetection, MatchScore};
pub use error::{KeyError, Result};
