//! Core analysis modules

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod dsp;
pub mod visualization;

pub use analysis::{
    KeyResolver, Mode, PitchClass, PitchClassProfile, PitchClassProfiler, RoundingMode,
    ScaleKind, Signal, SpectralAnalyzer, Spectrum,
};
pub use analyzer::{analyze_samples, analyze_signal, AnalysisReport, AnalyzerBuilder, KeyAnalyzer};
pub use decoder::{decode_audio, AudioData, Downmix};
