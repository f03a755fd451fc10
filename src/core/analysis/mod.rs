//! Key detection algorithms
//!
//! The pipeline runs in four stages:
//! - Spectral analysis (averaged short-time magnitude spectrum)
//! - Pitch-class profiling (energy-weighted chroma vector)
//! - Template matching (12 tonics x 9 modes)
//! - Key resolution (ranking, tie-break, single-tone and silence handling)

mod matcher;
mod pitch_class;
mod resolver;
mod spectrum;
mod templates;

pub use matcher::{correlate, score_against, score_candidates};
pub use pitch_class::{PitchClass, PitchClassProfile, PitchClassProfiler, RoundingMode};
pub use resolver::{compare_candidates, rank_candidates, KeyResolver};
pub use spectrum::{Signal, SpectralAnalyzer, Spectrum};
pub use templates::{
    rotated_templates, scale_templates, Mode, RotatedTemplate, ScaleKind, ScaleTemplate,
    CANDIDATE_COUNT,
};
