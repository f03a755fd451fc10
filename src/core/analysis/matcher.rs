// src/core/analysis/matcher.rs
//
// Template correlation: one weighted dot product per (tonic, mode) candidate.

use super::pitch_class::PitchClassProfile;
use super::templates::{rotated_templates, RotatedTemplate};
use crate::detection::MatchScore;

/// Weighted dot product of a profile with a template vector.
///
/// Summed in chromatic order so identical memberships give bit-identical
/// scores.
pub fn correlate(profile: &PitchClassProfile, weights: &[f32; 12]) -> f32 {
    profile
        .values()
        .iter()
        .zip(weights.iter())
        .fold(0.0f32, |acc, (p, w)| acc + p * w)
}

/// Score the profile against every rotated template.
///
/// Returns all 108 candidates in table order (mode-major); ranking is left
/// to the resolver.
pub fn score_candidates(profile: &PitchClassProfile) -> Vec<MatchScore> {
    score_against(profile, rotated_templates())
}

/// Score the profile against an arbitrary template set
pub fn score_against(profile: &PitchClassProfile, templates: &[RotatedTemplate]) -> Vec<MatchScore> {
    templates
        .iter()
        .map(|t| MatchScore::new(t.tonic, t.mode, correlate(profile, &t.weights)))
        .collect()
}
