// src/core/analysis/resolver.rs
//
// Ranking and selection of the detected key.
//
// Candidates are ordered by:
//   1. score, descending
//   2. tonic equal to the bass (lowest prominent spectral peak) first
//   3. PCP energy of the candidate's tonic, descending
//   4. chromatic index of the tonic, ascending (C first)
//   5. mode declaration order, ascending
//
// Keys 2-5 only matter for exact score ties, which happen whenever two
// candidates share a pitch set (relative modes).

use std::cmp::Ordering;

use super::pitch_class::{PitchClass, PitchClassProfile};
use crate::config::DetectorConfig;
use crate::detection::{DetectionResult, KeyDetection, MatchScore};

/// Total order used to rank candidates against a given profile and bass
pub fn compare_candidates(
    a: &MatchScore,
    b: &MatchScore,
    profile: &PitchClassProfile,
    bass: Option<PitchClass>,
) -> Ordering {
    let on_bass = |s: &MatchScore| Some(s.tonic) == bass;
    b.score
        .total_cmp(&a.score)
        .then_with(|| on_bass(b).cmp(&on_bass(a)))
        .then_with(|| profile.get(b.tonic).total_cmp(&profile.get(a.tonic)))
        .then_with(|| a.tonic.index().cmp(&b.tonic.index()))
        .then_with(|| a.mode.ordinal().cmp(&b.mode.ordinal()))
}

/// Sort candidates best-first
pub fn rank_candidates(
    mut scores: Vec<MatchScore>,
    profile: &PitchClassProfile,
    bass: Option<PitchClass>,
) -> Vec<MatchScore> {
    scores.sort_by(|a, b| compare_candidates(a, b, profile, bass));
    scores
}

/// Selects the detected key from scored candidates
#[derive(Debug, Clone)]
pub struct KeyResolver {
    single_tone_threshold: Option<f32>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl KeyResolver {
    pub fn new(single_tone_threshold: Option<f32>) -> Self {
        Self {
            single_tone_threshold,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.single_tone_threshold)
    }

    /// Rank the candidates and pick the primary detection.
    ///
    /// `bass` is the pitch class of the lowest prominent spectral peak, if
    /// any; it decides between candidates that share a pitch set. A silent
    /// profile is reported as [`KeyDetection::Undetected`]; a profile
    /// whose peak exceeds the single-tone threshold as
    /// [`KeyDetection::SingleTone`]. The ranking is returned in full either way.
    pub fn resolve(
        &self,
        profile: &PitchClassProfile,
        bass: Option<PitchClass>,
        scores: Vec<MatchScore>,
    ) -> DetectionResult {
        let ranked = rank_candidates(scores, profile, bass);

        let detection = if profile.is_silent() {
            log::info!("Pitch-class profile is empty; no key detected");
            KeyDetection::Undetected
        } else {
            let (peak_class, peak_value) = profile.peak();
            match self.single_tone_threshold {
                Some(threshold) if peak_value > threshold => {
                    log::debug!(
                        "{} holds {:.1}% of the energy; reporting a single tone",
                        peak_class,
                        peak_value * 100.0
                    );
                    KeyDetection::SingleTone { tonic: peak_class }
                }
                _ => match ranked.first() {
                    Some(best) => KeyDetection::Key {
                        tonic: best.tonic,
                        mode: best.mode,
                    },
                    None => KeyDetection::Undetected,
                },
            }
        };

        DetectionResult { detection, ranked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::{score_candidates, Mode};

    fn profile(weights: &[(PitchClass, f32)]) -> PitchClassProfile {
        let mut energies = [0.0; 12];
        for &(pc, w) in weights {
            energies[pc.index()] += w;
        }
        PitchClassProfile::from_energies(energies).unwrap()
    }

    fn resolve(pcp: &PitchClassProfile) -> DetectionResult {
        KeyResolver::new(Some(0.4)).resolve(pcp, None, score_candidates(pcp))
    }

    fn c_major_set(emphasis: PitchClass) -> PitchClassProfile {
        use PitchClass::*;
        let weights: Vec<(PitchClass, f32)> = [C, D, E, F, G, A, B]
            .iter()
            .map(|&pc| (pc, if pc == emphasis { 2.0 } else { 1.0 }))
            .collect();
        profile(&weights)
    }

    #[test]
    fn test_ranking_is_descending() {
        use PitchClass::*;
        let pcp = profile(&[(C, 2.0), (E, 1.0), (G, 1.5), (A, 0.5)]);
        let result = resolve(&pcp);
        assert_eq!(result.ranked.len(), 108);
        assert!(result.ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_tie_prefers_stronger_tonic() {
        // C major pitch set with A emphasised: A Natural Minor ties with C Major
        let pcp = c_major_set(PitchClass::A);
        let result = resolve(&pcp);
        assert_eq!(
            result.detection,
            KeyDetection::Key {
                tonic: PitchClass::A,
                mode: Mode::NaturalMinor
            }
        );
    }

    #[test]
    fn test_tie_prefers_bass_over_energy() {
        // A is strongest but E sounds lowest: E Phrygian
        let pcp = c_major_set(PitchClass::A);
        let result =
            KeyResolver::new(Some(0.4)).resolve(&pcp, Some(PitchClass::E), score_candidates(&pcp));
        assert_eq!(
            result.detection,
            KeyDetection::Key {
                tonic: PitchClass::E,
                mode: Mode::Phrygian
            }
        );
        assert_eq!(result.ranked[1].tonic, PitchClass::A);
    }

    #[test]
    fn test_bass_outside_the_best_pitch_set_is_ignored() {
        // No top-scoring candidate has an F# tonic; energy decides
        let pcp = c_major_set(PitchClass::A);
        let with_bass =
            KeyResolver::new(Some(0.4)).resolve(&pcp, Some(PitchClass::FSharp), score_candidates(&pcp));
        assert_eq!(with_bass.detection, resolve(&pcp).detection);
    }

    #[test]
    fn test_bass_never_beats_a_higher_score() {
        use PitchClass::*;
        // A faint F# at the bottom cannot lift any F# scale over C major
        let pcp = profile(&[
            (C, 1.0),
            (D, 1.0),
            (E, 1.0),
            (F, 1.0),
            (FSharp, 0.1),
            (G, 1.0),
            (A, 1.0),
            (B, 1.0),
        ]);
        let result = KeyResolver::new(Some(0.4)).resolve(&pcp, Some(FSharp), score_candidates(&pcp));
        assert_eq!(
            result.detection,
            KeyDetection::Key {
                tonic: C,
                mode: Mode::Major
            }
        );
    }

    #[test]
    fn test_tie_falls_back_to_chromatic_order() {
        use PitchClass::*;
        let pcp = profile(&[
            (C, 1.0),
            (D, 1.0),
            (E, 1.0),
            (F, 1.0),
            (G, 1.0),
            (A, 1.0),
            (B, 1.0),
        ]);
        let result = resolve(&pcp);
        assert_eq!(
            result.detection,
            KeyDetection::Key {
                tonic: C,
                mode: Mode::Major
            }
        );
        // Next tied candidate is D Dorian
        assert_eq!((result.ranked[1].tonic, result.ranked[1].mode), (D, Mode::Dorian));
    }

    #[test]
    fn test_silence_is_undetected() {
        let pcp = PitchClassProfile::default();
        let result = resolve(&pcp);
        assert_eq!(result.detection, KeyDetection::Undetected);
        assert_eq!(result.ranked.len(), 108);
    }

    #[test]
    fn test_dominant_pitch_is_single_tone() {
        let pcp = profile(&[(PitchClass::A, 9.0), (PitchClass::E, 1.0)]);
        let result = resolve(&pcp);
        assert_eq!(
            result.detection,
            KeyDetection::SingleTone {
                tonic: PitchClass::A
            }
        );
        assert_eq!(result.ranked.len(), 108);
    }

    #[test]
    fn test_single_tone_can_be_disabled() {
        let pcp = profile(&[(PitchClass::A, 1.0)]);
        let result = KeyResolver::new(None).resolve(&pcp, None, score_candidates(&pcp));
        // Every scale containing A ties; A has all the energy so A-tonic wins,
        // and Major is first in declaration order.
        assert_eq!(
            result.detection,
            KeyDetection::Key {
                tonic: PitchClass::A,
                mode: Mode::Major
            }
        );
    }

    #[test]
    fn test_ranking_is_deterministic() {
        use PitchClass::*;
        let pcp = profile(&[(C, 1.0), (D, 0.3), (G, 0.8), (A, 0.8)]);
        let first = resolve(&pcp);
        let second = resolve(&pcp);
        assert_eq!(first, second);

        let mut shuffled = score_candidates(&pcp);
        shuffled.reverse();
        let reordered = KeyResolver::new(Some(0.4)).resolve(&pcp, None, shuffled);
        assert_eq!(first.ranked, reordered.ranked);
    }
}
