// src/core/analysis/templates.rs
//
// Scale templates: nine modes, each rotated to all twelve tonics.
// The rotated table is built once on first use and shared read-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::pitch_class::PitchClass;

/// Number of (tonic, mode) candidates
pub const CANDIDATE_COUNT: usize = 12 * Mode::ALL.len();

/// Whether a scale is reported as a key or as a church mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Key,
    Mode,
}

impl ScaleKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScaleKind::Key => "Key",
            ScaleKind::Mode => "Mode",
        }
    }
}

/// The nine supported scales, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "Major")]
    Major,
    #[serde(rename = "Natural Minor")]
    NaturalMinor,
    #[serde(rename = "Harmonic Minor")]
    HarmonicMinor,
    #[serde(rename = "Melodic Minor")]
    MelodicMinor,
    #[serde(rename = "Dorian")]
    Dorian,
    #[serde(rename = "Phrygian")]
    Phrygian,
    #[serde(rename = "Lydian")]
    Lydian,
    #[serde(rename = "Mixolydian")]
    Mixolydian,
    #[serde(rename = "Locrian")]
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::Major,
        Mode::NaturalMinor,
        Mode::HarmonicMinor,
        Mode::MelodicMinor,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Locrian,
    ];

    /// Position in declaration order
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "Major",
            Mode::NaturalMinor => "Natural Minor",
            Mode::HarmonicMinor => "Harmonic Minor",
            Mode::MelodicMinor => "Melodic Minor",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Locrian => "Locrian",
        }
    }

    /// Parse a mode name ("Natural Minor", "dorian", "natural_minor")
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace(['_', '-'], " ");
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(&wanted))
    }

    /// Semitone steps between successive degrees, ending back on the tonic
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Major => [2, 2, 1, 2, 2, 2, 1],
            Mode::NaturalMinor => [2, 1, 2, 2, 1, 2, 2],
            Mode::HarmonicMinor => [2, 1, 2, 2, 1, 3, 1],
            Mode::MelodicMinor => [2, 1, 2, 2, 2, 2, 1],
            Mode::Dorian => [2, 1, 2, 2, 2, 1, 2],
            Mode::Phrygian => [1, 2, 2, 2, 1, 2, 2],
            Mode::Lydian => [2, 2, 2, 1, 2, 2, 1],
            Mode::Mixolydian => [2, 2, 1, 2, 2, 1, 2],
            Mode::Locrian => [1, 2, 2, 1, 2, 2, 2],
        }
    }

    /// Semitone offsets of the seven degrees from the tonic
    pub fn degrees(self) -> [u8; 7] {
        let mut degrees = [0u8; 7];
        let steps = self.intervals();
        for i in 1..7 {
            degrees[i] = degrees[i - 1] + steps[i - 1];
        }
        degrees
    }

    pub fn kind(self) -> ScaleKind {
        match self {
            Mode::Major | Mode::NaturalMinor | Mode::HarmonicMinor | Mode::MelodicMinor => {
                ScaleKind::Key
            }
            _ => ScaleKind::Mode,
        }
    }

    /// Template for this mode with the tonic at index 0
    pub fn template(self) -> &'static ScaleTemplate {
        &scale_templates()[self.ordinal()]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Membership weights of a mode relative to a tonic at index 0.
///
/// Members share equal weight and the weights sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTemplate {
    pub mode: Mode,
    pub weights: [f32; 12],
}

impl ScaleTemplate {
    fn for_mode(mode: Mode) -> Self {
        let mut membership = [0.0f32; 12];
        for degree in mode.degrees() {
            membership[degree as usize % 12] = 1.0;
        }

        let total: f32 = membership.iter().sum();
        let mut weights = [0.0f32; 12];
        for (w, m) in weights.iter_mut().zip(membership.iter()) {
            *w = m / total;
        }

        Self { mode, weights }
    }

    /// Weights shifted so index `tonic` holds the template's index 0
    pub fn rotated(&self, tonic: PitchClass) -> [f32; 12] {
        let mut out = [0.0f32; 12];
        for (i, &w) in self.weights.iter().enumerate() {
            out[(i + tonic.index()) % 12] = w;
        }
        out
    }
}

/// A template rotated onto a specific tonic
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedTemplate {
    pub tonic: PitchClass,
    pub mode: Mode,
    pub weights: [f32; 12],
}

/// The nine base templates, in declaration order
pub fn scale_templates() -> &'static [ScaleTemplate] {
    static TEMPLATES: OnceLock<Vec<ScaleTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(|| Mode::ALL.iter().map(|&m| ScaleTemplate::for_mode(m)).collect())
}

/// All 108 rotated templates, grouped by mode then chromatic tonic
pub fn rotated_templates() -> &'static [RotatedTemplate] {
    static ROTATED: OnceLock<Vec<RotatedTemplate>> = OnceLock::new();
    ROTATED.get_or_init(|| {
        let mut table = Vec::with_capacity(CANDIDATE_COUNT);
        for template in scale_templates() {
            for tonic in PitchClass::ALL {
                table.push(RotatedTemplate {
                    tonic,
                    mode: template.mode,
                    weights: template.rotated(tonic),
                });
            }
        }
        log::debug!("Built {} rotated scale templates", table.len());
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_intervals_span_an_octave() {
        for mode in Mode::ALL {
            let total: u8 = mode.intervals().iter().sum();
            assert_eq!(total, 12, "{} intervals sum to {}", mode, total);
        }
    }

    #[test]
    fn test_templates_have_seven_equal_members() {
        for template in scale_templates() {
            let members: Vec<_> = template.weights.iter().filter(|&&w| w > 0.0).collect();
            assert_eq!(members.len(), 7, "{}", template.mode);
            assert!(members.iter().all(|&&w| w == 1.0 / 7.0));
            assert!(template.weights[0] > 0.0, "tonic missing from {}", template.mode);
        }
    }

    #[test]
    fn test_c_major_degrees() {
        assert_eq!(Mode::Major.degrees(), [0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(Mode::Locrian.degrees(), [0, 1, 3, 5, 6, 8, 10]);
    }

    #[test]
    fn test_rotation_moves_tonic() {
        let d_major = Mode::Major.template().rotated(PitchClass::D);
        // D E F# G A B C#
        for idx in [2, 4, 6, 7, 9, 11, 1] {
            assert!(d_major[idx] > 0.0, "index {} should be in D major", idx);
        }
        assert_eq!(d_major[0], 0.0);
    }

    #[test]
    fn test_rotated_table_is_complete() {
        let table = rotated_templates();
        assert_eq!(table.len(), CANDIDATE_COUNT);
        let unique: HashSet<_> = table.iter().map(|t| (t.tonic, t.mode)).collect();
        assert_eq!(unique.len(), 108);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Mode::from_name("natural_minor"), Some(Mode::NaturalMinor));
        assert_eq!(Mode::from_name("Aeolian"), None);
    }

    #[test]
    fn test_scale_kinds() {
        assert_eq!(Mode::Major.kind(), ScaleKind::Key);
        assert_eq!(Mode::MelodicMinor.kind(), ScaleKind::Key);
        assert_eq!(Mode::Dorian.kind(), ScaleKind::Mode);
        assert_eq!(Mode::Locrian.kind().label(), "Mode");
    }
}
