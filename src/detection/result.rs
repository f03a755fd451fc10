//! Detection result types

use serde::Serialize;
use std::fmt;

use crate::core::analysis::{Mode, PitchClass, ScaleKind};

/// Correlation of the profile against one (tonic, mode) candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchScore {
    pub tonic: PitchClass,
    pub mode: Mode,
    pub score: f32,
}

impl MatchScore {
    pub fn new(tonic: PitchClass, mode: Mode, score: f32) -> Self {
        Self { tonic, mode, score }
    }

    pub fn kind(&self) -> ScaleKind {
        self.mode.kind()
    }

    /// Score table row, e.g. `Key: C Major - Score: 0.1429`
    pub fn table_row(&self) -> String {
        format!(
            "{}: {} {} - Score: {:.4}",
            self.kind().label(),
            self.tonic,
            self.mode,
            self.score
        )
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}

/// Outcome of key resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyDetection {
    /// A tonic and a scale were identified
    Key { tonic: PitchClass, mode: Mode },
    /// A single pitch class dominates the profile
    SingleTone { tonic: PitchClass },
    /// No energy reached the profile (silence)
    Undetected,
}

impl KeyDetection {
    pub fn is_detected(&self) -> bool {
        !matches!(self, KeyDetection::Undetected)
    }

    pub fn tonic(&self) -> Option<PitchClass> {
        match self {
            KeyDetection::Key { tonic, .. } | KeyDetection::SingleTone { tonic } => Some(*tonic),
            KeyDetection::Undetected => None,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            KeyDetection::Key { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}

impl fmt::Display for KeyDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDetection::Key { tonic, mode } => write!(f, "Detected Key: {} {}", tonic, mode),
            KeyDetection::SingleTone { tonic } => {
                write!(f, "Detected Key: {} (Single Tone)", tonic)
            }
            KeyDetection::Undetected => f.write_str("Detected Key: Undetected"),
        }
    }
}

/// Primary detection plus the full ranking it was drawn from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub detection: KeyDetection,
    /// All candidates, best first
    pub ranked: Vec<MatchScore>,
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.detection, f)
    }
}
