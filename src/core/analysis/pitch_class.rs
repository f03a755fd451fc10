// src/core/analysis/pitch_class.rs
//
// Pitch-class profile (chroma vector) construction.
// Folds the averaged magnitude spectrum into 12 energy-weighted bins.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::spectrum::Spectrum;
use crate::config::DetectorConfig;
use crate::error::{KeyError, Result};

/// Offset of A from C in the chromatic scale
const A_INDEX: i64 = 9;

/// A spectral peak below this share of the band maximum is not a bass note
const BASS_PEAK_FRACTION: f32 = 0.1;

/// One of the 12 chromatic pitch classes, named with sharps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D#")]
    DSharp,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "G#")]
    GSharp,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A#")]
    ASharp,
    #[serde(rename = "B")]
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order starting at C
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Chromatic index, 0 = C
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class at a chromatic index (wrapped modulo 12)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a sharp-spelled note name ("C", "F#", case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|pc| pc.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Shift by a number of semitones (negative moves down)
    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_index((self.index() as i32 + semitones).rem_euclid(12) as usize)
    }

    /// Map a frequency to its nearest pitch class.
    ///
    /// Returns `None` for non-positive or non-finite frequencies.
    pub fn from_frequency(freq: f32, reference_hz: f32, rounding: RoundingMode) -> Option<Self> {
        if !(freq > 0.0) || !freq.is_finite() {
            return None;
        }
        let semitones = 12.0 * (freq as f64 / reference_hz as f64).log2();
        let nearest = rounding.apply(semitones) as i64;
        Some(Self::from_index((nearest + A_INDEX).rem_euclid(12) as usize))
    }

    /// Equal-tempered frequency of this pitch class in a given octave
    /// (scientific pitch notation, A4 = `reference_hz`).
    pub fn frequency(self, octave: i32, reference_hz: f32) -> f32 {
        let midi = 12 * (octave + 1) + self.index() as i32;
        reference_hz * 2f32.powf((midi - 69) as f32 / 12.0)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rounding applied to fractional semitone distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour (banker's rounding)
    HalfEven,
    /// Ties go away from zero
    HalfAwayFromZero,
}

impl Default for RoundingMode {
    fn default() -> Self {
        Self::HalfEven
    }
}

impl RoundingMode {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfEven => value.round_ties_even(),
            RoundingMode::HalfAwayFromZero => value.round(),
        }
    }
}

/// Sum-normalized 12-bin energy histogram over pitch classes.
///
/// Index 0 is C. Values are non-negative and either sum to 1.0 or are all
/// zero (silence).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PitchClassProfile([f32; 12]);

impl PitchClassProfile {
    /// Build a profile from raw accumulator values, normalizing by their sum.
    pub fn from_energies(energies: [f32; 12]) -> Result<Self> {
        if let Some(bad) = energies.iter().find(|v| !(**v >= 0.0) || !v.is_finite()) {
            return Err(KeyError::InvalidInput(format!(
                "pitch-class energy must be finite and non-negative, got {}",
                bad
            )));
        }

        let total: f32 = energies.iter().sum();
        if total == 0.0 {
            return Ok(Self::default());
        }

        let mut values = energies;
        for v in values.iter_mut() {
            *v /= total;
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f32; 12] {
        &self.0
    }

    pub fn get(&self, pitch_class: PitchClass) -> f32 {
        self.0[pitch_class.index()]
    }

    /// True when no energy reached any pitch class
    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Strongest pitch class; the lower chromatic index wins ties
    pub fn peak(&self) -> (PitchClass, f32) {
        let mut best = 0;
        for i in 1..12 {
            if self.0[i] > self.0[best] {
                best = i;
            }
        }
        (PitchClass::from_index(best), self.0[best])
    }

    pub fn iter(&self) -> impl Iterator<Item = (PitchClass, f32)> + '_ {
        PitchClass::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

/// Folds spectra into pitch-class profiles
#[derive(Debug, Clone)]
pub struct PitchClassProfiler {
    min_frequency: f32,
    max_frequency: f32,
    reference_frequency: f32,
    rounding: RoundingMode,
}

impl Default for PitchClassProfiler {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl PitchClassProfiler {
    pub fn new(min_frequency: f32, max_frequency: f32, reference_frequency: f32) -> Self {
        Self {
            min_frequency,
            max_frequency,
            reference_frequency,
            rounding: RoundingMode::default(),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            reference_frequency: config.reference_frequency,
            rounding: config.rounding,
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Accumulate every in-band bin's magnitude into its pitch class
    pub fn profile(&self, spectrum: &Spectrum) -> Result<PitchClassProfile> {
        let mut energies = [0.0f32; 12];
        let mut used_bins = 0usize;

        for (freq, magnitude) in spectrum.iter() {
            if freq < self.min_frequency || freq > self.max_frequency {
                continue;
            }
            if let Some(pc) = PitchClass::from_frequency(freq, self.reference_frequency, self.rounding) {
                energies[pc.index()] += magnitude;
                used_bins += 1;
            }
        }

        log::debug!(
            "Folded {} of {} bins into pitch classes ({:.0}-{:.0} Hz)",
            used_bins,
            spectrum.len(),
            self.min_frequency,
            self.max_frequency
        );

        PitchClassProfile::from_energies(energies)
    }

    /// Pitch class of the lowest prominent in-band spectral peak
    pub fn bass(&self, spectrum: &Spectrum) -> Option<PitchClass> {
        let freq = spectrum.lowest_peak(self.min_frequency, self.max_frequency, BASS_PEAK_FRACTION)?;
        let bass = PitchClass::from_frequency(freq, self.reference_frequency, self.rounding);
        log::debug!("Lowest prominent peak at {:.1} Hz ({:?})", freq, bass);
        bass
    }
}
