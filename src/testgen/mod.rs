// src/testgen/mod.rs
//
// Synthetic test signal generation.
// Produces rising scales and held tones of pure sines, in memory or as
// 16-bit WAV files, for exercising the detector against known answers.

use std::f32::consts::PI;
use std::path::Path;

use crate::core::analysis::{Mode, PitchClass};
use crate::error::{KeyError, Result};

/// Parameters shared by all generated signals
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub sample_rate: u32,
    /// Length of each note in seconds
    pub note_duration: f32,
    /// Peak amplitude of each sine (0.0-1.0)
    pub amplitude: f32,
    /// Octave of the starting tonic (scientific pitch notation)
    pub octave: i32,
    /// Linear fade in/out per note in seconds
    pub fade: f32,
    /// A4 in Hz
    pub reference_frequency: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            note_duration: 0.5,
            amplitude: 0.5,
            octave: 4,
            fade: 0.01,
            reference_frequency: 440.0,
        }
    }
}

/// Frequencies of a rising scale from the tonic up to its octave (8 notes)
pub fn scale_frequencies(tonic: PitchClass, mode: Mode, config: &SynthConfig) -> Vec<f32> {
    let base = tonic.frequency(config.octave, config.reference_frequency);
    let mut freqs = Vec::with_capacity(8);
    let mut semitones = 0u32;
    freqs.push(base);
    for step in mode.intervals() {
        semitones += step as u32;
        freqs.push(base * 2f32.powf(semitones as f32 / 12.0));
    }
    freqs
}

/// Shift every frequency by a number of equal-tempered semitones
pub fn transpose_frequencies(freqs: &[f32], semitones: i32) -> Vec<f32> {
    let ratio = 2f32.powf(semitones as f32 / 12.0);
    freqs.iter().map(|f| f * ratio).collect()
}

/// One held sine tone
pub fn generate_tone(frequency: f32, config: &SynthConfig) -> Vec<f32> {
    let len = (config.note_duration * config.sample_rate as f32).round() as usize;
    let fade_len = ((config.fade * config.sample_rate as f32) as usize).min(len / 2);
    let sr = config.sample_rate as f32;

    (0..len)
        .map(|i| {
            let envelope = if fade_len == 0 {
                1.0
            } else if i < fade_len {
                i as f32 / fade_len as f32
            } else if i >= len - fade_len {
                (len - 1 - i) as f32 / fade_len as f32
            } else {
                1.0
            };
            config.amplitude * envelope * (2.0 * PI * frequency * i as f32 / sr).sin()
        })
        .collect()
}

/// Notes played one after another
pub fn generate_melody(frequencies: &[f32], config: &SynthConfig) -> Vec<f32> {
    frequencies
        .iter()
        .flat_map(|&f| generate_tone(f, config))
        .collect()
}

/// A rising scale from the tonic to its octave
pub fn generate_scale(tonic: PitchClass, mode: Mode, config: &SynthConfig) -> Vec<f32> {
    generate_melody(&scale_frequencies(tonic, mode, config), config)
}

/// Write mono samples as a 16-bit PCM WAV file
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let to_err = |e: hound::Error| KeyError::Io(std::io::Error::new(std::io::ErrorKind::Other, e));

    let mut writer = hound::WavWriter::create(path.as_ref(), spec).map_err(to_err)?;
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(v).map_err(to_err)?;
    }
    writer.finalize().map_err(to_err)?;
    Ok(())
}

/// File name used for a generated scale, e.g. `C_Natural Minor.wav`
pub fn scale_file_name(tonic: PitchClass, mode: Mode) -> String {
    format!("{}_{}.wav", tonic, mode)
}
