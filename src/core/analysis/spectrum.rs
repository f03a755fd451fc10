// src/core/analysis/spectrum.rs
//
// Averaged magnitude spectrum of a mono signal.
// Frames are Hann-windowed by default and overlap by half a frame.

use serde::Serialize;

use crate::config::DetectorConfig;
use crate::core::dsp::{FftProcessor, WindowType};
use crate::error::{KeyError, Result};

/// Mono audio signal with a fixed sample rate
#[derive(Debug, Clone)]
pub struct Signal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Signal {
    /// Wrap samples, rejecting empty buffers, non-finite samples and a zero
    /// sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(KeyError::InvalidInput("Empty audio samples".to_string()));
        }
        if sample_rate == 0 {
            return Err(KeyError::InvalidInput("Invalid sample rate: 0 Hz".to_string()));
        }
        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(KeyError::InvalidInput(format!(
                "Non-finite sample {} at index {}",
                samples[pos], pos
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Positive-frequency magnitude spectrum
#[derive(Debug, Clone, Default, Serialize)]
pub struct Spectrum {
    frequencies: Vec<f32>,
    magnitudes: Vec<f32>,
}

impl Spectrum {
    /// Assemble a spectrum from parallel frequency/magnitude vectors
    pub fn from_parts(frequencies: Vec<f32>, magnitudes: Vec<f32>) -> Result<Self> {
        if frequencies.len() != magnitudes.len() {
            return Err(KeyError::InvalidInput(format!(
                "spectrum has {} frequencies but {} magnitudes",
                frequencies.len(),
                magnitudes.len()
            )));
        }
        Ok(Self {
            frequencies,
            magnitudes,
        })
    }

    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// (frequency, magnitude) pairs in ascending frequency
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitudes.iter().copied())
    }

    pub fn peak_magnitude(&self) -> f32 {
        self.magnitudes.iter().copied().fold(0.0f32, f32::max)
    }

    /// Frequency of the strongest bin
    pub fn peak_frequency(&self) -> Option<f32> {
        self.iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(freq, _)| freq)
    }

    /// Frequency of the lowest local maximum in `[min_hz, max_hz]` whose
    /// magnitude reaches `fraction` of the strongest in-band bin.
    ///
    /// The bin position is refined by parabolic interpolation on the log
    /// magnitudes of its neighbours. Returns `None` for a silent band.
    pub fn lowest_peak(&self, min_hz: f32, max_hz: f32, fraction: f32) -> Option<f32> {
        let in_band = |k: usize| self.frequencies[k] >= min_hz && self.frequencies[k] <= max_hz;

        let band_max = (0..self.len())
            .filter(|&k| in_band(k))
            .map(|k| self.magnitudes[k])
            .fold(0.0f32, f32::max);
        if !(band_max > 0.0) || self.len() < 3 {
            return None;
        }
        let floor = fraction * band_max;

        let m = &self.magnitudes;
        let k = (1..self.len() - 1).find(|&k| {
            in_band(k) && m[k] >= floor && m[k] > m[k - 1] && m[k] >= m[k + 1]
        })?;

        let (a, b, c) = (m[k - 1].ln(), m[k].ln(), m[k + 1].ln());
        let denom = a - 2.0 * b + c;
        let offset = if a.is_finite() && c.is_finite() && denom != 0.0 {
            (0.5 * (a - c) / denom).clamp(-0.5, 0.5)
        } else {
            0.0
        };
        let step = self.frequencies[k + 1] - self.frequencies[k];
        Some(self.frequencies[k] + offset * step)
    }
}

/// Short-time spectral analyzer producing an averaged magnitude spectrum
#[derive(Debug, Clone)]
pub struct SpectralAnalyzer {
    frame_size: usize,
    hop_size: usize,
    window: WindowType,
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl SpectralAnalyzer {
    pub fn new(frame_size: usize, hop_size: usize, window: WindowType) -> Self {
        Self {
            frame_size,
            hop_size,
            window,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.frame_size, config.hop_size, config.window)
    }

    /// Bin spacing in Hz for a given sample rate
    pub fn resolution_hz(&self, sample_rate: u32) -> f32 {
        sample_rate as f32 / self.frame_size as f32
    }

    /// Average the magnitude spectra of all full frames of the signal.
    ///
    /// Frames start every `hop_size` samples while a full frame still leaves
    /// at least one sample after it. A signal no longer than one frame is
    /// analysed as a single zero-padded frame.
    pub fn analyze(&self, signal: &Signal) -> Result<Spectrum> {
        if self.frame_size < 2 || self.hop_size == 0 {
            return Err(KeyError::Config(format!(
                "frame_size {} / hop_size {} cannot be analysed",
                self.frame_size, self.hop_size
            )));
        }

        let samples = signal.samples();
        let mut fft = FftProcessor::new(self.frame_size, self.window);
        let mut accum = vec![0.0f32; fft.num_bins()];

        let mut frames = 0usize;
        let mut start = 0usize;
        while start + self.frame_size < samples.len() {
            fft.accumulate_magnitudes(&samples[start..start + self.frame_size], &mut accum);
            frames += 1;
            start += self.hop_size;
        }

        if frames == 0 {
            log::warn!(
                "Signal has {} samples, shorter than one {}-sample frame; zero-padding",
                samples.len(),
                self.frame_size
            );
            fft.accumulate_magnitudes(samples, &mut accum);
            frames = 1;
        }

        for m in accum.iter_mut() {
            *m /= frames as f32;
        }

        let resolution = self.resolution_hz(signal.sample_rate());
        let frequencies = (0..accum.len()).map(|k| k as f32 * resolution).collect();

        log::debug!(
            "Averaged {} frames of {} samples ({:.2} Hz/bin)",
            frames,
            self.frame_size,
            resolution
        );

        Spectrum::from_parts(frequencies, accum)
    }
}
