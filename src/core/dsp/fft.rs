//! FFT processing with windowing

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use super::windows::{create_window, WindowType};

/// Windowed forward FFT over fixed-size frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fft_size: usize,
    buffer: Vec<Complex<f32>>,
}

impl FftProcessor {
    pub fn new(fft_size: usize, window_type: WindowType) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(fft_size),
            window: create_window(fft_size, window_type),
            fft_size,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    /// Number of non-negative frequency bins (`fft_size / 2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Compute the magnitude spectrum of one frame and add it into `accum`.
    ///
    /// Frames shorter than `fft_size` are zero-padded.
    pub fn accumulate_magnitudes(&mut self, frame: &[f32], accum: &mut [f32]) {
        debug_assert_eq!(accum.len(), self.num_bins());

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = frame.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        for (acc, c) in accum.iter_mut().zip(self.buffer.iter()) {
            *acc += c.norm();
        }
    }

    /// Compute magnitude spectrum of a single frame
    pub fn magnitude_spectrum(&mut self, frame: &[f32]) -> Vec<f32> {
        let mut mags = vec![0.0; self.num_bins()];
        self.accumulate_magnitudes(frame, &mut mags);
        mags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_peak_bin_matches_tone() {
        let mut fft = FftProcessor::new(1024, WindowType::Hann);
        // Exactly on bin 32
        let freq = 32.0 * 44100.0 / 1024.0;
        let samples: Vec<f32> = (0..1024)
            .map(|i| (2.0 * PI * freq * i as f32 / 44100.0).sin())
            .collect();

        let mags = fft.magnitude_spectrum(&samples);
        assert_eq!(mags.len(), 513);

        let peak = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 32);
    }

    #[test]
    fn test_short_frame_is_zero_padded() {
        let mut fft = FftProcessor::new(256, WindowType::Rectangular);
        let mags = fft.magnitude_spectrum(&[1.0; 10]);
        // DC bin sums the ten ones
        assert!((mags[0] - 10.0).abs() < 1e-4);
    }
}
