//! Digital Signal Processing utilities

mod fft;
mod stats;
mod windows;

pub use fft::FftProcessor;
pub use stats::{normalize_peak, peak_amplitude, rms};
pub use windows::{create_window, WindowType};
