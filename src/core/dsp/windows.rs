//! Window function implementations

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Window function types
///
/// All windows are generated in their periodic form (denominator `n`, not
/// `n - 1`), which is the form used for spectral averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Rectangular,
    Hann,
    Hamming,
    Blackman,
}

impl Default for WindowType {
    fn default() -> Self {
        Self::Hann
    }
}

/// Create window function
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f32> {
    let n = size as f32;
    (0..size)
        .map(|i| {
            let x = i as f32;
            match window_type {
                WindowType::Rectangular => 1.0,
                WindowType::Hann => 0.5 * (1.0 - (2.0 * PI * x / n).cos()),
                WindowType::Hamming => 0.54 - 0.46 * (2.0 * PI * x / n).cos(),
                WindowType::Blackman => {
                    0.42 - 0.5 * (2.0 * PI * x / n).cos() + 0.08 * (4.0 * PI * x / n).cos()
                }
            }
        })
        .collect()
}
