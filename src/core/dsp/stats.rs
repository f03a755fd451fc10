//! Statistical helpers over sample buffers

/// Compute peak amplitude
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Scale samples in place so the peak magnitude is 1.0.
///
/// Silent buffers are left untouched.
pub fn normalize_peak(samples: &mut [f32]) {
    let peak = peak_amplitude(samples);
    if peak == 0.0 || !peak.is_finite() {
        return;
    }
    for s in samples.iter_mut() {
        *s /= peak;
    }
}

/// Compute RMS (Root Mean Square)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}
