// src/core/visualization/spectrum_plot.rs
//
// Magnitude spectrum plot with a pitch-class marker strip.

use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

use crate::core::analysis::{PitchClass, RoundingMode, Spectrum};
use crate::error::{KeyError, Result};

const MARGIN_LEFT: u32 = 50;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 30;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const TRACE: Rgb<u8> = Rgb([0, 0, 255]);

/// Spectrum plot configuration
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    /// Upper edge of the frequency axis; `None` plots up to Nyquist
    pub max_frequency: Option<f32>,
    /// Vertical grid spacing in Hz
    pub grid_step_hz: f32,
    /// Minimum spacing between pitch-class markers in Hz
    pub marker_spacing_hz: f32,
    /// A4 used when labelling markers
    pub reference_frequency: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            max_frequency: None,
            grid_step_hz: 1000.0,
            marker_spacing_hz: 1000.0,
            reference_frequency: 440.0,
        }
    }
}

/// Render the spectrum to an in-memory image
pub fn render_spectrum_plot(spectrum: &Spectrum, config: &PlotConfig) -> Result<RgbImage> {
    if spectrum.is_empty() {
        return Err(KeyError::Plot("Spectrum is empty".to_string()));
    }
    if config.width <= MARGIN_LEFT + MARGIN_RIGHT + 1 || config.height <= MARGIN_TOP + MARGIN_BOTTOM + 1 {
        return Err(KeyError::Plot(format!(
            "Plot size {}x{} leaves no drawing area",
            config.width, config.height
        )));
    }

    let nyquist = spectrum.frequencies().last().copied().unwrap_or(0.0);
    let max_freq = config.max_frequency.unwrap_or(nyquist).min(nyquist);
    if !(max_freq > 0.0) {
        return Err(KeyError::Plot("Frequency axis has zero width".to_string()));
    }

    let mut img: RgbImage = ImageBuffer::from_pixel(config.width, config.height, BACKGROUND);

    let x0 = MARGIN_LEFT;
    let x1 = config.width - MARGIN_RIGHT - 1;
    let y0 = MARGIN_TOP;
    let y1 = config.height - MARGIN_BOTTOM - 1;
    let plot_w = (x1 - x0) as f32;
    let plot_h = (y1 - y0) as f32;

    let freq_to_x = |f: f32| x0 + ((f / max_freq) * plot_w).round().clamp(0.0, plot_w) as u32;

    // Grid
    if config.grid_step_hz > 0.0 {
        let mut f = config.grid_step_hz;
        while f < max_freq {
            draw_vline(&mut img, freq_to_x(f), y0, y1, GRID);
            f += config.grid_step_hz;
        }
    }
    for quarter in 1..4 {
        let y = y1 - (plot_h * quarter as f32 / 4.0) as u32;
        draw_hline(&mut img, x0, x1, y, GRID);
    }

    // Peak-hold decimation: one magnitude per pixel column
    let peak = spectrum.peak_magnitude();
    let columns = (x1 - x0 + 1) as usize;
    let mut column_peaks: Vec<Option<f32>> = vec![None; columns];
    for (freq, mag) in spectrum.iter() {
        if freq > max_freq {
            break;
        }
        let col = (freq_to_x(freq) - x0) as usize;
        let slot = &mut column_peaks[col];
        *slot = Some(slot.map_or(mag, |m| m.max(mag)));
    }

    let mag_to_y = |m: f32| {
        let norm = if peak > 0.0 { m / peak } else { 0.0 };
        y1 - (norm.clamp(0.0, 1.0) * plot_h).round() as u32
    };

    let mut prev: Option<(u32, u32)> = None;
    for (col, value) in column_peaks.iter().enumerate() {
        if let Some(m) = value {
            let point = (x0 + col as u32, mag_to_y(*m));
            if let Some(p) = prev {
                draw_line(&mut img, p, point, TRACE);
            } else {
                img.put_pixel(point.0, point.1, TRACE);
            }
            prev = Some(point);
        }
    }

    // Axes
    draw_hline(&mut img, x0, x1, y1, AXIS);
    draw_vline(&mut img, x0, y0, y1, AXIS);

    // Pitch-class marker strip above the plot
    for (freq, pc) in note_markers(spectrum, config, max_freq) {
        let x = freq_to_x(freq);
        let color = pitch_class_color(pc);
        draw_vline(&mut img, x, y0 - 12, y0 - 1, color);
        for dx in 0..6u32 {
            for dy in 0..6u32 {
                let px = (x + dx).saturating_sub(3).min(config.width - 1);
                img.put_pixel(px, y0 - 24 + dy, color);
            }
        }
    }

    Ok(img)
}

/// Render and write the spectrum plot (format chosen from the extension)
pub fn save_spectrum_plot(spectrum: &Spectrum, config: &PlotConfig, output_path: &Path) -> Result<()> {
    let img = render_spectrum_plot(spectrum, config)?;
    img.save(output_path)
        .map_err(|e| KeyError::Plot(format!("{}: {}", output_path.display(), e)))?;
    log::info!("Plot saved as {}", output_path.display());
    Ok(())
}

/// Marker positions: audible bins at least `marker_spacing_hz` apart
fn note_markers(spectrum: &Spectrum, config: &PlotConfig, max_freq: f32) -> Vec<(f32, PitchClass)> {
    let mut markers: Vec<(f32, PitchClass)> = Vec::new();
    for &freq in spectrum.frequencies() {
        if !(20.0..=20000.0).contains(&freq) || freq > max_freq {
            continue;
        }
        let far_enough = markers
            .last()
            .map_or(true, |(last, _)| freq - last > config.marker_spacing_hz);
        if !far_enough {
            continue;
        }
        if let Some(pc) = PitchClass::from_frequency(freq, config.reference_frequency, RoundingMode::HalfEven) {
            markers.push((freq, pc));
        }
    }
    markers
}

/// Evenly spaced hues around the colour wheel, C = red
fn pitch_class_color(pc: PitchClass) -> Rgb<u8> {
    let h = pc.index() as f32 / 12.0 * 6.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Rgb([(r * 220.0) as u8, (g * 220.0) as u8, (b * 220.0) as u8])
}

fn draw_vline(img: &mut RgbImage, x: u32, y_start: u32, y_end: u32, color: Rgb<u8>) {
    for y in y_start..=y_end {
        img.put_pixel(x, y, color);
    }
}

fn draw_hline(img: &mut RgbImage, x_start: u32, x_end: u32, y: u32, color: Rgb<u8>) {
    for x in x_start..=x_end {
        img.put_pixel(x, y, color);
    }
}

/// Bresenham line between two in-bounds points
fn draw_line(img: &mut RgbImage, from: (u32, u32), to: (u32, u32), color: Rgb<u8>) {
    let (mut x, mut y) = (from.0 as i64, from.1 as i64);
    let (tx, ty) = (to.0 as i64, to.1 as i64);
    let dx = (tx - x).abs();
    let dy = -(ty - y).abs();
    let sx = if x < tx { 1 } else { -1 };
    let sy = if y < ty { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        img.put_pixel(x as u32, y as u32, color);
        if x == tx && y == ty {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
