//! Visualization tools for key analysis
//!
//! Renders the averaged magnitude spectrum with pitch-class markers.

mod spectrum_plot;

pub use spectrum_plot::{render_spectrum_plot, save_spectrum_plot, PlotConfig};
