//! CLI argument parsing

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::DetectorConfig;
use crate::core::Downmix;

/// Channel reduction choices exposed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DownmixArg {
    /// Analyse the first channel only
    First,
    /// Average all channels
    Average,
}

impl From<DownmixArg> for Downmix {
    fn from(arg: DownmixArg) -> Self {
        match arg {
            DownmixArg::First => Downmix::FirstChannel,
            DownmixArg::Average => Downmix::Average,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "audiokey")]
#[command(version, about = "Detect the musical key or mode of an audio file")]
pub struct Args {
    /// Input audio file (WAV, FLAC, MP3, OGG, ...) or a directory of them
    pub input: PathBuf,

    /// Save the FFT magnitude plot to this PNG path
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Print all key and mode scores sorted by score
    #[arg(long)]
    pub show_scores: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Detector configuration file (JSON)
    #[arg(short, long, env = "AUDIOKEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// How multichannel files are reduced to mono
    #[arg(long, value_enum)]
    pub downmix: Option<DownmixArg>,

    /// Always resolve a scale, even when one pitch dominates
    #[arg(long)]
    pub no_single_tone: bool,

    /// Worker threads for directory input (0 = one per core)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jobs: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Detector configuration: file (if any) overlaid with command-line flags
    pub fn detector_config(&self) -> Result<DetectorConfig> {
        let mut config = match &self.config {
            Some(path) => DetectorConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => DetectorConfig::default(),
        };

        if let Some(downmix) = self.downmix {
            config.downmix = downmix.into();
        }
        if self.no_single_tone {
            config.single_tone_threshold = None;
        }

        config.validate().context("Invalid detector configuration")?;
        Ok(config)
    }

    /// Plot destination for one input file.
    ///
    /// With a single input the `--plot` path is used as given. In a batch,
    /// `batch_index` is the file's position in the sorted batch; it and the
    /// file's path below the input directory are appended to the plot stem,
    /// so `a/x.wav` and `b/x.wav` get separate plots.
    pub fn plot_path_for(&self, input: &Path, batch_index: Option<usize>) -> Option<PathBuf> {
        let base = self.plot.as_ref()?;
        let Some(index) = batch_index else {
            return Some(base.clone());
        };
        let stem = base
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("plot");
        let ext = base.extension().and_then(|e| e.to_str()).unwrap_or("png");

        let relative = input.strip_prefix(&self.input).unwrap_or(input);
        let label: Vec<String> = relative
            .iter()
            .map(|part| part.to_string_lossy().replace('.', "_"))
            .collect();
        Some(base.with_file_name(format!(
            "{}_{:03}_{}.{}",
            stem,
            index,
            label.join("_"),
            ext
        )))
    }
}
