#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use uuid::Uuid;

use audiokey::testgen::{generate_scale, write_wav, SynthConfig};
use audiokey::{Mode, PitchClass};

pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_audiokey"))
}

pub fn run_audiokey<P: AsRef<std::ffi::OsStr>>(file_path: P) -> Command {
    let mut cmd = Command::new(get_binary_path());
    cmd.arg(file_path);
    // Keep stderr free of library debug logs
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("AUDIOKEY_CONFIG");
    cmd
}

pub fn run_json_analysis<P: AsRef<std::ffi::OsStr>>(file_path: P) -> std::process::Output {
    run_audiokey(file_path)
        .arg("--json")
        .output()
        .expect("Failed to execute with --json")
}

/// Scratch directory removed on drop
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let path = std::env::temp_dir().join(format!("audiokey_{}_{}", prefix, Uuid::new_v4()));
        fs::create_dir_all(&path).expect("Failed to create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Write a rising scale to `dir` and return its path
pub fn write_scale(dir: &Path, tonic: PitchClass, mode: Mode) -> PathBuf {
    let config = SynthConfig::default();
    let samples = generate_scale(tonic, mode, &config);
    let path = dir.join(audiokey::testgen::scale_file_name(tonic, mode));
    write_wav(&path, &samples, config.sample_rate).expect("Failed to write scale");
    path
}

/// Write arbitrary mono samples to `dir/name`
pub fn write_samples(dir: &Path, name: &str, samples: &[f32], sample_rate: u32) -> PathBuf {
    let path = dir.join(name);
    write_wav(&path, samples, sample_rate).expect("Failed to write samples");
    path
}

/// Interleaved stereo WAV, one slice per channel
pub fn write_stereo(dir: &Path, name: &str, left: &[f32], right: &[f32], sample_rate: u32) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create stereo WAV");
    for (l, r) in left.iter().zip(right.iter()) {
        writer.write_sample((l * i16::MAX as f32) as i16).unwrap();
        writer.write_sample((r * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
