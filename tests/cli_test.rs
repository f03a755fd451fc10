// tests/cli_test.rs
//
// Command-line behaviour against generated WAV files.

mod test_utils;

use audiokey::{Mode, PitchClass};
use test_utils::*;

#[test]
fn test_headline_is_printed() {
    let dir = TempDir::new("cli_headline");
    let path = write_scale(dir.path(), PitchClass::C, Mode::Major);

    let output = run_audiokey(&path).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Detected Key: C Major"));
    assert!(!stdout_of(&output).contains("Score:"));
}

#[test]
fn test_show_scores_lists_every_candidate() {
    let dir = TempDir::new("cli_scores");
    let path = write_scale(dir.path(), PitchClass::C, Mode::NaturalMinor);

    let output = run_audiokey(&path).arg("--show-scores").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Scores for all keys and modes:"));
    assert_eq!(stdout.lines().filter(|l| l.contains(" - Score: ")).count(), 108);
    assert!(stdout.contains("Key: C Natural Minor - Score: "));
    assert!(stdout.contains("Mode: D# Lydian - Score: "));

    // Table precedes the headline
    let table = stdout.find("Scores for all keys and modes:").unwrap();
    let headline = stdout.find("Detected Key: C Natural Minor").unwrap();
    assert!(table < headline);
}

#[test]
fn test_json_output() {
    let dir = TempDir::new("cli_json");
    let path = write_scale(dir.path(), PitchClass::D, Mode::Dorian);

    let output = run_json_analysis(&path);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &value[0]["report"];
    assert_eq!(report["headline"], "Detected Key: D Dorian");
    assert_eq!(report["detection"]["kind"], "key");
    assert_eq!(report["detection"]["tonic"], "D");
    assert_eq!(report["scores"].as_array().map(|a| a.len()), Some(108));
}

#[test]
fn test_plot_flag_writes_png() {
    let dir = TempDir::new("cli_plot");
    let path = write_scale(dir.path(), PitchClass::C, Mode::Major);
    let plot = dir.join("fft.png");

    let output = run_audiokey(&path).arg("--plot").arg(&plot).output().unwrap();
    assert!(output.status.success());
    assert!(plot.exists());
}

#[test]
fn test_directory_batch() {
    let dir = TempDir::new("cli_batch");
    write_scale(dir.path(), PitchClass::C, Mode::Major);
    write_scale(dir.path(), PitchClass::C, Mode::NaturalMinor);
    std::fs::write(dir.join("readme.txt"), "ignored").unwrap();

    let output = run_audiokey(dir.path()).arg("-j").arg("2").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Detected Key: C Major"));
    assert!(stdout.contains("Detected Key: C Natural Minor"));
    assert!(stdout.contains("2 files analyzed"));
}

#[test]
fn test_batch_plots_do_not_collide() {
    let dir = TempDir::new("cli_batch_plots");
    let first = dir.join("a");
    let second = dir.join("b");
    std::fs::create_dir_all(&first).unwrap();
    std::fs::create_dir_all(&second).unwrap();
    // Same file name in both folders
    write_scale(&first, PitchClass::C, Mode::Major);
    write_scale(&second, PitchClass::C, Mode::Major);

    let plots = TempDir::new("cli_batch_plots_out");
    let output = run_audiokey(dir.path())
        .arg("--plot")
        .arg(plots.join("spectrum.png"))
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let written = std::fs::read_dir(plots.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
        .count();
    assert_eq!(written, 2);
}

#[test]
fn test_missing_input() {
    let output = run_audiokey("/nonexistent/audiokey_input.wav").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("not found"));
}

#[test]
fn test_undecodable_file_fails() {
    let dir = TempDir::new("cli_bad");
    let path = dir.join("broken.wav");
    std::fs::write(&path, "definitely not RIFF").unwrap();

    let output = run_audiokey(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Decoding error"));
}

#[test]
fn test_silent_file() {
    let dir = TempDir::new("cli_silent");
    let path = write_samples(dir.path(), "silence.wav", &vec![0.0; 44100], 44100);

    let output = run_audiokey(&path).output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Detected Key: Undetected"));
}

#[test]
fn test_no_single_tone_flag() {
    let dir = TempDir::new("cli_tone");
    let config = audiokey::testgen::SynthConfig {
        note_duration: 2.0,
        ..Default::default()
    };
    let samples = audiokey::testgen::generate_tone(440.0, &config);
    let path = write_samples(dir.path(), "a440.wav", &samples, 44100);

    let output = run_audiokey(&path).output().unwrap();
    assert!(stdout_of(&output).contains("Detected Key: A (Single Tone)"));

    let output = run_audiokey(&path).arg("--no-single-tone").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Detected Key: "));
    assert!(!stdout.contains("(Single Tone)"));
}

#[test]
fn test_config_file() {
    let dir = TempDir::new("cli_config");
    let path = write_scale(dir.path(), PitchClass::C, Mode::Major);
    let config_path = dir.join("detector.json");
    std::fs::write(&config_path, r#"{ "frame_size": 8192, "hop_size": 4096 }"#).unwrap();

    let output = run_audiokey(&path)
        .arg("--config")
        .arg(&config_path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Detected Key: C Major"));

    std::fs::write(&config_path, r#"{ "hop_size": 0 }"#).unwrap();
    let output = run_audiokey(&path)
        .arg("--config")
        .arg(&config_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
}
