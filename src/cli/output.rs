//! Output formatting for CLI results

use colorful::Colorful;
use serde::Serialize;
use std::path::PathBuf;

use crate::core::AnalysisReport;
use crate::detection::KeyDetection;

/// Score table, best candidate first
pub fn format_scores(report: &AnalysisReport) -> String {
    let mut output = String::from("\nScores for all keys and modes:\n");
    for score in &report.scores {
        output.push_str(&score.table_row());
        output.push('\n');
    }
    output
}

/// Plain result block: optional score table, then the headline
pub fn format_report(report: &AnalysisReport, show_scores: bool) -> String {
    let mut output = String::new();
    if show_scores {
        output.push_str(&format_scores(report));
    }
    output.push('\n');
    output.push_str(&report.headline);
    output.push('\n');
    output
}

/// Coloured result block for terminal output
pub fn print_report(report: &AnalysisReport, show_scores: bool, verbose: bool) {
    if let Some(source) = &report.source {
        println!("Analyzing: {}", source.display().to_string().as_str().cyan());
    }
    if verbose {
        println!("  Sample Rate: {} Hz", report.sample_rate);
        println!("  Duration: {:.2}s", report.duration_secs);
        let profile: Vec<String> = report
            .profile
            .iter()
            .map(|(pc, v)| format!("{}={:.3}", pc, v))
            .collect();
        println!("  Pitch classes: {}", profile.join(" "));
        if let Some(tonic) = report.detection.tonic() {
            println!("  Tonic {} energy: {:.3}", tonic, report.profile.get(tonic));
        }
    }
    if show_scores {
        print!("{}", format_scores(report));
    }

    let headline = report.headline.as_str();
    match report.detection {
        KeyDetection::Key { .. } => println!("\n{}", headline.green().bold()),
        KeyDetection::SingleTone { .. } => println!("\n{}", headline.yellow().bold()),
        KeyDetection::Undetected => println!("\n{}", headline.dim()),
    }
}

/// One JSON entry per analysed file
#[derive(Debug, Serialize)]
pub struct JsonEntry<'a> {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Format analysis results as a pretty-printed JSON array
pub fn format_json(entries: &[JsonEntry<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Summary counts for a batch
pub fn format_summary(reports: &[&AnalysisReport], failures: usize) -> String {
    let keys = reports
        .iter()
        .filter(|r| r.detection.mode().is_some())
        .count();
    let tones = reports
        .iter()
        .filter(|r| matches!(r.detection, KeyDetection::SingleTone { .. }))
        .count();
    let undetected = reports
        .iter()
        .filter(|r| r.detection == KeyDetection::Undetected)
        .count();

    let mut output = String::from("\nSummary:\n");
    output.push_str(&format!("  {} files analyzed\n", reports.len() + failures));
    if keys > 0 {
        output.push_str(&format!("  {} key/mode detected\n", keys));
    }
    if tones > 0 {
        output.push_str(&format!("  {} single tone\n", tones));
    }
    if undetected > 0 {
        output.push_str(&format!("  {} undetected\n", undetected));
    }
    if failures > 0 {
        output.push_str(&format!("  {} failed\n", failures));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::core::{analyze_samples, Mode, PitchClass};
    use crate::testgen::{generate_scale, SynthConfig};

    fn silent_report() -> AnalysisReport {
        analyze_samples(&vec![0.0; 10000], 8000, &DetectorConfig::default()).unwrap()
    }

    #[test]
    fn test_report_ends_with_headline() {
        let report = silent_report();
        let text = format_report(&report, false);
        assert_eq!(text.trim(), "Detected Key: Undetected");
    }

    #[test]
    fn test_scores_table_lists_all_candidates() {
        let report = silent_report();
        let text = format_report(&report, true);
        assert!(text.starts_with("\nScores for all keys and modes:\n"));
        let rows = text.lines().filter(|l| l.contains(" - Score: ")).count();
        assert_eq!(rows, 108);
        assert!(text.contains("Key: C Major - Score: 0.0000"));
        assert!(text.contains("Mode: B Locrian - Score: 0.0000"));
    }

    #[test]
    fn test_json_entries() {
        let report = silent_report();
        let entries = vec![
            JsonEntry {
                file: PathBuf::from("a.wav"),
                report: Some(&report),
                error: None,
            },
            JsonEntry {
                file: PathBuf::from("b.mp3"),
                report: None,
                error: Some("Decoding error".to_string()),
            },
        ];
        let json = format_json(&entries).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["report"]["headline"], "Detected Key: Undetected");
        assert_eq!(value[1]["error"], "Decoding error");
        assert!(value[1].get("report").is_none());
    }

    #[test]
    fn test_summary_counts() {
        let silent = silent_report();
        let samples = generate_scale(PitchClass::G, Mode::Major, &SynthConfig::default());
        let key = analyze_samples(&samples, 44100, &DetectorConfig::default()).unwrap();

        let summary = format_summary(&[&silent, &key], 2);
        assert!(summary.contains("4 files analyzed"));
        assert!(summary.contains("1 key/mode detected"));
        assert!(summary.contains("1 undetected"));
        assert!(summary.contains("2 failed"));
        assert!(!summary.contains("single tone"));
    }
}
