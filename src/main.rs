// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use audiokey::cli::{format_json, format_summary, print_report, Args, JsonEntry};
use audiokey::core::decoder::is_audio_file;
use audiokey::{AnalysisReport, DetectorConfig, KeyAnalyzer};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if !args.input.exists() {
        eprintln!("Error: '{}' not found.", args.input.display());
        std::process::exit(1);
    }

    let config = args.detector_config()?;

    if args.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let audio_files = collect_audio_files(&args.input)?;

    if audio_files.is_empty() {
        println!("{}", "No audio files found!".red());
        return Ok(());
    }

    let batch = args.input.is_dir();
    let results = if batch {
        analyze_batch(&audio_files, &config, &args)
    } else {
        audio_files
            .iter()
            .map(|path| (path.clone(), process_file(path, &config, &args, None)))
            .collect()
    };

    if args.json {
        let entries: Vec<JsonEntry<'_>> = results
            .iter()
            .map(|(file, result)| JsonEntry {
                file: file.clone(),
                report: result.as_ref().ok(),
                error: result.as_ref().err().map(|e| format!("{:#}", e)),
            })
            .collect();
        println!("{}", format_json(&entries)?);
    } else {
        let mut reports = Vec::new();
        let mut failures = 0;
        for (file, result) in &results {
            match result {
                Ok(report) => {
                    print_report(report, args.show_scores, args.verbose);
                    reports.push(report);
                }
                Err(e) => {
                    failures += 1;
                    eprintln!("{} {}: {:#}", "Error:".red(), file.display(), e);
                }
            }
            if batch {
                println!();
            }
        }
        if batch {
            print!("{}", format_summary(&reports, failures));
        }
    }

    // A single failing file is a failed run; the error was already reported
    if !batch && results.iter().any(|(_, result)| result.is_err()) {
        std::process::exit(1);
    }

    Ok(())
}

fn collect_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        // An explicitly named file is always attempted; the decoder decides
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        for entry in WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_audio_file(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    Ok(files)
}

fn analyze_batch(
    files: &[PathBuf],
    config: &DetectorConfig,
    args: &Args,
) -> Vec<(PathBuf, Result<AnalysisReport>)> {
    let pb = ProgressBar::new(files.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {wide_msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    if args.json {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let results = files
        .par_iter()
        .enumerate()
        .progress_with(pb.clone())
        .map(|(index, path)| (path.clone(), process_file(path, config, args, Some(index))))
        .collect();

    pb.finish_and_clear();
    results
}

fn process_file(
    file_path: &Path,
    config: &DetectorConfig,
    args: &Args,
    batch_index: Option<usize>,
) -> Result<AnalysisReport> {
    let analyzer = KeyAnalyzer::with_config(file_path, config.clone())
        .with_context(|| format!("Failed to load {}", file_path.display()))?;
    let report = analyzer
        .analyze()
        .with_context(|| format!("Failed to analyze {}", file_path.display()))?;

    if let Some(plot_path) = args.plot_path_for(file_path, batch_index) {
        analyzer
            .generate_plot(&report, &plot_path)
            .with_context(|| format!("Failed to write plot {}", plot_path.display()))?;
    }

    Ok(report)
}
