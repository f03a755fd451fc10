// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{Args, DownmixArg};
pub use output::{format_json, format_report, format_scores, format_summary, print_report, JsonEntry};
