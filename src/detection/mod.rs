//! Detection result types

mod result;

pub use result::{DetectionResult, KeyDetection, MatchScore};
