//! Configuration module for audiokey

mod detector_config;

pub use detector_config::{DetectorConfig, DetectorConfigBuilder};
