// src/core/decoder.rs
//
// Audio decoding into a mono analysis signal.
// Uses Symphonia for format-agnostic decoding (WAV, FLAC, MP3, OGG, AAC, AIFF).

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::analysis::Signal;
use super::dsp::normalize_peak;
use crate::error::{KeyError, Result};

/// File extensions the loader will pick up when walking directories
pub const AUDIO_EXTENSIONS: [&str; 8] = ["wav", "flac", "mp3", "ogg", "m4a", "aac", "aiff", "aif"];

/// How multichannel audio is reduced to mono
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Downmix {
    /// Keep only the first channel
    FirstChannel,
    /// Average all channels
    Average,
}

impl Default for Downmix {
    fn default() -> Self {
        Self::FirstChannel
    }
}

/// Container for decoded audio data and metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: usize,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Original codec name
    pub codec_name: String,
}

/// True when the path has one of the supported audio extensions
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode audio file to floating-point samples
pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = File::open(path)?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts = MetadataOptions::default();
    let fmt_opts = FormatOptions::default();

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| {
            KeyError::Decode(format!(
                "{}: unsupported or corrupt container ({})",
                path.display(),
                e
            ))
        })?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| KeyError::Decode(format!("{}: no supported audio track", path.display())))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| KeyError::Decode(format!("{}: sample rate not specified", path.display())))?;

    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    if channels == 0 {
        return Err(KeyError::Decode(format!("{}: reports 0 audio channels", path.display())));
    }

    let codec_name = symphonia::default::get_codecs()
        .get_codec(track.codec_params.codec)
        .map(|d| d.short_name.to_string())
        .unwrap_or_else(|| format!("{:?}", track.codec_params.codec));

    let dec_opts = DecoderOptions::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| KeyError::Decode(format!("{}: {}", path.display(), e)))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(KeyError::Decode(format!("{}: {}", path.display(), e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(KeyError::Decode(format!("{}: {}", path.display(), e))),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() {
        return Err(KeyError::Decode(format!(
            "{}: no audio samples decoded",
            path.display()
        )));
    }

    let duration_secs = samples.len() as f64 / (sample_rate as f64 * channels as f64);

    log::debug!(
        "Decoded {}: {} Hz, {} channel(s), {:.2}s, codec {}",
        path.display(),
        sample_rate,
        channels,
        duration_secs,
        codec_name
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
        duration_secs,
        codec_name,
    })
}

/// Reduce interleaved audio to a single channel
pub fn extract_mono(audio: &AudioData, downmix: Downmix) -> Vec<f32> {
    if audio.channels == 1 {
        return audio.samples.clone();
    }

    let frames = audio.samples.chunks_exact(audio.channels);
    match downmix {
        Downmix::FirstChannel => frames.map(|frame| frame[0]).collect(),
        Downmix::Average => frames
            .map(|frame| frame.iter().sum::<f32>() / audio.channels as f32)
            .collect(),
    }
}

/// Build a peak-normalized mono signal ready for analysis
pub fn to_signal(audio: &AudioData, downmix: Downmix) -> Result<Signal> {
    let mut mono = extract_mono(audio, downmix);
    normalize_peak(&mut mono);
    Signal::new(mono, audio.sample_rate)
}
