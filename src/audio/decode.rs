//! WAV decode and encode helpers.
//!
//! Supports arbitrary sample rates and channel counts on input, downmixing
//! and resampling everything to 16kHz mono 16-bit PCM.

use crate::defaults::SAMPLE_RATE;
use crate::error::{Result, TartilError};
use std::io::{Cursor, Read};
use std::path::Path;

/// Decode a WAV file into mono samples at the target rate.
pub fn read_wav(path: &Path) -> Result<Vec<i16>> {
    let reader = hound::WavReader::open(path).map_err(|e| TartilError::AudioDecode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    decode_reader(reader, path)
}

/// Decode WAV data from any reader (for testing/flexibility).
pub fn read_wav_from(reader: impl Read, origin: &Path) -> Result<Vec<i16>> {
    let reader = hound::WavReader::new(reader).map_err(|e| TartilError::AudioDecode {
        path: origin.display().to_string(),
        message: e.to_string(),
    })?;
    decode_reader(reader, origin)
}

fn decode_reader<R: Read>(mut reader: hound::WavReader<R>, origin: &Path) -> Result<Vec<i16>> {
    let spec = reader.spec();
    let source_rate = spec.sample_rate;
    let source_channels = spec.channels;

    let raw_samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| TartilError::AudioDecode {
            path: origin.display().to_string(),
            message: e.to_string(),
        })?;

    // Average all channels down to mono
    let mono_samples = if source_channels > 1 {
        raw_samples
            .chunks_exact(source_channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / source_channels as i32) as i16
            })
            .collect()
    } else {
        raw_samples
    };

    // Resample to the target rate if needed
    let samples = if source_rate != SAMPLE_RATE {
        resample(&mono_samples, source_rate, SAMPLE_RATE)
    } else {
        mono_samples
    };

    Ok(samples)
}

/// Write mono samples to a WAV file at the given rate.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| TartilError::AudioWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| TartilError::AudioWrite {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
    }
    writer.finalize().map_err(|e| TartilError::AudioWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Encode mono samples as in-memory WAV bytes for API payloads.
pub fn wav_bytes(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| TartilError::AudioWrite {
                path: "<memory>".to_string(),
                message: e.to_string(),
            })?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| TartilError::AudioWrite {
                    path: "<memory>".to_string(),
                    message: e.to_string(),
                })?;
        }
        writer.finalize().map_err(|e| TartilError::AudioWrite {
            path: "<memory>".to_string(),
            message: e.to_string(),
        })?;
    }
    Ok(cursor.into_inner())
}

/// Simple linear interpolation resampling.
pub(crate) fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
