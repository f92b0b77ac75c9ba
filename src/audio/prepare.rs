//! Audio preparation: decode the caller's reference into a canonical form.
//!
//! Every pipeline invocation gets its own 16kHz mono copy of the input,
//! written to a uniquely named temporary file that is removed when the
//! invocation ends, whatever the outcome. A missing reference is replaced by
//! a synthesized placeholder tone so the pipeline stays exercisable without
//! real recordings.

use crate::audio::decode;
use crate::defaults::{
    PLACEHOLDER_AMPLITUDE, PLACEHOLDER_FREQ_HZ, PLACEHOLDER_SECS, SAMPLE_RATE,
};
use crate::error::Result;
use std::path::Path;
use tempfile::TempPath;

/// Decoded 16kHz mono audio together with its backing temporary file.
///
/// The temporary file is owned exclusively by one pipeline invocation and is
/// removed exactly once: explicitly via [`PreparedAudio::close`], or by drop
/// if an error unwinds past the owner first.
pub struct PreparedAudio {
    samples: Vec<i16>,
    sample_rate: u32,
    temp: TempPath,
}

impl PreparedAudio {
    /// Decoded samples, mono at [`SAMPLE_RATE`].
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Location of the backing temporary WAV file.
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Audio duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Remove the backing temporary file, reporting any failure.
    ///
    /// Dropping a `PreparedAudio` also removes the file, but silently; this
    /// explicit form lets the caller surface a cleanup failure without it
    /// masking an in-flight error.
    pub fn close(self) -> std::io::Result<()> {
        self.temp.close()
    }
}

impl std::fmt::Debug for PreparedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedAudio")
            .field("samples", &self.samples.len())
            .field("sample_rate", &self.sample_rate)
            .field("temp", &self.temp.display().to_string())
            .finish()
    }
}

/// Normalizes an arbitrary audio reference into [`PreparedAudio`].
#[derive(Debug, Clone, Default)]
pub struct AudioPreparer {
    quiet: bool,
    temp_dir: Option<std::path::PathBuf>,
}

impl AudioPreparer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress status messages.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Place temporary files in a specific directory instead of the system
    /// default (useful for tests that assert on cleanup).
    pub fn with_temp_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Prepare the referenced audio for the pipeline.
    ///
    /// A reference that does not exist is replaced by a deterministic
    /// placeholder tone, persisted at the requested location so repeated
    /// runs see the same input. Decode errors on an existing file propagate.
    pub fn prepare(&self, reference: &Path) -> Result<PreparedAudio> {
        let samples = if reference.exists() {
            let samples = decode::read_wav(reference)?;
            if !self.quiet {
                eprintln!(
                    "tartil: loaded audio '{}' ({} samples at {} Hz)",
                    reference.display(),
                    samples.len(),
                    SAMPLE_RATE
                );
            }
            samples
        } else {
            if !self.quiet {
                eprintln!(
                    "tartil: audio '{}' not found, generating a {} Hz placeholder tone",
                    reference.display(),
                    PLACEHOLDER_FREQ_HZ
                );
            }
            let tone = placeholder_tone();
            decode::write_wav(reference, &tone, SAMPLE_RATE)?;
            tone
        };

        // Re-write the decoded buffer to a dedicated temporary location so
        // downstream stages are decoupled from the original format and rate.
        let mut builder = tempfile::Builder::new();
        builder.prefix("tartil-16k-").suffix(".wav");
        let temp_file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let temp = temp_file.into_temp_path();
        decode::write_wav(&temp, &samples, SAMPLE_RATE)?;

        if !self.quiet {
            eprintln!("tartil: temporary 16kHz audio written to '{}'", temp.display());
        }

        Ok(PreparedAudio {
            samples,
            sample_rate: SAMPLE_RATE,
            temp,
        })
    }
}

/// Deterministic placeholder: a 2-second 440 Hz sine wave at 16kHz.
pub fn placeholder_tone() -> Vec<i16> {
    sine_wave(PLACEHOLDER_FREQ_HZ, PLACEHOLDER_SECS, SAMPLE_RATE)
}

/// Generate a sine wave at the given frequency, duration and rate.
pub fn sine_wave(freq_hz: f32, duration_secs: u32, sample_rate: u32) -> Vec<i16> {
    let total = (sample_rate * duration_secs) as usize;
    let scale = PLACEHOLDER_AMPLITUDE * i16::MAX as f32;
    (0..total)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (scale * (2.0 * std::f32::consts::PI * freq_hz * t).sin()) as i16
        })
        .collect()
}
