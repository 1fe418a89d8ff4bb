//! Mock transcoder for pipeline testing without external tools.
//!
//! Unlike the ffmpeg gateway this writes real WAV files itself (via hound),
//! so the whole session pipeline can run and be inspected in tests.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{LoopcardError, Result};
use crate::session::slots::ChannelLayout;
use crate::transcode::transcoder::{Transcoder, TARGET_SAMPLE_RATE};

/// Transcoder that synthesizes output instead of calling external tools.
///
/// Down-mixing averages channels. No resampling is performed; inputs are
/// expected at the target rate already.
pub struct MockTranscoder {
    /// Output file name that triggers an injected failure.
    fail_on: Option<String>,
}

impl MockTranscoder {
    pub fn new() -> Self {
        Self { fail_on: None }
    }

    /// Fail any operation whose output file name equals `name`.
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
        }
    }

    fn check_injected_failure(&self, output: &Path) -> Result<()> {
        if let Some(fail_on) = &self.fail_on {
            let name = output.file_name().unwrap_or_default().to_string_lossy();
            if name == fail_on.as_str() {
                return Err(LoopcardError::TranscodeFailed {
                    path: output.to_path_buf(),
                    reason: "injected failure".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcoder for MockTranscoder {
    fn probe_duration(&self, path: &Path) -> Result<f64> {
        let reader = WavReader::open(path).map_err(|e| wav_error(path, e))?;
        let spec = reader.spec();
        Ok(f64::from(reader.duration()) / f64::from(spec.sample_rate))
    }

    fn transcode_to_mono(&self, input: &Path, output: &Path) -> Result<()> {
        self.check_injected_failure(output)?;

        let (samples, channels, sample_rate) = read_samples(input)?;
        let channels = channels.max(1) as usize;

        let mono: Vec<f32> = samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        write_wav(output, &mono, 1, sample_rate)
    }

    fn write_silence(
        &self,
        output: &Path,
        duration_secs: f64,
        layout: ChannelLayout,
    ) -> Result<()> {
        self.check_injected_failure(output)?;

        let frames = (duration_secs * f64::from(TARGET_SAMPLE_RATE)).round() as usize;
        let samples = vec![0.0_f32; frames * layout.channel_count() as usize];
        write_wav(output, &samples, layout.channel_count(), TARGET_SAMPLE_RATE)
    }
}

fn wav_error(path: &Path, error: hound::Error) -> LoopcardError {
    LoopcardError::TranscodeFailed {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

fn read_samples(path: &Path) -> Result<(Vec<f32>, u16, u32)> {
    let reader = WavReader::open(path).map_err(|e| wav_error(path, e))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map_err(|e| wav_error(path, e)))
            .collect::<Result<Vec<f32>>>()?,
        SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    s.map(|v| v as f32 / max_val)
                        .map_err(|e| wav_error(path, e))
                })
                .collect::<Result<Vec<f32>>>()?
        }
    };

    Ok((samples, spec.channels, spec.sample_rate))
}

fn write_wav(path: &Path, samples: &[f32], channels: u16, sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| wav_error(path, e))?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * f32::from(i16::MAX)) as i16;
        writer.write_sample(value).map_err(|e| wav_error(path, e))?;
    }
    writer.finalize().map_err(|e| wav_error(path, e))
}
