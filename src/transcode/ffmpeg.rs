//! ffmpeg/ffprobe backed transcoder.
//!
//! Shells out to the stock ffmpeg tools. Binary locations can be overridden
//! with the `LOOPCARD_FFMPEG_PATH` and `LOOPCARD_FFPROBE_PATH` environment
//! variables when the tools are not on PATH.

use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{LoopcardError, Result};
use crate::session::slots::ChannelLayout;
use crate::transcode::transcoder::{Transcoder, TARGET_SAMPLE_RATE};

/// Transcoder backed by the ffmpeg command line tools.
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        let ffmpeg_path =
            std::env::var("LOOPCARD_FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string());
        let ffprobe_path =
            std::env::var("LOOPCARD_FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string());

        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    fn run_tool(&self, program: &str, args: &[String], context: &Path) -> Result<Output> {
        debug!("Running {} {:?}", program, args);

        let output = Command::new(program).args(args).output().map_err(|e| {
            LoopcardError::TranscodeFailed {
                path: context.to_path_buf(),
                reason: format!("failed to launch {}: {}", program, e),
            }
        })?;

        if !output.status.success() {
            return Err(LoopcardError::TranscodeFailed {
                path: context.to_path_buf(),
                reason: stderr_tail(&output),
            });
        }

        Ok(output)
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcoder for FfmpegTranscoder {
    fn probe_duration(&self, path: &Path) -> Result<f64> {
        let args = probe_args(path);
        let output = self.run_tool(&self.ffprobe_path, &args, path)?;

        let text = String::from_utf8_lossy(&output.stdout);
        let trimmed = text.trim();
        trimmed
            .parse::<f64>()
            .map_err(|_| LoopcardError::TranscodeFailed {
                path: path.to_path_buf(),
                reason: format!("unparseable duration: {:?}", trimmed),
            })
    }

    fn transcode_to_mono(&self, input: &Path, output: &Path) -> Result<()> {
        let args = mono_args(input, output);
        self.run_tool(&self.ffmpeg_path, &args, input)?;
        Ok(())
    }

    fn write_silence(
        &self,
        output: &Path,
        duration_secs: f64,
        layout: ChannelLayout,
    ) -> Result<()> {
        let args = silence_args(output, duration_secs, layout);
        self.run_tool(&self.ffmpeg_path, &args, output)?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        let probe_ok = |program: &str| {
            Command::new(program)
                .arg("-version")
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        };
        probe_ok(&self.ffmpeg_path) && probe_ok(&self.ffprobe_path)
    }
}

/// Arguments for a duration probe: bare number on stdout, no wrappers.
fn probe_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "default=noprint_wrappers=1:nokey=1".to_string(),
        input.display().to_string(),
    ]
}

/// Arguments for synthesizing silence from the anullsrc source.
fn silence_args(output: &Path, duration_secs: f64, layout: ChannelLayout) -> Vec<String> {
    vec![
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        format!("anullsrc=r={}:cl={}", TARGET_SAMPLE_RATE, layout),
        "-t".to_string(),
        duration_secs.to_string(),
        output.display().to_string(),
    ]
}

/// Arguments for the mono down-mix of a source file.
fn mono_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.display().to_string(),
        "-ac".to_string(),
        "1".to_string(),
        output.display().to_string(),
    ]
}

fn stderr_tail(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr);
    text.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("tool exited with an error")
        .trim()
        .to_string()
}
