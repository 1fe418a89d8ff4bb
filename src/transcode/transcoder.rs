//! Transcoder trait and target format constants.
//!
//! Defines the interface to the external audio tool the session writer
//! drives. The core never touches sample data itself.

use std::path::Path;

use crate::error::Result;
use crate::session::slots::ChannelLayout;

/// Sample rate of every WAV file produced for the device.
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

/// Gateway to the external audio tool.
///
/// Implementations must write WAV files at [`TARGET_SAMPLE_RATE`].
pub trait Transcoder: Send + Sync {
    /// Probe the duration of an audio file in seconds.
    fn probe_duration(&self, path: &Path) -> Result<f64>;

    /// Convert a source file to a mono WAV at `output`.
    fn transcode_to_mono(&self, input: &Path, output: &Path) -> Result<()>;

    /// Synthesize a silent WAV of `duration_secs` at `output`.
    fn write_silence(
        &self,
        output: &Path,
        duration_secs: f64,
        layout: ChannelLayout,
    ) -> Result<()>;

    /// Check if the tool is ready to use.
    fn is_available(&self) -> bool {
        true
    }
}
