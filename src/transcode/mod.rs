//! Transcoder gateway to the external audio tool.
//!
//! The session writer only consumes the [`Transcoder`] trait; the ffmpeg
//! implementation is the production gateway and the mock keeps tests
//! independent of installed tools.

pub mod ffmpeg;
pub mod mock;
pub mod transcoder;

pub use ffmpeg::FfmpegTranscoder;
pub use mock::MockTranscoder;
pub use transcoder::{Transcoder, TARGET_SAMPLE_RATE};
