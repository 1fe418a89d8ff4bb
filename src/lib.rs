//! Loopcard - Song Folder Tool for Hardware Loopers
//!
//! Loopcard turns a handful of wav files into the fixed folder layout a
//! hardware looper expects on its card:
//! - TRACK1.wav through TRACK5.wav: the five mono 44.1 kHz track slots
//! - TRACKM.wav: a stereo master, present only while a slot is unfilled
//! - TEMPO.txt: device playback settings
//! - NAME.json: registry mapping each slot to its original file name
//!
//! # Operations
//!
//! Beyond building folders, the crate swaps two tracks in place while
//! keeping the registry consistent with the files on disk, inspects a
//! whole card grouped by song, and upgrades registries written in the
//! legacy list format.

pub mod cli;
pub mod error;
pub mod inspect;
pub mod session;
pub mod transcode;

pub use error::{LoopcardError, Result};
