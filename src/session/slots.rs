//! Slot model and allocation policy.
//!
//! A song folder always exposes five mono slots (`TRACK1.wav`..`TRACK5.wav`)
//! and one stereo master slot (`TRACKM.wav`). The allocator decides which
//! mono slots are filled from real sources and which are padded with
//! silence, given only the number of sources supplied.

use crate::error::{LoopcardError, Result};

/// Number of mono slots per song folder.
pub const MONO_SLOT_COUNT: usize = 5;

/// One fixed position in a song folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Mono track slot, numbered 1..=5.
    Mono(u8),
    /// Stereo master slot.
    Master,
}

impl Slot {
    /// File name this slot occupies inside the song folder.
    pub fn file_name(&self) -> String {
        match self {
            Slot::Mono(n) => format!("TRACK{}.wav", n),
            Slot::Master => "TRACKM.wav".to_string(),
        }
    }

    /// Registry key for this slot. The master slot is never registered,
    /// it has no original source name.
    pub fn registry_key(&self) -> Option<String> {
        match self {
            Slot::Mono(n) => Some(format!("TRACK{}", n)),
            Slot::Master => None,
        }
    }
}

/// Channel layout of a produced WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    pub fn channel_count(&self) -> u16 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }
}

impl std::fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelLayout::Mono => write!(f, "mono"),
            ChannelLayout::Stereo => write!(f, "stereo"),
        }
    }
}

/// The allocator's plan for one song folder.
///
/// Source slots and silence slots partition {1..5}; the silence duration
/// is decided later from the first source's probed duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPlan {
    /// Mono slot numbers to fill from sources, in source order.
    pub source_slots: Vec<u8>,
    /// Mono slot numbers to pad with silence, ascending.
    pub silence_slots: Vec<u8>,
    /// Whether a stereo master is produced. Absent only when all five
    /// mono slots are filled from real sources.
    pub wants_master: bool,
}

/// Compute the slot plan for `source_count` source files.
///
/// Sources occupy slots 1..=N in order; slots N+1..=5 are silence-padded.
/// Counts outside 1..=5 fail with `InvalidInputCount`.
pub fn allocate(source_count: usize) -> Result<SlotPlan> {
    if source_count == 0 || source_count > MONO_SLOT_COUNT {
        return Err(LoopcardError::InvalidInputCount {
            count: source_count,
        });
    }

    let last_source = source_count as u8;
    let source_slots: Vec<u8> = (1..=last_source).collect();
    let silence_slots: Vec<u8> = (last_source + 1..=MONO_SLOT_COUNT as u8).collect();

    Ok(SlotPlan {
        source_slots,
        silence_slots,
        wants_master: source_count < MONO_SLOT_COUNT,
    })
}
