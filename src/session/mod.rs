//! Song Session Module
//!
//! Provides slot assignment, tempo and registry files, song folder
//! assembly, and track swapping.

pub mod registry;
pub mod slots;
pub mod swap;
pub mod tempo;
pub mod writer;

pub use registry::{SongRegistry, REGISTRY_FILE};
pub use slots::{allocate, ChannelLayout, Slot, SlotPlan, MONO_SLOT_COUNT};
pub use swap::swap_tracks;
pub use tempo::{TempoRecord, DEFAULT_TEMPO_BPM, TEMPO_FILE};
pub use writer::SessionWriter;
