//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::error::{LoopcardError, Result};
use crate::inspect::{render_song_table, scan_card, song_names};
use crate::session::registry::SongRegistry;
use crate::session::swap::swap_tracks;
use crate::session::writer::SessionWriter;
use crate::transcode::{FfmpegTranscoder, Transcoder};

/// Build a song folder from a folder of wav files.
pub fn create(source_dir: &Path, dest_dir: &Path, song_name: &str) -> Result<()> {
    info!(
        "Creating song folder {} from {}",
        dest_dir.display(),
        source_dir.display()
    );

    let transcoder = FfmpegTranscoder::new();
    if !transcoder.is_available() {
        println!("ERROR: ffmpeg/ffprobe not found.");
        println!();
        println!("Install ffmpeg, or point LOOPCARD_FFMPEG_PATH and");
        println!("LOOPCARD_FFPROBE_PATH at the binaries.");
        return Err(LoopcardError::TranscodeFailed {
            path: source_dir.to_path_buf(),
            reason: "ffmpeg/ffprobe not available".to_string(),
        });
    }

    let writer = SessionWriter::new(&transcoder);
    let registry = writer.create(source_dir, dest_dir, song_name)?;

    println!("Song folder written: {}", dest_dir.display());
    println!("Song name: {}", registry.song_name);
    println!("Registered tracks:");
    for (slot, name) in &registry.tracks {
        println!("  {}: {}", slot, name);
    }

    Ok(())
}

/// Swap two track files and their registry entries.
pub fn swap(file_a: &Path, file_b: &Path) -> Result<()> {
    info!("Swapping {} and {}", file_a.display(), file_b.display());

    swap_tracks(file_a, file_b)?;

    println!("Swapped: {} <-> {}", file_a.display(), file_b.display());

    Ok(())
}

/// List the song folders on a card, grouped by song.
pub fn inspect_card(card_root: &Path, song: Option<&str>) -> Result<()> {
    info!("Inspecting card: {}", card_root.display());

    let reports = scan_card(card_root)?;
    if reports.is_empty() {
        println!("No song folders found.");
        return Ok(());
    }

    match song {
        Some(song) => println!("{}", render_song_table(song, &reports)),
        None => {
            for song in song_names(&reports) {
                println!("{}", render_song_table(&song, &reports));
                println!();
            }
        }
    }

    Ok(())
}

/// Rewrite a legacy registry file in the current format.
pub fn convert_registry(file: &Path) -> Result<()> {
    info!("Converting registry: {}", file.display());

    let registry = SongRegistry::load(file)?;
    registry.save(file)?;

    println!("Registry rewritten: {}", file.display());
    println!("Song name: {}", registry.song_name);
    println!("{} tracks registered.", registry.tracks.len());

    Ok(())
}
