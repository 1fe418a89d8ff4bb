//! Session assembly: builds a complete song folder from source wav files.
//!
//! The folder is assembled in a hidden staging directory next to the
//! destination and renamed into place once every file has been written.
//! A transcode failure part way through therefore never leaves the
//! destination half populated: the old folder survives untouched and the
//! staging directory is removed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{info, warn};
use walkdir::WalkDir;

use crate::error::{LoopcardError, Result};
use crate::session::registry::SongRegistry;
use crate::session::slots::{allocate, ChannelLayout, Slot, SlotPlan};
use crate::session::tempo::{TempoRecord, TEMPO_FILE};
use crate::transcode::Transcoder;

/// Builds song folders through a [`Transcoder`].
pub struct SessionWriter<'a> {
    transcoder: &'a dyn Transcoder,
}

impl<'a> SessionWriter<'a> {
    pub fn new(transcoder: &'a dyn Transcoder) -> Self {
        Self { transcoder }
    }

    /// Build `dest_dir` from the wav files in `source_dir`.
    ///
    /// Sources are taken in lexicographic file-name order and occupy slots
    /// 1..=N; the remaining mono slots and the stereo master are padded
    /// with silence of the first source's duration. Any prior contents of
    /// `dest_dir` are replaced wholesale.
    ///
    /// Returns the registry that was written to the folder.
    pub fn create(&self, source_dir: &Path, dest_dir: &Path, song_name: &str) -> Result<SongRegistry> {
        if !source_dir.is_dir() {
            return Err(LoopcardError::SourceFolderMissing {
                path: source_dir.to_path_buf(),
            });
        }

        let sources = list_wav_files(source_dir)?;
        if sources.is_empty() {
            return Err(LoopcardError::NoSourceFiles {
                path: source_dir.to_path_buf(),
            });
        }

        let plan = allocate(sources.len())?;

        info!(
            "Building '{}' at {} from {} source files",
            song_name,
            dest_dir.display(),
            sources.len()
        );

        let staging_dir = create_staging_dir(dest_dir)?;

        let registry = match self.populate(&staging_dir, &sources, &plan, song_name) {
            Ok(registry) => registry,
            Err(err) => {
                if let Err(cleanup_err) = fs::remove_dir_all(&staging_dir) {
                    warn!(
                        "Failed to remove staging directory {}: {}",
                        staging_dir.display(),
                        cleanup_err
                    );
                }
                return Err(err);
            }
        };

        replace_dir(&staging_dir, dest_dir)?;

        info!("Session written: {}", dest_dir.display());
        Ok(registry)
    }

    /// Write every slot file plus TEMPO.txt and NAME.json into `staging`.
    fn populate(
        &self,
        staging: &Path,
        sources: &[PathBuf],
        plan: &SlotPlan,
        song_name: &str,
    ) -> Result<SongRegistry> {
        // Reference duration for all padding comes from the first source.
        let reference_duration = self.transcoder.probe_duration(&sources[0])?;

        for slot_number in &plan.silence_slots {
            let path = staging.join(Slot::Mono(*slot_number).file_name());
            self.transcoder
                .write_silence(&path, reference_duration, ChannelLayout::Mono)?;
        }

        if plan.wants_master {
            let path = staging.join(Slot::Master.file_name());
            self.transcoder
                .write_silence(&path, reference_duration, ChannelLayout::Stereo)?;
        }

        let mut registry = SongRegistry::new(song_name);
        for (source, slot_number) in sources.iter().zip(&plan.source_slots) {
            let slot = Slot::Mono(*slot_number);
            let path = staging.join(slot.file_name());
            self.transcoder.transcode_to_mono(source, &path)?;

            let basename = source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            if let Some(key) = slot.registry_key() {
                registry.tracks.insert(key, basename);
            }
        }

        TempoRecord::default().write_to(&staging.join(TEMPO_FILE))?;
        registry.save(&SongRegistry::registry_path(staging))?;

        Ok(registry)
    }
}

/// List the wav files directly inside `dir`, sorted by file name so slot
/// assignment does not depend on filesystem enumeration order.
fn list_wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            Path::new(entry.file_name())
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();

    files.sort();
    Ok(files)
}

/// Create the hidden staging directory next to `dest_dir`.
fn create_staging_dir(dest_dir: &Path) -> Result<PathBuf> {
    let dest_name = dest_dir
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let staging_name = format!(".{}_staging_{}", dest_name, timestamp);

    let staging_dir = match dest_dir.parent() {
        Some(parent) => parent.join(&staging_name),
        None => PathBuf::from(&staging_name),
    };

    // A leftover from a crashed run would make the rename ambiguous.
    if staging_dir.exists() {
        warn!("Removing stale staging directory {}", staging_dir.display());
        fs::remove_dir_all(&staging_dir)?;
    }

    fs::create_dir_all(&staging_dir).map_err(|e| LoopcardError::DirectoryCreateError {
        path: staging_dir.clone(),
        source: e,
    })?;

    Ok(staging_dir)
}

/// Swap the fully built staging directory into place.
fn replace_dir(staging_dir: &Path, dest_dir: &Path) -> Result<()> {
    if dest_dir.exists() {
        if let Err(e) = fs::remove_dir_all(dest_dir) {
            if let Err(cleanup_err) = fs::remove_dir_all(staging_dir) {
                warn!(
                    "Failed to remove staging directory {}: {}",
                    staging_dir.display(),
                    cleanup_err
                );
            }
            return Err(LoopcardError::FileWriteError {
                path: dest_dir.to_path_buf(),
                source: e,
            });
        }
    }

    fs::rename(staging_dir, dest_dir).map_err(|e| {
        warn!(
            "Staged session left at {} after rename failure",
            staging_dir.display()
        );
        LoopcardError::FileWriteError {
            path: dest_dir.to_path_buf(),
            source: e,
        }
    })
}
