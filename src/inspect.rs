//! Card inspection: reads every song folder on a card and reports
//! which folders belong to which song.
//!
//! Folders without a registry are skipped, as are folders whose
//! registry cannot be parsed; a card with foreign directories on it
//! should still be inspectable.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::error::{LoopcardError, Result};
use crate::session::registry::SongRegistry;

/// One song folder as found on the card.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderReport {
    pub folder_name: String,
    pub song_name: String,
    /// Source basenames in slot order.
    pub track_names: Vec<String>,
}

/// Scan the top-level folders of `root`, reading each folder's registry.
///
/// Folders are visited in name order so output is stable across runs.
pub fn scan_card(root: &Path) -> Result<Vec<FolderReport>> {
    if !root.is_dir() {
        return Err(LoopcardError::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut folders: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    folders.sort();

    let mut reports = Vec::new();
    for folder in folders {
        let registry_path = SongRegistry::registry_path(&folder);
        if !registry_path.is_file() {
            continue;
        }
        let registry = match SongRegistry::load(&registry_path) {
            Ok(registry) => registry,
            Err(err) => {
                warn!("Skipping {}: {}", folder.display(), err);
                continue;
            }
        };
        reports.push(FolderReport {
            folder_name: folder
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            song_name: registry.song_name.clone(),
            track_names: registry.tracks.values().cloned().collect(),
        });
    }

    Ok(reports)
}

/// The distinct song names across the card, sorted.
pub fn song_names(reports: &[FolderReport]) -> BTreeSet<String> {
    reports
        .iter()
        .map(|report| report.song_name.clone())
        .collect()
}

/// Render one song's folders as a text block, one row per folder.
pub fn render_song_table(song: &str, reports: &[FolderReport]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("[{}]", song));
    lines.push(format!("{:-<60}", ""));
    for report in reports.iter().filter(|r| r.song_name == song) {
        let mut row = vec![report.folder_name.clone()];
        row.extend(report.track_names.iter().cloned());
        lines.push(row.join(", "));
    }
    lines.join("\n")
}
