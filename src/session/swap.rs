//! Atomic-ish exchange of two track files inside a song folder.
//!
//! The on-disk names are exchanged through temporary names so neither
//! rename ever overwrites live data, then the registry entries for the
//! two slots are swapped. If the registry cannot be updated the file
//! swap is reversed so folder and registry stay consistent.

use std::fs;
use std::path::Path;

use log::{error, info, warn};
use uuid::Uuid;

use crate::error::{LoopcardError, Result};
use crate::session::registry::{SongRegistry, REGISTRY_FILE};

/// Exchange the contents of `file_a` and `file_b` and their entries in
/// the folder's registry.
///
/// Both files must live in the same folder. On a registry failure the
/// file names are swapped back and the registry error is returned; only
/// when that reverse swap also fails does the error carry
/// `restored: false`.
pub fn swap_tracks(file_a: &Path, file_b: &Path) -> Result<()> {
    if !file_a.is_file() {
        return Err(LoopcardError::FileNotFound {
            path: file_a.to_path_buf(),
        });
    }
    if !file_b.is_file() {
        return Err(LoopcardError::FileNotFound {
            path: file_b.to_path_buf(),
        });
    }

    let dir_a = file_a.parent().unwrap_or_else(|| Path::new(""));
    let dir_b = file_b.parent().unwrap_or_else(|| Path::new(""));
    if dir_a != dir_b {
        return Err(LoopcardError::SwapFailed {
            reason: format!(
                "{} and {} are in different folders",
                file_a.display(),
                file_b.display()
            ),
            restored: true,
        });
    }
    if file_a.file_name() == file_b.file_name() {
        return Err(LoopcardError::SwapFailed {
            reason: format!("cannot swap {} with itself", file_a.display()),
            restored: true,
        });
    }

    swap_file_names(dir_a, file_a, file_b)?;

    let registry_path = dir_a.join(REGISTRY_FILE);
    if let Err(registry_err) = swap_registry_entries(&registry_path, file_a, file_b) {
        warn!(
            "Registry update failed, reversing file swap: {}",
            registry_err
        );
        if let Err(reverse_err) = swap_file_names(dir_a, file_a, file_b) {
            error!(
                "Reverse swap failed; {} no longer matches the track files",
                registry_path.display()
            );
            return Err(LoopcardError::SwapFailed {
                reason: format!(
                    "registry update failed ({}) and the file swap could not be reversed: {}",
                    registry_err, reverse_err
                ),
                restored: false,
            });
        }
        return Err(registry_err);
    }

    info!("Swapped {} and {}", file_a.display(), file_b.display());
    Ok(())
}

/// Exchange two file names via unique temporary names.
///
/// Every rename targets a vacant name, so an interrupted swap can lose
/// placement but never content. Failure branches restore the original
/// names where possible and report whether they managed to.
fn swap_file_names(dir: &Path, file_a: &Path, file_b: &Path) -> Result<()> {
    let token = Uuid::new_v4().to_string();
    let temp_a = dir.join(format!(".swap_{}_a.tmp", token));
    let temp_b = dir.join(format!(".swap_{}_b.tmp", token));

    // Move both files aside.
    fs::rename(file_a, &temp_a).map_err(|e| LoopcardError::SwapFailed {
        reason: format!("failed to stage {}: {}", file_a.display(), e),
        restored: true,
    })?;

    if let Err(e) = fs::rename(file_b, &temp_b) {
        let restored = fs::rename(&temp_a, file_a).is_ok();
        if !restored {
            report_stranded(&[(temp_a.as_path(), file_a)]);
        }
        return Err(LoopcardError::SwapFailed {
            reason: format!("failed to stage {}: {}", file_b.display(), e),
            restored,
        });
    }

    // Commit under the exchanged names.
    if let Err(e) = fs::rename(&temp_a, file_b) {
        // Both names are vacant, so the restores are independent.
        let restored_a = fs::rename(&temp_a, file_a).is_ok();
        let restored_b = fs::rename(&temp_b, file_b).is_ok();
        let restored = restored_a && restored_b;
        if !restored {
            report_stranded(&[(temp_a.as_path(), file_a), (temp_b.as_path(), file_b)]);
        }
        return Err(LoopcardError::SwapFailed {
            reason: format!("failed to move {} into place: {}", file_b.display(), e),
            restored,
        });
    }

    if let Err(e) = fs::rename(&temp_b, file_a) {
        // file_b already holds file_a's old contents. Move those home
        // first; restoring temp_b into file_b before that would
        // overwrite them.
        let restored =
            fs::rename(file_b, file_a).is_ok() && fs::rename(&temp_b, file_b).is_ok();
        if !restored {
            report_stranded(&[(temp_b.as_path(), file_b)]);
        }
        return Err(LoopcardError::SwapFailed {
            reason: format!("failed to move {} into place: {}", file_a.display(), e),
            restored,
        });
    }

    Ok(())
}

fn report_stranded(temps: &[(&Path, &Path)]) {
    for (temp, original) in temps {
        error!(
            "Contents of {} are stranded at {}",
            original.display(),
            temp.display()
        );
    }
}

/// Swap the registry entries keyed by the two files' stems.
fn swap_registry_entries(registry_path: &Path, file_a: &Path, file_b: &Path) -> Result<()> {
    let mut registry = SongRegistry::load(registry_path)?;
    registry.swap_entries(&slot_key(file_a), &slot_key(file_b))?;
    registry.save(registry_path)
}

fn slot_key(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
