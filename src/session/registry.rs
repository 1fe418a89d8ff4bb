//! The NAME.json track registry.
//!
//! Maps populated mono slots (`TRACK<N>`) to the original source basenames,
//! alongside the song name. Historical folders stored `tracks` as a list of
//! `{"number": N, "name": ...}` objects; that shape is rewritten to the
//! canonical mapping at the load boundary so everything downstream sees one
//! registry type.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LoopcardError, Result};

/// Registry file name inside a song folder.
pub const REGISTRY_FILE: &str = "NAME.json";

/// The persisted registry for one song folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRegistry {
    /// Mono slot key (`TRACK<N>`) to original source basename.
    ///
    /// Keys are exactly the slots populated from real sources; silence
    /// slots and the stereo master are never registered. Iteration
    /// follows slot order.
    pub tracks: BTreeMap<String, String>,

    /// Song name shared by every folder belonging to the same song.
    pub song_name: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, Value>,
}

impl SongRegistry {
    /// Create an empty registry for a new song folder.
    pub fn new(song_name: &str) -> Self {
        Self {
            tracks: BTreeMap::new(),
            song_name: song_name.to_string(),
            unknown_fields: HashMap::new(),
        }
    }

    /// Path of the registry file inside `folder`.
    pub fn registry_path(folder: &Path) -> PathBuf {
        folder.join(REGISTRY_FILE)
    }

    /// Load a registry, accepting both the canonical and the legacy shape.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LoopcardError::RegistryMissing {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| LoopcardError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let data: Value = serde_json::from_str(&content)?;
        let data = normalize_tracks(data)?;

        let registry: SongRegistry = serde_json::from_value(data)?;
        Ok(registry)
    }

    /// Save the registry. The write goes to a temporary sibling first and
    /// is renamed into place, so a reader never observes a partial file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| LoopcardError::RegistryWriteFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| LoopcardError::RegistryWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Exchange the values of two slot keys.
    ///
    /// Both keys must already exist; the registry is untouched otherwise.
    pub fn swap_entries(&mut self, key_a: &str, key_b: &str) -> Result<()> {
        let value_a = match self.tracks.get(key_a) {
            Some(value) => value.clone(),
            None => {
                return Err(LoopcardError::RegistryKeyMissing {
                    key: key_a.to_string(),
                })
            }
        };
        let value_b = match self.tracks.get(key_b) {
            Some(value) => value.clone(),
            None => {
                return Err(LoopcardError::RegistryKeyMissing {
                    key: key_b.to_string(),
                })
            }
        };

        self.tracks.insert(key_a.to_string(), value_b);
        self.tracks.insert(key_b.to_string(), value_a);
        Ok(())
    }
}

/// Rewrite the legacy list-of-objects `tracks` shape into the canonical
/// mapping before the typed parse. Canonical data passes through unchanged.
fn normalize_tracks(data: Value) -> Result<Value> {
    let mut obj = match data {
        Value::Object(obj) => obj,
        _ => {
            return Err(LoopcardError::RegistryFormat {
                reason: "top level is not a JSON object".to_string(),
            })
        }
    };

    let entries = match obj.remove("tracks") {
        Some(Value::Object(tracks)) => {
            obj.insert("tracks".to_string(), Value::Object(tracks));
            return Ok(Value::Object(obj));
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(LoopcardError::RegistryFormat {
                reason: format!("'tracks' is neither a mapping nor a list: {}", other),
            })
        }
        None => {
            return Err(LoopcardError::RegistryFormat {
                reason: "missing 'tracks' field".to_string(),
            })
        }
    };

    let mut converted = serde_json::Map::new();
    for entry in &entries {
        let number = entry.get("number").and_then(Value::as_u64);
        let name = entry.get("name").and_then(Value::as_str);
        match (number, name) {
            (Some(number), Some(name)) => {
                converted.insert(format!("TRACK{}", number), Value::String(name.to_string()));
            }
            _ => {
                return Err(LoopcardError::RegistryFormat {
                    reason: format!("legacy track entry missing number or name: {}", entry),
                });
            }
        }
    }

    obj.insert("tracks".to_string(), Value::Object(converted));
    Ok(Value::Object(obj))
}
