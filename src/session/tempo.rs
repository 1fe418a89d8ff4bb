//! The TEMPO.txt record.
//!
//! The looper hardware reads this file back, so the rendered layout
//! (field spellings, spacing, trailing blanks) must stay byte-compatible
//! with what the device writes itself.

use std::fs;
use std::path::Path;

use crate::error::{LoopcardError, Result};

/// Tempo record file name inside a song folder.
pub const TEMPO_FILE: &str = "TEMPO.txt";

/// Placeholder tempo written on session creation.
pub const DEFAULT_TEMPO_BPM: f64 = 138.2011;

/// Editable fields of the tempo record.
///
/// Created once per session with default values; the device (or the user,
/// in a text editor) edits the file afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoRecord {
    /// Tempo in bpm, valid range 59..=240 on the device.
    pub tempo_bpm: f64,
    pub quantise: bool,
    pub stereo: bool,
    /// Timestamp of the last playback, written by the device.
    pub last_play: String,
    /// Tempo pot position 0..=127; blank tells the device to use `tempo_bpm`.
    pub tempo_pot: Option<u8>,
    pub octave: bool,
    pub reverse: bool,
}

impl Default for TempoRecord {
    fn default() -> Self {
        Self {
            tempo_bpm: DEFAULT_TEMPO_BPM,
            quantise: false,
            stereo: false,
            last_play: String::new(),
            tempo_pot: None,
            octave: false,
            reverse: false,
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "On"
    } else {
        "Off"
    }
}

impl TempoRecord {
    /// Render the record in the device's file layout.
    pub fn render(&self) -> String {
        let pot = match self.tempo_pot {
            Some(value) => format!("{} ", value),
            None => String::new(),
        };

        let mut text = String::new();
        text.push_str("Record:\n");
        text.push_str(&format!(
            "        Tempo= {} bpm (Min 59 to max 240)\n",
            self.tempo_bpm
        ));
        text.push_str(&format!(
            "        QUANTISE= {} (Off or On)\n",
            on_off(self.quantise)
        ));
        text.push_str(&format!(
            "        STEREO= {}   (Off or On)\n",
            on_off(self.stereo)
        ));
        text.push_str(&format!("        Last Play:{:<18}\n", self.last_play));
        text.push_str(&format!("        TEMPO POT= {}(0 to 127 or blank)\n", pot));
        text.push_str(&format!(
            "        OCTAVE= {}    (Off or On)\n",
            on_off(self.octave)
        ));
        text.push_str(&format!(
            "        REVERSE= {}  (Off or On)\n",
            on_off(self.reverse)
        ));
        text.push_str(
            "        You can use Notepad to edit this file when importing track files. \
             In that case put value in Record Tempo but leave TEMPO POT value blank.\n",
        );
        text.push_str("        ");
        text
    }

    /// Write the record to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| LoopcardError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
