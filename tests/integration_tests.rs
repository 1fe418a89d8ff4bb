//! Integration Tests
//!
//! End-to-end tests for building, swapping, and inspecting song folders.

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::tempdir;

use loopcard::inspect::{scan_card, song_names};
use loopcard::session::{swap_tracks, SessionWriter, SongRegistry, REGISTRY_FILE, TEMPO_FILE};
use loopcard::transcode::{MockTranscoder, TARGET_SAMPLE_RATE};
use loopcard::LoopcardError;

/// Helper to write a mono source wav of the given length.
fn write_source_wav(path: &Path, duration_secs: f64, amplitude: i16) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let frames = (duration_secs * f64::from(TARGET_SAMPLE_RATE)) as usize;
    for _ in 0..frames {
        writer.write_sample(amplitude).unwrap();
    }
    writer.finalize().unwrap();
}

fn wav_duration_secs(path: &Path) -> f64 {
    let reader = WavReader::open(path).unwrap();
    f64::from(reader.duration()) / f64::from(reader.spec().sample_rate)
}

// === Create Tests ===

#[test]
fn test_create_builds_complete_folder_from_two_sources() {
    let root = tempdir().unwrap();
    let sources = root.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    write_source_wav(&sources.join("kick.wav"), 0.5, 4000);
    write_source_wav(&sources.join("snare.wav"), 0.25, 2000);

    let transcoder = MockTranscoder::new();
    let dest = root.path().join("01");
    SessionWriter::new(&transcoder)
        .create(&sources, &dest, "Night Drive")
        .unwrap();

    // All five mono slots plus the master exist.
    for n in 1..=5 {
        let track = dest.join(format!("TRACK{}.wav", n));
        let spec = WavReader::open(&track).unwrap().spec();
        assert_eq!(spec.channels, 1, "TRACK{} must be mono", n);
        assert_eq!(spec.sample_rate, TARGET_SAMPLE_RATE);
    }
    let master_spec = WavReader::open(dest.join("TRACKM.wav")).unwrap().spec();
    assert_eq!(master_spec.channels, 2, "master must be stereo");

    // Padding matches the first source's duration (kick.wav sorts first).
    assert_relative_eq!(
        wav_duration_secs(&dest.join("TRACK3.wav")),
        0.5,
        epsilon = 1e-3
    );
    assert_relative_eq!(
        wav_duration_secs(&dest.join("TRACKM.wav")),
        0.5,
        epsilon = 1e-3
    );

    // Registry records exactly the source slots.
    let raw: Value =
        serde_json::from_str(&fs::read_to_string(dest.join(REGISTRY_FILE)).unwrap()).unwrap();
    let expected = json!({
        "tracks": {"TRACK1": "kick.wav", "TRACK2": "snare.wav"},
        "song_name": "Night Drive"
    });
    assert_eq!(raw, expected);

    // Tempo file carries the device defaults and no trailing newline.
    let tempo = fs::read_to_string(dest.join(TEMPO_FILE)).unwrap();
    assert!(tempo.contains("Tempo= 138.2011 bpm"));
    assert!(!tempo.ends_with('\n'));
}

#[test]
fn test_create_with_five_sources_omits_master() {
    let root = tempdir().unwrap();
    let sources = root.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    for name in ["a.wav", "b.wav", "c.wav", "d.wav", "e.wav"] {
        write_source_wav(&sources.join(name), 0.1, 1000);
    }

    let transcoder = MockTranscoder::new();
    let dest = root.path().join("02");
    let registry = SessionWriter::new(&transcoder)
        .create(&sources, &dest, "Full House")
        .unwrap();

    assert_eq!(registry.tracks.len(), 5);
    assert!(!dest.join("TRACKM.wav").exists(), "full folder has no master");
    for n in 1..=5 {
        assert!(dest.join(format!("TRACK{}.wav", n)).exists());
    }
}

#[test]
fn test_create_replaces_previous_folder_contents() {
    let root = tempdir().unwrap();
    let sources = root.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    write_source_wav(&sources.join("loop.wav"), 0.1, 1000);

    let dest = root.path().join("03");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("leftover.txt"), "from an older song").unwrap();

    let transcoder = MockTranscoder::new();
    SessionWriter::new(&transcoder)
        .create(&sources, &dest, "Fresh Start")
        .unwrap();

    assert!(!dest.join("leftover.txt").exists());
    let registry = SongRegistry::load(&SongRegistry::registry_path(&dest)).unwrap();
    assert_eq!(registry.song_name, "Fresh Start");
}

#[test]
fn test_failed_create_keeps_old_folder_and_cleans_staging() {
    let root = tempdir().unwrap();
    let sources = root.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    write_source_wav(&sources.join("kick.wav"), 0.1, 1000);
    write_source_wav(&sources.join("snare.wav"), 0.1, 1000);

    let dest = root.path().join("04");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("keep.wav"), "previous take").unwrap();

    // Fails on the second source's slot, after several files were staged.
    let transcoder = MockTranscoder::failing_on("TRACK2.wav");
    let result = SessionWriter::new(&transcoder).create(&sources, &dest, "Broken");

    assert!(matches!(result, Err(LoopcardError::TranscodeFailed { .. })));
    assert_eq!(
        fs::read_to_string(dest.join("keep.wav")).unwrap(),
        "previous take",
        "old folder must survive a failed build"
    );
    assert!(!dest.join("TRACK1.wav").exists());

    let staging_dirs: Vec<_> = fs::read_dir(root.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("staging"))
        .collect();
    assert!(staging_dirs.is_empty(), "staging must not outlive a failed build");
}

// === Swap Tests ===

#[test]
fn test_swap_exchanges_files_and_registry_entries() {
    let root = tempdir().unwrap();
    let sources = root.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    write_source_wav(&sources.join("kick.wav"), 0.2, 4000);
    write_source_wav(&sources.join("snare.wav"), 0.1, 2000);

    let transcoder = MockTranscoder::new();
    let dest = root.path().join("05");
    SessionWriter::new(&transcoder)
        .create(&sources, &dest, "Night Drive")
        .unwrap();

    let track1 = dest.join("TRACK1.wav");
    let track2 = dest.join("TRACK2.wav");
    let bytes1 = fs::read(&track1).unwrap();
    let bytes2 = fs::read(&track2).unwrap();

    swap_tracks(&track1, &track2).unwrap();

    assert_eq!(fs::read(&track1).unwrap(), bytes2);
    assert_eq!(fs::read(&track2).unwrap(), bytes1);

    let registry = SongRegistry::load(&SongRegistry::registry_path(&dest)).unwrap();
    assert_eq!(registry.tracks["TRACK1"], "snare.wav");
    assert_eq!(registry.tracks["TRACK2"], "kick.wav");
}

#[test]
fn test_swap_with_silence_slot_is_rejected_and_reversed() {
    let root = tempdir().unwrap();
    let sources = root.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    write_source_wav(&sources.join("kick.wav"), 0.2, 4000);
    write_source_wav(&sources.join("snare.wav"), 0.1, 2000);

    let transcoder = MockTranscoder::new();
    let dest = root.path().join("06");
    SessionWriter::new(&transcoder)
        .create(&sources, &dest, "Night Drive")
        .unwrap();

    // TRACK3 holds silence and has no registry entry.
    let track1 = dest.join("TRACK1.wav");
    let track3 = dest.join("TRACK3.wav");
    let bytes1 = fs::read(&track1).unwrap();
    let bytes3 = fs::read(&track3).unwrap();

    let result = swap_tracks(&track1, &track3);
    assert!(matches!(
        result,
        Err(LoopcardError::RegistryKeyMissing { .. })
    ));

    // The reverse swap put everything back.
    assert_eq!(fs::read(&track1).unwrap(), bytes1);
    assert_eq!(fs::read(&track3).unwrap(), bytes3);
    let registry = SongRegistry::load(&SongRegistry::registry_path(&dest)).unwrap();
    assert_eq!(registry.tracks["TRACK1"], "kick.wav");
}

// === Registry and Card Tests ===

#[test]
fn test_convert_legacy_registry_round_trip() {
    let root = tempdir().unwrap();
    let path = root.path().join(REGISTRY_FILE);
    fs::write(
        &path,
        r#"{"song_name": "Old Song", "firmware": "1.0", "tracks": [{"number": 2, "name": "snare.wav"}, {"number": 1, "name": "kick.wav"}]}"#,
    )
    .unwrap();

    let registry = SongRegistry::load(&path).unwrap();
    registry.save(&path).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw["tracks"],
        json!({"TRACK1": "kick.wav", "TRACK2": "snare.wav"})
    );
    assert_eq!(raw["song_name"], json!("Old Song"));
    assert_eq!(raw["firmware"], json!("1.0"), "unknown fields must survive");

    // A converted registry loads identically.
    assert_eq!(SongRegistry::load(&path).unwrap(), registry);
}

#[test]
fn test_inspect_groups_folders_by_song() {
    let root = tempdir().unwrap();
    let sources = root.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    write_source_wav(&sources.join("loop.wav"), 0.1, 1000);

    let card = root.path().join("card");
    fs::create_dir_all(&card).unwrap();
    let transcoder = MockTranscoder::new();
    let writer = SessionWriter::new(&transcoder);
    writer
        .create(&sources, &card.join("01"), "Night Drive")
        .unwrap();
    writer
        .create(&sources, &card.join("02"), "Slow Burn")
        .unwrap();
    writer
        .create(&sources, &card.join("03"), "Night Drive")
        .unwrap();

    let reports = scan_card(&card).unwrap();
    assert_eq!(reports.len(), 3);

    let names: Vec<_> = song_names(&reports).into_iter().collect();
    assert_eq!(names, vec!["Night Drive", "Slow Burn"]);

    let night_drive: Vec<_> = reports
        .iter()
        .filter(|r| r.song_name == "Night Drive")
        .map(|r| r.folder_name.as_str())
        .collect();
    assert_eq!(night_drive, vec!["01", "03"]);
}
