//! CLI Module
//!
//! Command-line interface for the Loopcard session tool.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Loopcard - song folder builder for hardware loopers
#[derive(Parser, Debug)]
#[command(name = "loopcard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a song folder from a folder of wav files
    #[command(name = "create")]
    Create {
        /// Folder containing the source wav files
        source_dir: PathBuf,

        /// Song folder to create or replace
        dest_dir: PathBuf,

        /// Song name recorded in the registry
        song_name: String,
    },

    /// Swap two track files and their registry entries
    #[command(name = "swap")]
    Swap {
        /// First track file
        file_a: PathBuf,

        /// Second track file
        file_b: PathBuf,
    },

    /// List the song folders on a card, grouped by song
    #[command(name = "inspect")]
    Inspect {
        /// Root of the card
        card_root: PathBuf,

        /// Only show folders for this song
        #[arg(short, long)]
        song: Option<String>,
    },

    /// Rewrite a legacy registry file in the current format
    #[command(name = "convert-registry")]
    ConvertRegistry {
        /// Path to the registry file
        file: PathBuf,
    },
}
