//! Loopcard CLI - Song Folder Tool
//!
//! Command-line interface for building and maintaining looper song
//! folders.

use std::process;

use clap::Parser;
use env_logger::Env;
use log::info;

use loopcard::cli::{Cli, Commands};
use loopcard::Result;

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Loopcard v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Loopcard v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        if let Some(hint) = err.recovery_suggestion() {
            eprintln!("Hint: {}", hint);
        }
        if err.is_fatal() {
            eprintln!("The song folder may need manual repair before the card is used again.");
        }
        process::exit(1);
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Create {
            source_dir,
            dest_dir,
            song_name,
        } => loopcard::cli::commands::create(&source_dir, &dest_dir, &song_name),
        Commands::Swap { file_a, file_b } => loopcard::cli::commands::swap(&file_a, &file_b),
        Commands::Inspect { card_root, song } => {
            loopcard::cli::commands::inspect_card(&card_root, song.as_deref())
        }
        Commands::ConvertRegistry { file } => loopcard::cli::commands::convert_registry(&file),
    }
}
