//! # Plexmv - Plex friendly media renamer
//!
//! Renames loosely-structured movie and TV-show files (scene-release or
//! torrent naming) into a normalized scheme that media-library software
//! understands, moving TV episodes into collection and season folders.
//!
//! ## Usage
//!
//! ```bash
//! # Preview names read from stdin
//! cat movie_list.txt | plexmv
//!
//! # Convert files in place
//! plexmv trainwreck.mkv war.dogs.2016.mkv
//!
//! # Dry run
//! plexmv -d The.Platform.2019.720p.mkv
//!
//! # Move into a library root, fixing mode and owner
//! plexmv -m -o -p ~/plex The.Flash.2014.S01E01.HDTV.mkv
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod media;
mod parser;
mod patterns;
mod rename;

use commands::convert::{self, ConvertCommand, ConvertOptions};

/// Plexmv - movie and TV show files, Plex friendly maker
#[derive(Parser)]
#[command(
    name = "plexmv",
    about = "Movie and TV show files, Plex friendly maker",
    long_about = "Renames scene-release style media files into a normalized scheme and \
                  moves TV episodes into collection and season folders. With no paths \
                  (or \"-\") it reads file names from stdin and prints the converted names.",
    version
)]
struct Cli {
    /// Files, globs or directories to convert; stdin mode when empty or "-"
    paths: Vec<String>,

    /// Show the rename plan without touching any file
    #[arg(long, short = 'd')]
    dry_run: bool,

    /// Change the file mode after the move (PLEXMV_FILE_MODE, default 660)
    #[arg(long, short = 'm')]
    change_mode: bool,

    /// Change the file owner after the move (PLEXMV_OWNER, default plex; sudo might be needed)
    #[arg(long, short = 'o')]
    change_owner: bool,

    /// Output path (move the files under this directory before renaming)
    #[arg(long, short = 'p')]
    out_dir: Option<PathBuf>,

    /// Give movie files their own folder (TV episodes always get one)
    #[arg(long, short = 's')]
    separate: bool,

    /// With --dry-run, print the plan as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plexmv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = if cli.paths.is_empty() || cli.paths[0] == "-" {
        convert::preview_stdin().await
    } else {
        let options = ConvertOptions {
            dry_run: cli.dry_run,
            change_mode: cli.change_mode,
            change_owner: cli.change_owner,
            separate: cli.separate,
            json: cli.json,
            out_dir: cli.out_dir,
        };
        ConvertCommand::new(cli.paths, options).execute().await
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
