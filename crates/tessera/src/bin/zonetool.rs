//! # zonetool
//!
//! Generate, stamp, export and inspect zone files from the shell.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tessera::commands::{self, CommandResult};
use tessera::world::ChunkTransform;

#[derive(Parser)]
#[command(name = "zonetool")]
#[command(about = "Zone generation and prefab tooling")]
struct Args {
    /// World config (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate a procedural zone and print it
    Generate {
        zone: PathBuf,
        /// Write the generated cells into the zone file
        #[arg(long)]
        bake: bool,
    },
    /// Stamp a chunk (file path or library name) into a zone
    Stamp {
        zone: PathBuf,
        chunk: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(long, default_value_t = ChunkTransform::Identity)]
        transform: ChunkTransform,
        /// Rewrite the zone file with the result
        #[arg(long)]
        save: bool,
    },
    /// Export a rectangle of a zone as a chunk template
    Export {
        zone: PathBuf,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        out: PathBuf,
    },
    /// Print a zone's palette, registries and layout
    Inspect { zone: PathBuf },
}

fn run(args: Args) -> CommandResult<String> {
    let config = commands::load_config(args.config.as_deref())?;
    match args.command {
        Command::Generate { zone, bake } => commands::generate(&zone, config, bake),
        Command::Stamp { zone, chunk, x, y, transform, save } => {
            commands::stamp(&zone, &chunk, x, y, transform, save, config)
        }
        Command::Export { zone, min_x, min_y, max_x, max_y, out } => {
            commands::export(&zone, [min_x, min_y, max_x, max_y], &out, config)
        }
        Command::Inspect { zone } => commands::inspect(&zone, config),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
