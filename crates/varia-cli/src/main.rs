//! CLI frontend for the Varia narrative directive engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "varia",
    about = "Varia: check and render narrative text with embedded directives",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log selection decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file, validate every directive, and summarize them
    Check {
        /// Narrative text file
        file: PathBuf,
    },

    /// Print the parse tree of a file as a one-line outline
    Tree {
        /// Narrative text file
        file: PathBuf,
    },

    /// Resolve a file one or more times, as repeated visits
    Render {
        /// Narrative text file
        file: PathBuf,

        /// Number of visits to render
        #[arg(short = 'n', long, default_value = "1")]
        times: usize,

        /// RNG seed for deterministic shuffles
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Guard variables as a JSON object, e.g. '{"gold": 12}'
        #[arg(long)]
        vars: Option<String>,

        /// Sequence state file, loaded if present and saved afterwards
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file),
        Commands::Tree { file } => commands::tree::run(&file),
        Commands::Render {
            file,
            times,
            seed,
            vars,
            state,
        } => commands::render::run(&file, times, seed, vars.as_deref(), state.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
