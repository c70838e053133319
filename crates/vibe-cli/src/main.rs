mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vibe",
    about = "Achievement badges and streak celebrations for the /vibe workshop",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workshop data root (default: auto-detect from .vibe/ or .git/)
    #[arg(long, global = true, env = "VIBE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize badge tracking in the current project
    Init,

    /// Apply a metric update and celebrate any newly earned badges
    Check {
        handle: String,

        /// Current streak length in days
        #[arg(long)]
        streak: Option<u32>,

        /// Named counter update (repeatable: --counter ships=3 --counter dms=5)
        #[arg(long = "counter", value_name = "NAME=VALUE")]
        counters: Vec<String>,

        /// Seed for celebration template selection (deterministic output)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Manually award a badge to a user
    Award { handle: String, badge_id: String },

    /// Show a user's badges, points, and next milestones
    User { handle: String },

    /// List the badge catalog
    List,

    /// Show the rarity-weighted badge leaderboard
    Leaderboard,

    /// Show system-wide badge statistics
    Stats,

    /// Show recent celebrations
    Log {
        /// Maximum entries to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Import a legacy JSON data file into the consolidated store
    Migrate { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Check {
            handle,
            streak,
            counters,
            seed,
        } => cmd::check::run(&root, &handle, streak, &counters, seed, cli.json),
        Commands::Award { handle, badge_id } => {
            cmd::award::run(&root, &handle, &badge_id, cli.json)
        }
        Commands::User { handle } => cmd::user::run(&root, &handle, cli.json),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Leaderboard => cmd::leaderboard::run(&root, cli.json),
        Commands::Stats => cmd::stats::run(&root, cli.json),
        Commands::Log { limit } => cmd::log::run(&root, limit, cli.json),
        Commands::Migrate { file } => cmd::migrate::run(&root, &file, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
