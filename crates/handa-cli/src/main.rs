#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "handa: disaster-preparedness community engine",
    long_about = None
)]
struct Cli {
    /// Path to the engine database (default: the platform data directory).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.json)
    }

    /// Database path: the flag, or the platform data dir.
    fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("handa")
                .join("handa.sqlite3")
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize the engine database",
        after_help = "EXAMPLES:\n    # Create the database in the default location\n    handa init\n\n    # Use an explicit path\n    handa --db ./handa.sqlite3 init"
    )]
    Init,

    #[command(
        next_help_heading = "Lifecycle",
        about = "Seed the database with a deterministic fixture",
        after_help = "EXAMPLES:\n    # Forty households from the default seed\n    handa seed\n\n    # A reproducible larger demo\n    handa seed --seed 7 --households 200"
    )]
    Seed(cmd::seed::SeedArgs),

    #[command(
        next_help_heading = "Reference",
        about = "Manage the checklist item catalog"
    )]
    Catalog {
        #[command(subcommand)]
        command: cmd::catalog::CatalogCommand,
    },

    #[command(
        next_help_heading = "Households",
        about = "Register and inspect households"
    )]
    Household {
        #[command(subcommand)]
        command: cmd::household::HouseholdCommand,
    },

    #[command(
        next_help_heading = "Households",
        about = "Edit and inspect a household's go-bag",
        after_help = "EXAMPLES:\n    # Add one item\n    handa bag add hh-0001 flashlight\n\n    # Submit a complete new checklist\n    handa bag set hh-0001 --items water,flashlight,radio --image img/bag.jpg"
    )]
    Bag {
        #[command(subcommand)]
        command: cmd::bag::BagCommand,
    },

    #[command(
        next_help_heading = "Community",
        about = "Create, verify, and delete community posts"
    )]
    Post {
        #[command(subcommand)]
        command: cmd::post::PostCommand,
    },

    #[command(
        next_help_heading = "Community",
        about = "Browse the community feed",
        after_help = "EXAMPLES:\n    # Newest posts in a barangay\n    handa feed --city quezon-city --barangay batasan-hills\n\n    # One row per household, searched\n    handa feed --unique --search \"first aid\""
    )]
    Feed(cmd::feed::FeedArgs),

    #[command(
        next_help_heading = "Community",
        about = "Barangay leaderboard",
        after_help = "EXAMPLES:\n    # All-time points\n    handa top --barangay batasan-hills\n\n    # Go-bag points only, searched\n    handa top --barangay batasan-hills --metric go-bag --search cruz"
    )]
    Top(cmd::top::TopArgs),

    #[command(
        next_help_heading = "LGU",
        about = "Readiness distribution and item breakdown for a barangay"
    )]
    Analytics(cmd::analytics::AnalyticsArgs),

    #[command(
        next_help_heading = "LGU",
        about = "File and resolve moderation reports"
    )]
    Report {
        #[command(subcommand)]
        command: cmd::report::ReportCommand,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HANDA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "handa=debug,info"
        } else {
            "handa=info,warn"
        })
    });

    let format = env::var("HANDA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let db_path = cli.db_path();
    let config = handa_core::config::load_config(&std::env::current_dir()?)?;

    match cli.command {
        Commands::Init => cmd::init::run_init(&db_path, output),
        Commands::Seed(ref args) => cmd::seed::run_seed(args, &db_path, output),
        Commands::Catalog { ref command } => cmd::catalog::run_catalog(command, &db_path, output),
        Commands::Household { ref command } => {
            cmd::household::run_household(command, &db_path, output)
        }
        Commands::Bag { ref command } => cmd::bag::run_bag(command, &db_path, output),
        Commands::Post { ref command } => cmd::post::run_post(command, &db_path, output),
        Commands::Feed(ref args) => cmd::feed::run_feed(args, &db_path, &config, output),
        Commands::Top(ref args) => cmd::top::run_top(args, &db_path, &config, output),
        Commands::Analytics(ref args) => cmd::analytics::run_analytics(args, &db_path, output),
        Commands::Report { ref command } => cmd::report::run_report(command, &db_path, output),
    }
}
