//! Tripmatch - trip recommendation server and command-line client
//!
//! Serves the HTTP API and offers one-shot commands for managing the catalog,
//! requesting recommendations and recording feedback.

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;
use tripmatch_core::{config::resolve_db_path, FeedbackSubmission, TripId};

#[derive(Parser)]
#[command(name = "tripmatch")]
#[command(about = "Constraint-relaxing trip recommendations with feedback-driven scoring", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database path (overrides TRIPMATCH_DB_PATH env var and default; `:memory:` for no persistence)
    #[arg(long)]
    db_path: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Server address (overrides the config file)
        #[arg(long)]
        addr: Option<String>,

        /// Load the demo catalog first if the catalog is empty
        #[arg(long)]
        seed: bool,
    },

    /// Initialize database
    Init,

    /// Import trips from a .json or .toml file
    Import {
        /// Catalog file
        file: PathBuf,
    },

    /// Load the demo catalog and demo feedback
    Seed,

    /// Print recommendations for a query
    Recommend {
        /// Maximum budget
        #[arg(long)]
        budget: f64,

        /// Trip length in days
        #[arg(long)]
        days: u32,

        /// Travel type (leisure, adventure, family, business, cultural, romantic)
        #[arg(long)]
        travel_type: String,

        /// Interest tag (repeatable)
        #[arg(long = "interest")]
        interests: Vec<String>,
    },

    /// Record feedback for a trip
    Feedback {
        #[arg(long)]
        trip_id: u64,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: i64,

        /// The traveller liked the trip
        #[arg(long, conflicts_with = "disliked", required_unless_present = "disliked")]
        liked: bool,

        /// The traveller disliked the trip
        #[arg(long)]
        disliked: bool,

        #[arg(long)]
        comment: Option<String>,

        #[arg(long)]
        user_id: Option<String>,
    },

    /// Show a trip with its feedback
    Show {
        trip_id: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use the requested level for our crates, keep HTTP internals quieter
    let filter = EnvFilter::new(format!(
        "tripmatch={lvl},tripmatch_core={lvl},tower_http={lvl},hyper=warn",
        lvl = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Tripmatch v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = cli::helpers::load_config(cli.config.as_deref())?;
    let db_path = resolve_db_path(cli.db_path);
    debug!("Database path: {}", db_path);

    match cli.command {
        Commands::Serve { addr, seed } => cli::serve::handle(&db_path, &config, addr, seed).await,
        Commands::Init => cli::init::handle(&db_path).await,
        Commands::Import { file } => cli::import::handle(&db_path, &file).await,
        Commands::Seed => cli::seed::handle(&db_path).await,
        Commands::Recommend {
            budget,
            days,
            travel_type,
            interests,
        } => cli::recommend::handle(&db_path, &config, budget, days, &travel_type, interests).await,
        Commands::Feedback {
            trip_id,
            rating,
            liked,
            disliked: _,
            comment,
            user_id,
        } => {
            let submission = FeedbackSubmission {
                trip_id: TripId(trip_id),
                user_id,
                rating,
                liked,
                comment,
            };
            cli::feedback::handle(&db_path, &config, submission).await
        }
        Commands::Show { trip_id } => cli::show::handle(&db_path, &config, trip_id).await,
    }
}
