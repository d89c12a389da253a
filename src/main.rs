use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_pairing::api::{build_router, state::AppState};
use swiss_pairing::config::AppConfig;
use swiss_pairing::models::{MatchResult, PlayerId};
use swiss_pairing::storage::{JsonlStore, StorageConfig, TournamentStore};
use swiss_pairing::tournament::Tournament;

#[derive(Parser)]
#[command(name = "swiss-pairing")]
#[command(about = "Swiss-system tournament standings and pairings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a player
    Register {
        /// Full name (need not be unique)
        name: String,
    },

    /// Show how many players are registered
    Count,

    /// Show current standings
    Standings,

    /// Pair the next round (records a bye when the field is odd)
    Pair,

    /// Report the result of one match
    Report {
        /// First player id
        player_a: u64,

        /// First player's result: win, lose or draw
        result_a: MatchResult,

        /// Second player id
        player_b: u64,

        /// Second player's result: win, lose or draw
        result_b: MatchResult,
    },

    /// Award a bye by hand
    Bye {
        /// Player id
        player: u64,
    },

    /// List the opponents each player has met
    Opponents,

    /// Delete all matches and byes
    Reset {
        /// Also delete all players
        #[arg(long)]
        players: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address (defaults to the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting swiss-pairing v{}", env!("CARGO_PKG_VERSION"));

    let store: Box<dyn TournamentStore> =
        Box::new(JsonlStore::new(StorageConfig::new(config.data_dir.clone())));
    tracing::debug!("Using {} store at {:?}", store.name(), config.data_dir);
    let mut tournament = Tournament::new(store, config.scores.clone());

    match cli.command {
        Commands::Register { name } => {
            let player = tournament.register_player(&name)?;
            println!("Registered {} with id {}", player.name, player.id);
        }
        Commands::Count => {
            println!("{}", tournament.count_players()?);
        }
        Commands::Standings => {
            let standings = tournament.standings()?;
            println!("{:>4}  {:<24} {:>6} {:>7}", "ID", "NAME", "SCORE", "PLAYED");
            for row in standings {
                println!(
                    "{:>4}  {:<24} {:>6.1} {:>7}",
                    row.id, row.name, row.score, row.matches
                );
            }
        }
        Commands::Pair => {
            let plan = tournament.plan_round()?;
            println!("Round {}", plan.round);
            if let Some(bye) = &plan.bye {
                println!("Bye: {} ({})", bye.name, bye.id);
            }
            for (table, pairing) in plan.pairings.iter().enumerate() {
                println!(
                    "Table {}: {} ({}) vs {} ({})",
                    table + 1,
                    pairing.player1_name,
                    pairing.player1_id,
                    pairing.player2_name,
                    pairing.player2_id
                );
            }
        }
        Commands::Report {
            player_a,
            result_a,
            player_b,
            result_b,
        } => {
            let record = tournament.report_result(
                (PlayerId::new(player_a), result_a),
                (PlayerId::new(player_b), result_b),
            )?;
            println!("Recorded match {}", record.id);
        }
        Commands::Bye { player } => {
            let bye = tournament.report_bye(PlayerId::new(player))?;
            println!("Bye recorded for {}", bye.player_id);
        }
        Commands::Opponents => {
            for (player, opponents) in tournament.player_matches()? {
                let list: Vec<String> = opponents.iter().map(|o| o.to_string()).collect();
                println!("{}: {}", player, list.join(", "));
            }
        }
        Commands::Reset { players } => {
            if players {
                tournament.delete_players()?;
                println!("Deleted all players, matches and byes");
            } else {
                tournament.delete_matches()?;
                println!("Deleted all matches and byes");
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(tournament);
            let app = build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
