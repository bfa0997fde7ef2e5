#![forbid(unsafe_code)]

//! `uci-bridge` — drive a UCI engine from the command line.
//!
//! Starts the engine, performs the handshake, and either prints its
//! identity, asks for one move, or lets it play itself.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use uci_bridge::engine::EngineIdentity;
use uci_bridge::position::game::Game;
use uci_bridge::position::GamePosition;
use uci_bridge::search::SearchBudget;
use uci_bridge::{AppError, EngineConfig, EngineHandle, Result};

/// Consecutive failed requests tolerated per ply during self-play.
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "uci-bridge", about = "UCI chess engine client", version, long_about = None)]
struct Cli {
    /// Path to the TOML engine configuration.
    #[arg(long, conflicts_with = "engine", required_unless_present = "engine")]
    config: Option<PathBuf>,

    /// Engine executable, used with default timeouts.
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Mirror protocol lines to the debug log.
    #[arg(long)]
    log_protocol: bool,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Print the engine's identity.
    Info,
    /// Ask the engine for one move.
    Bestmove {
        /// Base position; the standard start position when omitted.
        #[arg(long)]
        fen: Option<String>,
        /// Moves to play onto the base position first.
        #[arg(long, num_args = 1..)]
        moves: Vec<String>,
        #[command(flatten)]
        budget: BudgetArgs,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Let the engine play itself from the start position.
    Selfplay {
        /// Stop after this many plies.
        #[arg(long, default_value_t = 200)]
        plies: usize,
        #[command(flatten)]
        budget: BudgetArgs,
        /// Print the game report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct BudgetArgs {
    /// Search time in milliseconds.
    #[arg(long)]
    movetime: Option<u64>,
    /// Search depth in plies.
    #[arg(long)]
    depth: Option<u32>,
    /// Node limit.
    #[arg(long)]
    nodes: Option<u64>,
    /// Mate-in-N search.
    #[arg(long)]
    mate: Option<u32>,
}

impl From<&BudgetArgs> for SearchBudget {
    fn from(args: &BudgetArgs) -> Self {
        Self {
            nodes: args.nodes,
            movetime_ms: args.movetime,
            depth: args.depth,
            mate_in: args.mate,
        }
    }
}

#[derive(Debug, Serialize)]
struct MoveReport {
    engine: EngineIdentity,
    fen: String,
    budget: SearchBudget,
    bestmove: String,
}

#[derive(Debug, Serialize)]
struct GameReport {
    engine: EngineIdentity,
    moves: Vec<String>,
    result: &'static str,
    termination: String,
    final_fen: String,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = match (&args.config, &args.engine) {
        (Some(path), _) => EngineConfig::load_from_path(path)?,
        (None, Some(engine)) => EngineConfig::new(engine),
        (None, None) => return Err(AppError::Config("--config or --engine is required".into())),
    };
    config.log_protocol |= args.log_protocol;

    let handle = EngineHandle::start(config).await?;
    let identity = handle.identity().await.unwrap_or_default();
    info!(engine = identity.display_name(), "engine ready");

    let outcome = match &args.command {
        Action::Info => print_identity(&identity),
        Action::Bestmove {
            fen,
            moves,
            budget,
            json,
        } => bestmove(&handle, &identity, fen.as_deref(), moves, budget, *json).await,
        Action::Selfplay {
            plies,
            budget,
            json,
        } => selfplay(&handle, &identity, *plies, budget, *json).await,
    };

    if let Err(err) = handle.shutdown().await {
        error!(%err, "engine shutdown failed");
    }
    outcome
}

fn print_identity(identity: &EngineIdentity) -> Result<()> {
    println!("name:    {}", identity.display_name());
    println!("author:  {}", identity.author.as_deref().unwrap_or("unknown"));
    println!("options: {}", identity.options.join(", "));
    Ok(())
}

async fn bestmove(
    handle: &EngineHandle,
    identity: &EngineIdentity,
    fen: Option<&str>,
    moves: &[String],
    budget: &BudgetArgs,
    json: bool,
) -> Result<()> {
    let mut game = match fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    game.play_uci(moves)?;

    let budget = SearchBudget::from(budget);
    let mv = handle.request_move(&mut game, &budget, None).await?;
    let text = game.format_move(mv);

    if json {
        print_json(&MoveReport {
            engine: identity.clone(),
            fen: game.fen(),
            budget,
            bestmove: text,
        })
    } else {
        println!("bestmove {text}");
        Ok(())
    }
}

async fn selfplay(
    handle: &EngineHandle,
    identity: &EngineIdentity,
    plies: usize,
    budget: &BudgetArgs,
    json: bool,
) -> Result<()> {
    let budget = SearchBudget::from(budget);
    let mut game = Game::new();

    while game.ply() < plies && !game.outcome().is_over() {
        let mv = next_move(handle, &mut game, &budget).await?;
        let text = game.format_move(mv);
        game.make_move(mv)?;
        info!(ply = game.ply(), mv = text.as_str(), "move played");
        if !json {
            println!("{:>4}. {text}", game.ply());
        }
    }

    let outcome = game.outcome();
    let report = GameReport {
        engine: identity.clone(),
        moves: game.move_list(),
        result: outcome.result(),
        termination: format!("{outcome:?}"),
        final_fen: game.fen(),
    };

    if json {
        print_json(&report)
    } else {
        println!("result {} ({})", report.result, report.termination);
        Ok(())
    }
}

/// Request a move, retrying timeouts and restarting a dead engine.
async fn next_move(
    handle: &EngineHandle,
    game: &mut Game,
    budget: &SearchBudget,
) -> Result<cozy_chess::Move> {
    let mut attempt = 1;
    loop {
        match handle.request_move(game, budget, None).await {
            Ok(mv) => return Ok(mv),
            Err(err @ AppError::EngineTimeout(_)) if attempt < MAX_ATTEMPTS => {
                warn!(%err, attempt, "engine timed out, retrying");
            }
            Err(err @ (AppError::Transport(_) | AppError::Engine(_))) if attempt < MAX_ATTEMPTS => {
                warn!(%err, attempt, "engine failed, restarting");
                handle.restart().await?;
            }
            Err(err) => return Err(err),
        }
        attempt += 1;
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Config(format!("failed to serialise report: {err}")))?;
    println!("{text}");
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
