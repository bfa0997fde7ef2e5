#![forbid(unsafe_code)]

//! `uci-stub-engine` — a scripted UCI engine.
//!
//! Speaks just enough UCI to stand in for a real engine in tests and demos.
//! By default it answers every `go` with the first legal move of the last
//! `position`; flags make it slow, silent, broken or stubborn so the client's
//! deadlines and recovery paths can be exercised.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

use uci_bridge::position::game::Game;
use uci_bridge::position::GamePosition;

#[derive(Debug, Parser)]
#[command(name = "uci-stub-engine", about = "Scripted UCI engine for tests", version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Value reported with `id name`.
    #[arg(long, default_value = "Stub Engine")]
    name: String,
    /// Value reported with `id author`.
    #[arg(long, default_value = "UCI Bridge Team")]
    author: String,
    /// Answers for successive searches; afterwards the first legal move.
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,
    /// Delay before every `bestmove`.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Delay before the first `bestmove` only.
    #[arg(long)]
    late_first_ms: Option<u64>,
    /// Identify but never send `uciok`.
    #[arg(long)]
    no_uciok: bool,
    /// Never answer `go`.
    #[arg(long)]
    silent: bool,
    /// Exit as soon as `go` arrives.
    #[arg(long)]
    exit_on_go: bool,
    /// Keep running after `quit` and stdin EOF.
    #[arg(long)]
    ignore_quit: bool,
    /// Append every received line to this file.
    #[arg(long)]
    record: Option<PathBuf>,
}

struct Stub {
    cli: Cli,
    out: Stdout,
    game: Game,
    script: VecDeque<String>,
    searches: usize,
}

impl Stub {
    async fn say(&mut self, line: &str) -> std::io::Result<()> {
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }

    fn record(&self, line: &str) -> std::io::Result<()> {
        if let Some(path) = &self.cli.record {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }

    /// Handle one command; `false` means exit.
    async fn handle(&mut self, line: &str) -> std::io::Result<bool> {
        self.record(line)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.first().copied() {
            Some("uci") => {
                let name = format!("id name {}", self.cli.name);
                let author = format!("id author {}", self.cli.author);
                self.say(&name).await?;
                self.say(&author).await?;
                self.say("option name Hash type spin default 16 min 1 max 1024")
                    .await?;
                self.say("option name Move Overhead type spin default 10 min 0 max 5000")
                    .await?;
                if !self.cli.no_uciok {
                    self.say("uciok").await?;
                }
            }
            Some("isready") => self.say("readyok").await?,
            Some("position") => {
                if let Err(err) = self.set_position(&tokens[1..]) {
                    self.say(&format!("info string bad position: {err}")).await?;
                }
            }
            Some("go") => {
                if self.cli.exit_on_go {
                    return Ok(false);
                }
                if !self.cli.silent {
                    self.search().await?;
                }
            }
            Some("quit") => return Ok(self.cli.ignore_quit),
            _ => {}
        }
        Ok(true)
    }

    fn set_position(&mut self, args: &[&str]) -> uci_bridge::Result<()> {
        let split = args.iter().position(|t| *t == "moves").unwrap_or(args.len());
        let (base, moves) = args.split_at(split);
        let moves = moves.get(1..).unwrap_or_default();

        let mut game = match base {
            ["startpos"] => Game::new(),
            ["fen", fen @ ..] => Game::from_fen(&fen.join(" "))?,
            _ => {
                return Err(uci_bridge::AppError::Position(format!(
                    "unsupported position {base:?}"
                )))
            }
        };
        game.play_uci(moves)?;
        self.game = game;
        Ok(())
    }

    async fn search(&mut self) -> std::io::Result<()> {
        let delay = match (self.searches, self.cli.late_first_ms) {
            (0, Some(ms)) => ms,
            _ => self.cli.delay_ms,
        };
        self.searches += 1;

        self.say("info depth 1 seldepth 1 score cp 13 nodes 20 nps 20000 pv")
            .await?;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let mv = self.script.pop_front().unwrap_or_else(|| {
            self.game
                .legal_moves()
                .first()
                .map_or_else(|| "(none)".to_owned(), |mv| self.game.format_move(*mv))
        });
        self.say(&format!("info depth 2 score cp 21 nodes 57 pv {mv}"))
            .await?;
        self.say(&format!("bestmove {mv}")).await
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let script = cli.moves.iter().cloned().collect();
    let mut stub = Stub {
        cli,
        out: tokio::io::stdout(),
        game: Game::new(),
        script,
        searches: 0,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !stub.handle(line.trim()).await? {
            return Ok(());
        }
    }

    if stub.cli.ignore_quit {
        // Outlive stdin until the client force-kills us.
        std::future::pending::<()>().await;
    }
    Ok(())
}
