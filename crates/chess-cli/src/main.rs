//! Chess CLI - perft, move listing and analysis for a FEN position.

mod report;

use std::path::PathBuf;

use anyhow::{bail, Context};
use chess_engine::{move_to_san, perft, perft_divide, FenRecord, Position};
use chess_search::{order_moves, ordering_score, spawn_search, CancellationToken, SearchConfig, SearchEvent};
use clap::{Parser, Subcommand};
use report::{format_evaluation, format_report, AnalysisJson};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Bitboard chess engine tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Position to start from
        #[arg(long, default_value = FenRecord::STARTPOS)]
        fen: String,
        /// Plies to expand
        #[arg(short, long, default_value = "4")]
        depth: u32,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// List legal moves, most promising first
    Moves {
        /// Position to list moves for
        #[arg(long, default_value = FenRecord::STARTPOS)]
        fen: String,
    },
    /// Search a position and print the best line
    Analyze {
        /// Position to analyze
        #[arg(long, default_value = FenRecord::STARTPOS)]
        fen: String,
        /// Plies to search; overrides the config file
        #[arg(short, long)]
        depth: Option<u32>,
        /// Search configuration file
        #[arg(long, default_value = "search.toml")]
        config: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_position(fen: &str) -> anyhow::Result<Position> {
    Position::from_fen(fen).with_context(|| format!("invalid FEN: {}", fen))
}

fn run_perft(fen: &str, depth: u32, divide: bool) -> anyhow::Result<()> {
    let mut position = parse_position(fen)?;
    if divide {
        let split = perft_divide(&mut position, depth);
        for (mv, nodes) in &split {
            println!("{}: {}", mv, nodes);
        }
        let total: u64 = split.iter().map(|(_, n)| n).sum();
        println!("\nNodes searched: {}", total);
    } else {
        println!("Nodes searched: {}", perft(&mut position, depth));
    }
    Ok(())
}

fn run_moves(fen: &str) -> anyhow::Result<()> {
    let position = parse_position(fen)?;
    if let Some(result) = position.result() {
        println!("Game over: {}", result);
        return Ok(());
    }

    let mut moves = position.legal_moves();
    order_moves(&mut moves);
    for m in &moves {
        println!(
            "{:<8} {:<6} {:>4}",
            move_to_san(&position, *m),
            m.to_coordinate(),
            ordering_score(m)
        );
    }
    println!("\n{} legal moves", moves.len());
    Ok(())
}

fn run_analyze(fen: &str, depth: Option<u32>, config_path: PathBuf, json: bool) -> anyhow::Result<()> {
    let position = parse_position(fen)?;
    let mut config = SearchConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(depth) = depth {
        config = config.with_depth(depth);
    }

    tracing::info!(depth = config.depth, fen = %position.to_fen(), "starting analysis");
    let handle = spawn_search(position.clone(), config, CancellationToken::new());

    let mut finished = None;
    for event in handle.events().iter() {
        match event {
            SearchEvent::Progress { nodes, elapsed } => {
                tracing::info!(nodes, elapsed_ms = elapsed.as_millis() as u64, "searching");
            }
            SearchEvent::DepthCompleted(report) => {
                tracing::info!(
                    depth = report.depth,
                    eval = %format_evaluation(report.evaluation),
                    nodes = report.nodes,
                    "depth completed"
                );
            }
            SearchEvent::Finished(report) => {
                finished = Some(report);
                break;
            }
        }
    }

    let Some(report) = finished else {
        bail!("search ended without a result");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&AnalysisJson::new(&position, &report))?);
    } else {
        println!("{}", format_report(&position, &report));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Perft { fen, depth, divide } => run_perft(&fen, depth, divide),
        Commands::Moves { fen } => run_moves(&fen),
        Commands::Analyze {
            fen,
            depth,
            config,
            json,
        } => run_analyze(&fen, depth, config, json),
    }
}
