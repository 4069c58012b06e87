//! Command-line driver for the puzzle worlds.
//!
//! Usage:
//!   waymark <puzzle> [--input FILE] [options]
//!
//! `<puzzle>` is a world name (`elevator`, `cubicle_maze`, `vault_doors`,
//! `storage_grid`, `duct_maze`) or its day (`day11` .. `day24`). Input is
//! read from stdin when `--input` is absent. Set `RUST_LOG=debug` to watch
//! the engine.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use waymark_puzzles::contract::{MetricChoice, PuzzleError};
use waymark_puzzles::runner::{run_puzzle, PuzzleKind, RunConfig};
use waymark_puzzles::worlds::elevator::ElevatorHeuristic;
use waymark_puzzles::worlds::storage_grid::SlidingDataHeuristic;
use waymark_search::policy::{LayerScheduler, SearchPolicy};

#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Best-first search over Advent of Code 2016 puzzle worlds")]
#[command(version)]
struct Cli {
    /// Puzzle to solve
    #[arg(value_parser = parse_kind)]
    puzzle: PuzzleKind,

    /// Puzzle input file (stdin if omitted)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Frontier ordering; elevator defaults to layered search
    #[arg(long, value_parser = parse_metric)]
    metric: Option<MetricChoice>,

    /// Layer scheduling for layered search
    #[arg(long, value_enum, default_value = "sequential")]
    scheduler: Scheduler,

    /// Worker threads for the parallel scheduler (global pool if omitted)
    #[arg(long)]
    threads: Option<usize>,

    /// Favourite number for the cubicle maze, overriding the input
    #[arg(long)]
    favourite: Option<u64>,

    /// Cubicle maze destination as X,Y
    #[arg(long, value_parser = parse_position, default_value = "31,39")]
    dest: (i64, i64),

    /// Step limit for the cubicle reachability count
    #[arg(long, default_value = "50")]
    steps: u32,

    /// Hard cap on node expansions
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Depth cutoff
    #[arg(long)]
    max_depth: Option<u32>,

    /// Wall-clock budget in milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Extra element pair on the elevator's ground floor (repeatable)
    #[arg(long = "extra-pair", value_name = "ELEMENT")]
    extra_pairs: Vec<String>,

    /// Elevator heuristic weight as NUM/DEN
    #[arg(long, value_parser = parse_weight)]
    elevator_weight: Option<ElevatorHeuristic>,

    /// Storage grid heuristic factor (non-negative)
    #[arg(long, value_parser = parse_factor, default_value = "3", allow_hyphen_values = true)]
    storage_factor: SlidingDataHeuristic,

    /// Print search counters as JSON after the answers
    #[arg(long)]
    stats: bool,

    /// Print the puzzle diagram before the answers
    #[arg(long)]
    draw: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scheduler {
    Sequential,
    Parallel,
}

fn parse_kind(s: &str) -> Result<PuzzleKind, String> {
    s.parse().map_err(|e: PuzzleError| e.to_string())
}

fn parse_metric(s: &str) -> Result<MetricChoice, String> {
    s.parse().map_err(|e: PuzzleError| e.to_string())
}

fn parse_position(s: &str) -> Result<(i64, i64), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x {x:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y {y:?}: {e}"))?;
    Ok((x, y))
}

fn parse_weight(s: &str) -> Result<ElevatorHeuristic, String> {
    let (num, den) = s.split_once('/').ok_or_else(|| format!("expected NUM/DEN, got {s:?}"))?;
    let num = num.trim().parse().map_err(|e| format!("bad numerator {num:?}: {e}"))?;
    let den = den.trim().parse().map_err(|e| format!("bad denominator {den:?}: {e}"))?;
    ElevatorHeuristic::new(num, den).map_err(|e| e.to_string())
}

fn parse_factor(s: &str) -> Result<SlidingDataHeuristic, String> {
    let factor = s.trim().parse().map_err(|e| format!("bad factor {s:?}: {e}"))?;
    SlidingDataHeuristic::new(factor).map_err(|e| e.to_string())
}

impl Cli {
    fn config(&self) -> RunConfig {
        let mut policy = SearchPolicy::default();
        if let Some(n) = self.max_expansions {
            policy.max_expansions = n;
        }
        if let Some(d) = self.max_depth {
            policy.max_depth = d;
        }
        policy.time_budget = self.time_budget_ms.map(Duration::from_millis);
        policy.scheduler = match self.scheduler {
            Scheduler::Sequential => LayerScheduler::Sequential,
            Scheduler::Parallel => LayerScheduler::Parallel { threads: self.threads },
        };

        RunConfig {
            metric: self.metric,
            policy,
            favourite: self.favourite,
            destination: self.dest,
            reach_steps: self.steps,
            extra_pairs: self.extra_pairs.clone(),
            elevator_heuristic: self.elevator_weight.unwrap_or_default(),
            storage_heuristic: self.storage_factor,
        }
    }

    fn read_input(&self) -> io::Result<String> {
        match &self.input {
            Some(path) => fs::read_to_string(path),
            None if self.favourite.is_some() && self.puzzle == PuzzleKind::CubicleMaze => Ok(String::new()),
            None => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let input = match cli.read_input() {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: cannot read input: {e}");
            return ExitCode::from(2);
        }
    };

    let report = match run_puzzle(cli.puzzle, &input, &cli.config()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.draw {
        for line in &report.diagram {
            println!("{line}");
        }
        println!();
    }
    for answer in &report.answers {
        println!("{}: {}", answer.label, answer.value);
    }
    if cli.stats {
        match serde_json::to_string_pretty(&report.to_json_value()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: cannot encode stats: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
