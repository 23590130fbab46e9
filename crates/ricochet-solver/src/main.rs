//! CLI entry point for the Ricochet Robots solver.
//!
//! Usage:
//!   ricochet-solver solve <puzzle.json> [options]
//!   ricochet-solver solve --stdin [options]
//!   ricochet-solver heuristic --goal <x,y> [--from <x,y>] [--board <layout.txt>]
//!
//! Options:
//!   --board <file>          Wall layout file (default: bundled standard board)
//!   --timeout <seconds>     Maximum search time, 0 for none (default: 60)
//!   --max-expansions <n>    Maximum states to expand (default: unlimited)
//!   --no-path               Only report the move count
//!
//! Search progress is logged to stderr; set RUST_LOG=info or RUST_LOG=debug.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use ricochet_solver::{
    reachable_cells, solve, verify_solution, Board, HeuristicMap, Move, Position, PuzzleConfig,
    RicochetError, SolverConfig, WallGraph,
};

/// Exit code for unreadable or malformed input files
const EXIT_BAD_INPUT: i32 = 2;

#[derive(Parser)]
#[command(name = "ricochet-solver")]
#[command(about = "Best-first solver for Ricochet Robots puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle and print a JSON report
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Wall layout file
        #[arg(long, value_name = "LAYOUT")]
        board: Option<PathBuf>,

        /// Maximum search time in seconds (0 disables the limit)
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Maximum number of states to expand
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Skip path tracking and only report the move count
        #[arg(long)]
        no_path: bool,
    },
    /// Print the goal-distance map for a goal cell
    Heuristic {
        /// Goal cell as x,y
        #[arg(long)]
        goal: Position,

        /// Also print the cells a lone robot can stop on from this cell
        #[arg(long, value_name = "X,Y")]
        from: Option<Position>,

        /// Wall layout file
        #[arg(long, value_name = "LAYOUT")]
        board: Option<PathBuf>,
    },
}

/// Output format for a solve run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<Move>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    nodes_expanded: usize,
    states_visited: usize,
    time_elapsed_ms: u64,
}

impl SolveOutput {
    fn failure(error: &RicochetError) -> Self {
        let stats = error.stats().cloned().unwrap_or_default();
        Self {
            solved: false,
            moves: None,
            path: None,
            verified: None,
            error: Some(error.kind()),
            reason: Some(error.to_string()),
            nodes_expanded: stats.nodes_expanded,
            states_visited: stats.states_visited,
            time_elapsed_ms: stats.time_elapsed_ms,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Solve {
            file,
            stdin,
            board,
            timeout,
            max_expansions,
            no_path,
        } => {
            let config = SolverConfig {
                track_path: !no_path,
                timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
                max_expansions,
            };
            run_solve(file.as_deref(), stdin, board.as_deref(), &config)
        }
        Commands::Heuristic { goal, from, board } => run_heuristic(goal, from, board.as_deref()),
    };

    std::process::exit(code);
}

fn load_walls(layout: Option<&Path>) -> Result<WallGraph, String> {
    match layout {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("failed to read layout {:?}: {}", path, e))?;
            WallGraph::parse(&text).map_err(|e| format!("{:?}: {}", path, e))
        }
        None => WallGraph::standard().map_err(|e| e.to_string()),
    }
}

fn read_puzzle(file: Option<&Path>, stdin: bool) -> Result<PuzzleConfig, String> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("failed to read from stdin: {}", e))?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(path).map_err(|e| format!("failed to read file {:?}: {}", path, e))?
    } else {
        return Err("must provide either a file path or --stdin".to_string());
    };

    serde_json::from_str(&json_content).map_err(|e| format!("error parsing puzzle JSON: {}", e))
}

fn run_solve(file: Option<&Path>, stdin: bool, layout: Option<&Path>, config: &SolverConfig) -> i32 {
    let inputs = read_puzzle(file, stdin).and_then(|puzzle| Ok((puzzle, load_walls(layout)?)));
    let (puzzle, walls) = match inputs {
        Ok(inputs) => inputs,
        Err(message) => {
            log::error!("{}", message);
            return EXIT_BAD_INPUT;
        }
    };

    let output = match Board::from_puzzle(&walls, &puzzle) {
        Err(e) => SolveOutput::failure(&e),
        Ok((board, target)) => {
            log::debug!("starting board:\n{}", board);
            match solve(&board, target, config) {
                Ok(solution) => {
                    let verified = config
                        .track_path
                        .then(|| verify_solution(&board, target, &solution.path));
                    SolveOutput {
                        solved: true,
                        moves: Some(solution.moves),
                        verified,
                        path: config.track_path.then_some(solution.path),
                        error: None,
                        reason: None,
                        nodes_expanded: solution.stats.nodes_expanded,
                        states_visited: solution.stats.states_visited,
                        time_elapsed_ms: solution.stats.time_elapsed_ms,
                    }
                }
                Err(e) => SolveOutput::failure(&e),
            }
        }
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("failed to serialize report: {}", e);
            return 1;
        }
    }

    if output.solved {
        0
    } else {
        1
    }
}

fn run_heuristic(goal: Position, from: Option<Position>, layout: Option<&Path>) -> i32 {
    let walls = match load_walls(layout) {
        Ok(walls) => walls,
        Err(message) => {
            log::error!("{}", message);
            return EXIT_BAD_INPUT;
        }
    };

    let map = match HeuristicMap::flood_fill(&walls, goal) {
        Ok(map) => map,
        Err(e) => {
            log::error!("{}", e);
            return 1;
        }
    };
    println!("Goal {}: {} reachable cells", goal, map.reachable_count());
    print!("{}", map);

    if let Some(start) = from {
        let reach = reachable_cells(&walls, start);
        println!();
        println!("Stop cells from {}: {}", start, reach.count());
        print!("{}", reach);
    }

    0
}
