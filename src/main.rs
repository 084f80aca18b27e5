use std::{
    path::PathBuf,
    process::ExitCode,
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::{bail, Context};
use clap::Parser;
use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};

use npuzzle::{
    generate, parse, replay, solve, Board, GoalLayout, Heuristic, KeyTable, Outcome,
    SearchOptions,
};

#[derive(Debug, Parser)]
#[command(name = "npuzzle", about = "Solve an n-puzzle with A*")]
struct Args {
    /// Puzzle file: a size line followed by `size` rows of numbers, `#` comments
    #[arg(conflicts_with = "random", required_unless_present = "random")]
    file: Option<PathBuf>,

    /// Generate a random solvable puzzle of this size instead of reading one
    #[arg(short, long, value_name = "SIZE")]
    random: Option<usize>,

    /// Random moves used to scramble a generated puzzle
    #[arg(long, default_value_t = 200)]
    scramble: usize,

    /// Goal layout: snail or ordered
    #[arg(short, long, default_value = "snail")]
    goal: GoalLayout,

    /// none, manhattan, hamming, linear-conflict (or nh, mh, rc, lc)
    #[arg(long, default_value = "manhattan")]
    heuristic: Heuristic,

    /// Ignore path length when ordering the frontier (fast, not optimal)
    #[arg(long)]
    greedy: bool,

    /// Keep generating moves that undo the previous move
    #[arg(long)]
    no_pruning: bool,

    /// Give up after expanding this many boards
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Seed for generated puzzles and hash keys
    #[arg(long)]
    seed: Option<u64>,

    /// Print every board along the solution
    #[arg(long)]
    play: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let initial = match (&args.file, args.random) {
        (Some(path), _) => parse::from_file(path)
            .with_context(|| format!("failed to read puzzle from {}", path.display()))?,
        (None, Some(size)) => {
            let goal = generate::solved(size, args.goal)?;
            generate::scrambled(&goal, args.scramble, &mut rng)
        }
        (None, None) => bail!("either a puzzle file or --random is required"),
    };

    if initial.size < 3 {
        bail!("puzzle size must be at least 3, got {}", initial.size);
    }

    let size = initial.size;
    let keys = Rc::new(match args.seed {
        Some(seed) => KeyTable::with_seed(size, seed),
        None => KeyTable::new(size),
    });
    let initial = Board::from_tiles(&initial, &keys);
    let goal = Board::from_tiles(&generate::solved(size, args.goal)?, &keys);

    println!("Initial:\n{}", initial);
    println!("Goal:\n{}", goal);

    let mut options = SearchOptions::default()
        .with_heuristic(args.heuristic)
        .with_greedy(args.greedy)
        .with_pruning(!args.no_pruning);
    if let Some(max) = args.max_expansions {
        options = options.with_max_expansions(max);
    }
    if let Some(secs) = args.timeout {
        options = options.with_time_limit(Duration::from_secs(secs));
    }

    let started = Instant::now();
    let report = solve(&initial, &goal, &options)?;
    let elapsed = started.elapsed();

    match &report.outcome {
        Outcome::Solved(moves) => {
            println!("Found a solution in {} moves:", moves.len());
            println!(
                "Expanded {} boards (peak of {} boards in memory) in {:?}.",
                report.expanded_count(),
                report.peak_resource_usage(),
                elapsed
            );
            println!("{}", moves.iter().join(" "));

            if args.play {
                let Some(boards) = replay(&initial, moves) else {
                    bail!("solution leaves the board during playback");
                };
                for (m, board) in moves.iter().zip_eq(&boards[1..]) {
                    println!("\n{}\n{}", m, board);
                }
            }
            Ok(true)
        }
        Outcome::Unsolvable => {
            println!("This puzzle is unsolvable");
            Ok(false)
        }
        Outcome::Aborted => {
            println!(
                "Gave up after expanding {} boards in {:?}",
                report.expanded_count(),
                elapsed
            );
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
