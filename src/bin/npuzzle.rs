//! The `npuzzle` binary: wires argument parsing, puzzle acquisition, the
//! search engine, and result rendering together. All fallible plumbing here
//! is expressed with `anyhow`, per the corpus convention of keeping `thiserror`
//! for library-facing errors and `anyhow` for the binary's `main`.

use anyhow::Context;
use clap::Parser;
use npuzzle::cli::{generator, output, puzzle_file, Args};
use npuzzle::{solvability, Board, GoalLookup};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    let heuristic = args.heuristic()?;
    let mode = args.mode()?;
    let threads = args.threads()?;

    let (initial, goal) = match &args.puzzle_file {
        Some(path) => {
            let initial = puzzle_file::read_puzzle_file(path)
                .with_context(|| format!("reading puzzle file {}", path.display()))?;
            let goal = generator::snail_goal(initial.n());
            (initial, goal)
        }
        None => {
            let n = args.generate.expect("validate() requires a file or -g N");
            Board::new(n).with_context(|| format!("validating puzzle size {n}"))?;
            let mut rng = SmallRng::from_entropy();
            generator::generate(n, args.iterations, args.forced_parity(), &mut rng)
        }
    };

    if !solvability::is_solvable(&initial, &goal) {
        if args.json {
            output::print_json(None)?;
        } else {
            output::print_banner(&initial, None);
        }
        return Ok(());
    }

    let goal_lookup = GoalLookup::new(&goal);
    let solution = npuzzle::engine::solve(initial.clone(), &goal, &goal_lookup, heuristic, mode, threads)
        .context("running the search")?;

    if args.json {
        output::print_json(solution.as_ref())?;
    } else {
        output::print_banner(&initial, solution.as_ref());
    }

    Ok(())
}
