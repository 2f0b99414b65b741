//! Boundary between the sequential and parallel solvers (§6): picks the
//! implementation by thread count, times the call, and fills in the
//! ambient statistics (`elapsed`, `threads_used`) neither solver has any
//! other reason to know about.

use crate::board::{Board, GoalLookup};
use crate::error::Result;
use crate::heuristic::Heuristic;
use crate::mode::SearchMode;
use crate::solution::Solution;
use crate::{parallel, sequential};
use std::time::Instant;

/// Runs the search described in §4: `threads == 1` delegates to the
/// sequential reference solver, `threads > 1` to the parallel engine.
/// `threads == 0` is rejected at the CLI boundary (`InvalidThreads`), not
/// here, since this function's contract (per §6) only requires `threads
/// >= 1`. Returns `Ok(None)` iff no path exists from `initial` to `goal`.
pub fn solve(
    initial: Board,
    goal: &Board,
    goal_lookup: &GoalLookup,
    heuristic: Heuristic,
    mode: SearchMode,
    threads: usize,
) -> Result<Option<Solution>> {
    debug_assert_eq!(initial.n(), goal.n());
    debug_assert_eq!(initial.n(), goal_lookup.n());

    tracing::debug!(threads, ?mode, "starting search");
    let start = Instant::now();

    let mut solution = if threads <= 1 {
        sequential::solve(initial, goal, goal_lookup, heuristic, mode)?
    } else {
        parallel::solve(initial, goal, goal_lookup, heuristic, mode, threads)
    };

    if let Some(solution) = solution.as_mut() {
        solution.stats.elapsed = start.elapsed();
        solution.stats.threads_used = threads;
        tracing::debug!(
            cost = solution.stats.solution_length,
            states_selected = solution.stats.states_selected,
            "goal found"
        );
    } else {
        tracing::debug!("open set exhausted with no solution");
    }

    Ok(solution)
}
