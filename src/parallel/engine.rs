//! The parallel best-first search engine (§4.5): P worker threads racing
//! over a shared solution bound, a sharded closed set and best-g table,
//! and a termination protocol whose correctness rests on every worker
//! publishing the f-cost of the node it is about to process *before* it
//! gives up its queue lock.

use crate::board::{Board, GoalLookup};
use crate::heuristic::Heuristic;
use crate::mode::SearchMode;
use crate::parallel::pool::{NodeId, PooledNode};
use crate::parallel::queue::{WorkerQueue, MIN_F_IDLE};
use crate::parallel::shard::{BestGTable, ClosedSet, DEFAULT_SHARD_COUNT};
use crate::solution::Solution;
use crate::stats::Stats;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

struct Shared {
    workers: Vec<WorkerQueue>,
    closed: ClosedSet,
    best_g: BestGTable,
    best_cost: AtomicU32,
    best_node: Mutex<Option<(usize, NodeId)>>,
    states_selected: AtomicU64,
    max_states: AtomicU64,
    stop_flag: AtomicBool,
}

impl Shared {
    fn bump_high_water(&self) {
        let live: u64 = self.workers.iter().map(|w| w.live_count() as u64).sum();
        self.max_states.fetch_max(live, Ordering::Relaxed);
    }

    fn all_workers_idle(&self) -> bool {
        self.workers.iter().all(|w| w.min_f() == MIN_F_IDLE)
    }

    fn min_over_workers(&self) -> u32 {
        self.workers.iter().map(|w| w.min_f()).min().unwrap_or(MIN_F_IDLE)
    }
}

/// Runs the parallel engine described in §4.5 with `threads` worker
/// threads (the caller is responsible for delegating `threads == 1` to
/// [`crate::sequential::solve`] instead, per §6). Returns `Ok(None)` only
/// when the puzzle has no solution, which the solvability pre-check
/// should have ruled out before this is ever called.
pub fn solve(
    initial: Board,
    goal: &Board,
    goal_lookup: &GoalLookup,
    heuristic: Heuristic,
    mode: SearchMode,
    threads: usize,
) -> Option<Solution> {
    assert!(threads >= 2, "the parallel engine requires at least 2 workers");

    let workers: Vec<WorkerQueue> = (0..threads).map(|_| WorkerQueue::new()).collect();
    let shared = Shared {
        workers,
        closed: ClosedSet::new(DEFAULT_SHARD_COUNT),
        best_g: BestGTable::new(DEFAULT_SHARD_COUNT),
        best_cost: AtomicU32::new(u32::MAX),
        best_node: Mutex::new(None),
        states_selected: AtomicU64::new(0),
        max_states: AtomicU64::new(0),
        stop_flag: AtomicBool::new(false),
    };

    let h0 = mode.h_cost(heuristic.evaluate(&initial, goal_lookup));
    let f0 = mode.f_cost(0, h0);
    shared.best_g.insert_if_absent(initial.clone(), 0);
    shared.workers[0].push(PooledNode {
        board: initial,
        g: 0,
        h: h0,
        f: f0,
        parent: None,
    });
    shared.bump_high_water();

    std::thread::scope(|scope| {
        for worker_id in 0..threads {
            let shared = &shared;
            scope.spawn(move || {
                worker_loop(worker_id, shared, goal, goal_lookup, heuristic, mode);
            });
        }
    });

    let best_node = *shared.best_node.lock().unwrap();
    let (owner, id) = best_node?;
    let path = reconstruct_path(&shared.workers, owner, id);

    Some(Solution {
        stats: Stats {
            states_selected: shared.states_selected.load(Ordering::Relaxed),
            max_states_in_memory: shared.max_states.load(Ordering::Relaxed),
            solution_length: (path.len() - 1) as u64,
            elapsed: std::time::Duration::ZERO,
            threads_used: threads,
        },
        path,
    })
}

fn worker_loop(
    self_id: usize,
    shared: &Shared,
    goal: &Board,
    goal_lookup: &GoalLookup,
    heuristic: Heuristic,
    mode: SearchMode,
) {
    let own = &shared.workers[self_id];
    let num_workers = shared.workers.len();

    loop {
        if shared.stop_flag.load(Ordering::Acquire) {
            return;
        }

        // `own.pop()` and `own.try_steal_from(..)` each publish this
        // worker's `min_f` themselves, under their own queue lock, before
        // returning — see queue.rs. Nothing here needs to touch `min_f`
        // directly: a failed pop already left it at idle, and it stays
        // there through a failed steal attempt until one succeeds.
        let found = match own.pop() {
            Some(hit) => Some(hit),
            None => {
                let mut stolen = None;
                for offset in 1..num_workers {
                    let victim_idx = (self_id + offset) % num_workers;
                    let victim = &shared.workers[victim_idx];
                    if victim.open_count() == 0 {
                        continue;
                    }
                    if let Some(hit) = own.try_steal_from(victim) {
                        stolen = Some(hit);
                        break;
                    }
                }
                stolen
            }
        };

        let (id, node) = match found {
            Some(x) => x,
            None => {
                if shared.all_workers_idle() {
                    shared.stop_flag.store(true, Ordering::Release);
                    return;
                }
                std::thread::yield_now();
                continue;
            }
        };

        shared.states_selected.fetch_add(1, Ordering::Relaxed);

        let best_cost = shared.best_cost.load(Ordering::SeqCst);
        if best_cost != u32::MAX && node.f >= best_cost {
            own.release(id);
            continue;
        }

        if shared.best_g.has_strictly_better(&node.board, node.g) {
            own.release(id);
            continue;
        }

        if !shared.closed.insert(node.board.clone()) {
            own.release(id);
            continue;
        }
        shared.bump_high_water();

        if node.board.is_goal(goal) {
            let prev = shared.best_cost.fetch_min(node.g, Ordering::SeqCst);
            if node.g <= prev {
                *shared.best_node.lock().unwrap() = Some((self_id, id));
            }
            if shared.best_cost.load(Ordering::SeqCst) <= shared.min_over_workers() {
                shared.stop_flag.store(true, Ordering::Release);
                return;
            }
            continue;
        }

        for (_, successor_board) in node.board.successors() {
            let g = node.g + 1;
            let h = mode.h_cost(heuristic.evaluate(&successor_board, goal_lookup));
            let f = mode.f_cost(g, h);

            let best_cost_now = shared.best_cost.load(Ordering::SeqCst);
            if best_cost_now != u32::MAX && f >= best_cost_now {
                continue;
            }

            if !shared.best_g.relax(&successor_board, g) {
                continue;
            }

            own.push(PooledNode {
                board: successor_board,
                g,
                h,
                f,
                parent: Some((self_id, id)),
            });
        }
        shared.bump_high_water();
    }
}

/// Walks parent references from `(owner, id)` back to the initial node
/// (whose `parent` is `None`), cloning boards out of worker pools into
/// caller-owned storage as it goes. Safe to call only after every worker
/// has stopped mutating its own pool.
fn reconstruct_path(workers: &[WorkerQueue], owner: usize, id: NodeId) -> Vec<Board> {
    let mut path = Vec::new();
    let mut current = Some((owner, id));
    while let Some((owner, id)) = current {
        let content = workers[owner].get(id);
        path.push(content.board);
        current = content.parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential;

    fn board3(tiles: &[u8]) -> Board {
        Board::from_tiles(3, tiles.to_vec()).unwrap()
    }

    fn board4(tiles: &[u8]) -> Board {
        Board::from_tiles(4, tiles.to_vec()).unwrap()
    }

    #[test]
    fn scenario_two_single_move_with_four_workers() {
        let goal = board3(&[1, 2, 3, 8, 0, 4, 7, 6, 5]);
        let initial = board3(&[1, 2, 3, 0, 8, 4, 7, 6, 5]);
        let lookup = GoalLookup::new(&goal);
        let solution = solve(initial, &goal, &lookup, Heuristic::Manhattan, SearchMode::AStar, 4).unwrap();
        assert_eq!(solution.stats.solution_length, 1);
        assert_eq!(solution.stats.threads_used, 4);
    }

    #[test]
    fn scenario_five_4x4_single_move_with_four_workers() {
        let goal = board4(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]);
        let initial = board4(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15]);
        let lookup = GoalLookup::new(&goal);
        let solution = solve(initial, &goal, &lookup, Heuristic::Manhattan, SearchMode::AStar, 4).unwrap();
        assert_eq!(solution.stats.solution_length, 1);
    }

    /// §8: "for any solved instance with P = 1 and P > 1 using the same H,
    /// the returned `solution_length` values are equal; the sequences may
    /// differ but each must be a legal path from initial to goal." The
    /// initial board here is six legal slides away from the goal (built by
    /// walking the goal forward through Left, Up, Left, Up, Right, Down),
    /// deep enough that the parallel engine actually has to steal and
    /// prune rather than finish on its first worker's first pop.
    #[test]
    fn parallel_and_sequential_solvers_agree_on_a_deeper_instance() {
        let goal = board3(&[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        let initial = board3(&[2, 4, 3, 1, 0, 6, 7, 5, 8]);
        let lookup = GoalLookup::new(&goal);

        let sequential_solution = sequential::solve(
            initial.clone(),
            &goal,
            &lookup,
            Heuristic::Manhattan,
            SearchMode::AStar,
        )
        .unwrap()
        .unwrap();
        let parallel_solution = solve(
            initial.clone(),
            &goal,
            &lookup,
            Heuristic::Manhattan,
            SearchMode::AStar,
            4,
        )
        .unwrap();

        assert_eq!(
            parallel_solution.stats.solution_length,
            sequential_solution.stats.solution_length
        );

        assert_eq!(parallel_solution.path.first(), Some(&initial));
        assert_eq!(parallel_solution.path.last(), Some(&goal));
        for pair in parallel_solution.path.windows(2) {
            let diff = (0..9).filter(|&i| pair[0].tile_at(i) != pair[1].tile_at(i)).count();
            assert_eq!(diff, 2, "each path step must be a single legal slide");
        }
    }

    #[test]
    fn unsolved_returns_none() {
        // An instance one odd transposition away from the goal is
        // infeasible regardless of worker count; the engine should drain
        // every queue and report no solution rather than hang.
        let goal = board3(&[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        let initial = board3(&[2, 1, 3, 4, 5, 6, 7, 8, 0]);
        let lookup = GoalLookup::new(&goal);
        let solution = solve(initial, &goal, &lookup, Heuristic::Manhattan, SearchMode::AStar, 4);
        assert!(solution.is_none());
    }
}
