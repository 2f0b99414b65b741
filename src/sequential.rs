//! The single-threaded reference solver (§4.4): classical A*/UCS/greedy
//! with lazy relaxation instead of decrease-key. `threads == 1` always
//! delegates here, and the parallel engine's correctness (same
//! `solution_length` for any thread count) is checked against it.

use crate::board::Board;
use crate::error::Result;
use crate::heuristic::Heuristic;
use crate::mode::SearchMode;
use crate::board::GoalLookup;
use crate::solution::Solution;
use crate::stats::Stats;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

struct SearchNode {
    board: Board,
    g: u32,
    h: u32,
    f: u32,
    parent: Option<Rc<SearchNode>>,
}

/// Ordered so that `BinaryHeap` (a max-heap) pops the *smallest* `(f, h)`
/// pair first, matching the teacher material's `SmallestCostHolder`
/// pattern of reversing the natural comparison.
struct HeapEntry(Rc<SearchNode>);

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.f == other.0.f && self.0.h == other.0.h
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .f
            .cmp(&self.0.f)
            .then_with(|| other.0.h.cmp(&self.0.h))
    }
}

/// Runs the sequential search described in §4.4. Returns `Ok(None)` only
/// when `open` drains without reaching the goal, which the solvability
/// pre-check (§4.6) should have ruled out for any caller that runs it
/// first.
pub fn solve(
    initial: Board,
    goal: &Board,
    goal_lookup: &GoalLookup,
    heuristic: Heuristic,
    mode: SearchMode,
) -> Result<Option<Solution>> {
    let mut open: BinaryHeap<HeapEntry> = BinaryHeap::new();
    let mut closed: FxHashSet<Board> = FxHashSet::default();
    let mut best_g: FxHashMap<Board, u32> = FxHashMap::default();

    let mut states_selected = 0u64;
    let mut max_states = 0u64;

    let h0 = mode.h_cost(heuristic.evaluate(&initial, goal_lookup));
    let f0 = mode.f_cost(0, h0);
    best_g.insert(initial.clone(), 0);
    open.push(HeapEntry(Rc::new(SearchNode {
        board: initial,
        g: 0,
        h: h0,
        f: f0,
        parent: None,
    })));
    max_states = max_states.max(open.len() as u64);

    while let Some(HeapEntry(node)) = open.pop() {
        states_selected += 1;

        if let Some(&known) = best_g.get(&node.board) {
            if known < node.g {
                continue;
            }
        }

        if node.board.is_goal(goal) {
            let path = reconstruct_path(&node);
            return Ok(Some(Solution {
                stats: Stats {
                    states_selected,
                    max_states_in_memory: max_states,
                    solution_length: (path.len() - 1) as u64,
                    elapsed: std::time::Duration::ZERO,
                    threads_used: 1,
                },
                path,
            }));
        }

        if !closed.insert(node.board.clone()) {
            continue;
        }
        max_states = max_states.max((open.len() + closed.len()) as u64);

        for (_, successor) in node.board.successors() {
            let g = node.g + 1;
            let h = mode.h_cost(heuristic.evaluate(&successor, goal_lookup));
            let f = mode.f_cost(g, h);

            if let Some(&known) = best_g.get(&successor) {
                if g >= known {
                    continue;
                }
            }
            best_g.insert(successor.clone(), g);
            open.push(HeapEntry(Rc::new(SearchNode {
                board: successor,
                g,
                h,
                f,
                parent: Some(node.clone()),
            })));
        }
        max_states = max_states.max((open.len() + closed.len()) as u64);
    }

    Ok(None)
}

fn reconstruct_path(goal_node: &Rc<SearchNode>) -> Vec<Board> {
    let mut path = Vec::new();
    let mut current = Some(goal_node.clone());
    while let Some(node) = current {
        path.push(node.board.clone());
        current = node.parent.clone();
    }
    path.reverse();
    path
}
