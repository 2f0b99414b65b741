//! The result of a successful search: the path and the statistics that
//! accompanied it.

use crate::board::Board;
use crate::stats::Stats;

#[derive(Debug, Clone)]
pub struct Solution {
    /// Boards from the initial board to the goal, inclusive. Length is
    /// always `stats.solution_length + 1`.
    pub path: Vec<Board>,
    pub stats: Stats,
}

impl Solution {
    /// The move sequence, derived from consecutive boards' empty-cell
    /// positions. Empty for a zero-length solution.
    pub fn moves(&self) -> Vec<crate::board::Direction> {
        use crate::board::Direction;
        self.path
            .windows(2)
            .map(|pair| {
                let (before, after) = (&pair[0], &pair[1]);
                let (br, bc) = before.coords(before.empty_index());
                let (ar, ac) = after.coords(after.empty_index());
                match (ar as i64 - br as i64, ac as i64 - bc as i64) {
                    (-1, 0) => Direction::Up,
                    (1, 0) => Direction::Down,
                    (0, -1) => Direction::Left,
                    (0, 1) => Direction::Right,
                    other => unreachable!("non-adjacent path step: {other:?}"),
                }
            })
            .collect()
    }
}
