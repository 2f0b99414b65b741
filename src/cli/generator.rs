//! The random puzzle generator (§6): the snail-spiral goal convention,
//! and a random-walk shuffler that keeps (or deliberately flips) the
//! goal's solvability class.

use crate::board::Board;
use crate::cli::args::ForcedParity;
use crate::solvability::is_solvable;
use rand::rngs::SmallRng;
use rand::Rng;

/// The goal board for side `n`: 1, 2, …, N²−1 laid out in a clockwise
/// inward spiral from the top-left, with 0 at the spiral's centre.
pub fn snail_goal(n: u8) -> Board {
    let side = n as usize;
    let size = side * side;
    let order = spiral_order(side);
    let mut tiles = vec![0u8; size];
    for (i, &(r, c)) in order.iter().enumerate() {
        let value = if i + 1 == size { 0 } else { (i + 1) as u8 };
        tiles[r * side + c] = value;
    }
    Board::from_tiles(n, tiles).expect("a freshly built spiral covers every tile value exactly once")
}

/// Row/column coordinates visited in clockwise, inward-spiral order
/// starting at the top-left corner of a `side`-by-`side` grid.
fn spiral_order(side: usize) -> Vec<(usize, usize)> {
    let mut order = Vec::with_capacity(side * side);
    let (mut top, mut bottom, mut left, mut right) =
        (0i64, side as i64 - 1, 0i64, side as i64 - 1);
    while top <= bottom && left <= right {
        for c in left..=right {
            order.push((top as usize, c as usize));
        }
        top += 1;
        if top > bottom {
            break;
        }
        for r in top..=bottom {
            order.push((r as usize, right as usize));
        }
        right -= 1;
        if left > right {
            break;
        }
        for c in (left..=right).rev() {
            order.push((bottom as usize, c as usize));
        }
        bottom -= 1;
        if top > bottom {
            break;
        }
        for r in (top..=bottom).rev() {
            order.push((r as usize, left as usize));
        }
        left += 1;
    }
    order
}

/// A random walk of `iterations` legal single-tile slides starting from
/// `goal`, each step picking uniformly among the 2–4 legal moves from
/// the current empty position.
pub fn shuffle(goal: &Board, iterations: u32, rng: &mut SmallRng) -> Board {
    let mut board = goal.clone();
    for _ in 0..iterations {
        let mut successors = board.successors();
        let pick = rng.gen_range(0..successors.len());
        board = successors.swap_remove(pick).1;
    }
    board
}

/// Swaps the first adjacent pair of non-zero tiles, which flips the
/// board's inversion parity without disturbing the empty cell's
/// position — used to steer a walk's result into the opposite
/// solvability class.
fn swap_one_adjacent_pair(board: &Board) -> Board {
    let mut tiles = board.tiles().to_vec();
    let pair = tiles
        .windows(2)
        .position(|pair| pair[0] != 0 && pair[1] != 0)
        .expect("a board of side >= 3 always has two adjacent non-zero tiles");
    tiles.swap(pair, pair + 1);
    Board::from_tiles(board.n(), tiles).expect("swapping two tile values preserves board invariants")
}

/// Builds the snail goal for `n`, shuffles it by `iterations` random
/// legal moves, and — if `force` asks for a parity the walk didn't
/// land on — performs one adjacent-tile swap to flip it.
pub fn generate(n: u8, iterations: u32, force: Option<ForcedParity>, rng: &mut SmallRng) -> (Board, Board) {
    let goal = snail_goal(n);
    let mut initial = shuffle(&goal, iterations, rng);
    match force {
        Some(ForcedParity::Unsolvable) if is_solvable(&initial, &goal) => {
            initial = swap_one_adjacent_pair(&initial);
        }
        Some(ForcedParity::Solvable) if !is_solvable(&initial, &goal) => {
            initial = swap_one_adjacent_pair(&initial);
        }
        _ => {}
    }
    (initial, goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snail_goal_matches_the_known_3x3_layout() {
        let goal = snail_goal(3);
        assert_eq!(goal.tiles(), &[1, 2, 3, 8, 0, 4, 7, 6, 5]);
    }

    #[test]
    fn snail_goal_matches_the_known_4x4_layout() {
        let goal = snail_goal(4);
        assert_eq!(
            goal.tiles(),
            &[1, 2, 3, 4, 12, 13, 14, 5, 11, 0, 15, 6, 10, 9, 8, 7]
        );
    }

    #[test]
    fn shuffled_board_always_stays_solvable_against_its_own_goal() {
        use rand::SeedableRng;
        let goal = snail_goal(4);
        let mut rng = SmallRng::seed_from_u64(7);
        let shuffled = shuffle(&goal, 500, &mut rng);
        assert!(is_solvable(&shuffled, &goal));
    }

    #[test]
    fn forcing_unsolvable_flips_an_otherwise_solvable_walk() {
        use rand::SeedableRng;
        let goal = snail_goal(3);
        let mut rng = SmallRng::seed_from_u64(1);
        let (initial, goal2) = generate(3, 200, Some(ForcedParity::Unsolvable), &mut rng);
        assert_eq!(goal, goal2);
        assert!(!is_solvable(&initial, &goal2));
    }

    #[test]
    fn forcing_solvable_is_consistent_with_the_walk() {
        use rand::SeedableRng;
        let mut rng = SmallRng::seed_from_u64(2);
        let (initial, goal) = generate(4, 300, Some(ForcedParity::Solvable), &mut rng);
        assert!(is_solvable(&initial, &goal));
    }
}
