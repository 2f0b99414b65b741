//! Result rendering (§6): a human-readable banner for interactive use,
//! and a `serde_json`-backed machine-readable surface for scripting.

use crate::board::{Board, Direction};
use crate::solution::Solution;
use crate::stats::Stats;
use serde::Serialize;

pub fn print_banner(initial: &Board, solution: Option<&Solution>) {
    match solution {
        None => println!("This puzzle is unsolvable."),
        Some(solution) => {
            println!("Initial board:");
            print_board(initial);
            println!();
            for (step, board) in solution.path.iter().enumerate() {
                println!("Step {step}:");
                print_board(board);
                println!();
            }
            print_stats(&solution.stats);
        }
    }
}

fn print_board(board: &Board) {
    let n = board.n() as usize;
    for r in 0..n {
        let row: Vec<String> = (0..n)
            .map(|c| board.tile_at(board.index(r, c)).to_string())
            .collect();
        println!("{}", row.join(" "));
    }
}

fn print_stats(stats: &Stats) {
    println!("states_selected:      {}", stats.states_selected);
    println!("max_states_in_memory: {}", stats.max_states_in_memory);
    println!("solution_length:      {}", stats.solution_length);
    println!("elapsed:              {:?}", stats.elapsed);
    println!("threads_used:         {}", stats.threads_used);
}

#[derive(Serialize)]
struct JsonStats {
    states_selected: u64,
    max_states_in_memory: u64,
    solution_length: u64,
    elapsed_ms: u128,
    threads_used: usize,
}

#[derive(Serialize)]
struct JsonOutput {
    solvable: bool,
    path: Vec<Vec<u8>>,
    moves: Vec<&'static str>,
    stats: Option<JsonStats>,
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

fn to_json_output(solution: Option<&Solution>) -> JsonOutput {
    match solution {
        None => JsonOutput {
            solvable: false,
            path: Vec::new(),
            moves: Vec::new(),
            stats: None,
        },
        Some(solution) => JsonOutput {
            solvable: true,
            path: solution.path.iter().map(|b| b.tiles().to_vec()).collect(),
            moves: solution.moves().into_iter().map(direction_name).collect(),
            stats: Some(JsonStats {
                states_selected: solution.stats.states_selected,
                max_states_in_memory: solution.stats.max_states_in_memory,
                solution_length: solution.stats.solution_length,
                elapsed_ms: solution.stats.elapsed.as_millis(),
                threads_used: solution.stats.threads_used,
            }),
        },
    }
}

pub fn print_json(solution: Option<&Solution>) -> serde_json::Result<()> {
    let output = to_json_output(solution);
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::stats::Stats;

    fn board(tiles: &[u8]) -> Board {
        Board::from_tiles(3, tiles.to_vec()).unwrap()
    }

    #[test]
    fn json_output_for_unsolvable_has_no_stats() {
        let output = to_json_output(None);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["solvable"], false);
        assert!(value["stats"].is_null());
    }

    #[test]
    fn json_output_for_solved_instance_reports_path_and_moves() {
        let initial = board(&[1, 2, 3, 0, 8, 4, 7, 6, 5]);
        let goal = board(&[1, 2, 3, 8, 0, 4, 7, 6, 5]);
        let solution = Solution {
            path: vec![initial, goal],
            stats: Stats {
                states_selected: 2,
                max_states_in_memory: 2,
                solution_length: 1,
                elapsed: std::time::Duration::from_millis(5),
                threads_used: 4,
            },
        };
        let output = to_json_output(Some(&solution));
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["solvable"], true);
        assert_eq!(value["moves"].as_array().unwrap().len(), 1);
        assert_eq!(value["path"].as_array().unwrap().len(), 2);
        assert_eq!(value["stats"]["threads_used"], 4);
    }
}
