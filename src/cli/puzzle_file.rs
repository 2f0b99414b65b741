//! The puzzle file reader (§6): `#` comments, blank lines, and tile
//! values free to split across any number of lines.

use crate::board::Board;
use crate::error::{Error, Result};
use std::path::Path;

pub fn read_puzzle_file(path: &Path) -> Result<Board> {
    let text = std::fs::read_to_string(path)?;
    parse_puzzle(&text)
}

/// Parses the puzzle text format directly, for testing without touching
/// the filesystem and for any host embedding the crate with puzzle text
/// already in memory.
pub fn parse_puzzle(text: &str) -> Result<Board> {
    let mut tokens = text.lines().flat_map(|line| {
        let uncommented = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        uncommented.split_whitespace()
    });

    let n_token = tokens.next().ok_or(Error::MissingSize)?;
    let n: u8 = n_token
        .parse()
        .map_err(|_| Error::InvalidNumber(n_token.to_string()))?;
    if !(3..=16).contains(&n) {
        return Err(Error::InvalidSize(n as usize));
    }

    let expected = (n as usize) * (n as usize);
    let mut tiles = Vec::with_capacity(expected);
    for _ in 0..expected {
        let token = tokens.next().ok_or(Error::InvalidDimensions {
            expected,
            found: tiles.len(),
        })?;
        let value: u8 = token
            .parse()
            .map_err(|_| Error::InvalidNumber(token.to_string()))?;
        tiles.push(value);
    }

    Board::from_tiles(n, tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_line_puzzle() {
        let board = parse_puzzle("3\n1 2 3 8 0 4 7 6 5\n").unwrap();
        assert_eq!(board.tiles(), &[1, 2, 3, 8, 0, 4, 7, 6, 5]);
    }

    #[test]
    fn ignores_comments_and_blank_lines_and_splits_across_lines() {
        let text = "\
            # a 3x3 puzzle\n\
            3\n\
            \n\
            1 2 3  # first row\n\
            8 0 4\n\
            # comment-only line\n\
            7 6 5\n";
        let board = parse_puzzle(text).unwrap();
        assert_eq!(board.tiles(), &[1, 2, 3, 8, 0, 4, 7, 6, 5]);
    }

    #[test]
    fn missing_size_line_is_an_error() {
        let err = parse_puzzle("").unwrap_err();
        assert!(matches!(err, Error::MissingSize));
    }

    #[test]
    fn truncated_tile_list_is_an_error() {
        let err = parse_puzzle("3\n1 2 3\n").unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn non_numeric_size_is_an_error() {
        let err = parse_puzzle("three\n").unwrap_err();
        assert!(matches!(err, Error::InvalidNumber(_)));
    }
}
