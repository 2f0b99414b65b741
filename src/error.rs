//! Crate-wide error type.
//!
//! Mirrors the error kinds catalogued in the specification: input/format
//! errors produced while building a [`crate::board::Board`] or reading a
//! puzzle file, configuration errors produced while validating CLI options,
//! and the one runtime error (I/O) that can occur at the boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // --- Input / format ---
    #[error("invalid size {0}: N must satisfy 3 <= N <= 16")]
    InvalidSize(usize),

    #[error("expected {expected} tile values but found {found}")]
    InvalidDimensions { expected: usize, found: usize },

    #[error("missing puzzle size: the first non-comment line must be an integer N")]
    MissingSize,

    #[error("board has no empty (0) tile")]
    NoEmptyTile,

    #[error("tile value {0} appears more than once")]
    DuplicateTile(u32),

    #[error("tile value {0} is out of range for this board")]
    InvalidTileValue(u32),

    #[error("tile value {0} is missing from the board")]
    MissingTile(u32),

    #[error("could not parse {0:?} as a tile value")]
    InvalidNumber(String),

    // --- Configuration ---
    #[error("conflicting options: {0}")]
    ConflictingOptions(&'static str),

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid heuristic {0:?}: expected one of manhattan, misplaced, linear")]
    InvalidHeuristic(String),

    #[error("invalid search mode {0:?}: expected one of astar, ucs, greedy")]
    InvalidSearchMode(String),

    #[error("invalid thread count {0}: must be at least 1")]
    InvalidThreads(usize),

    // --- Runtime ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
