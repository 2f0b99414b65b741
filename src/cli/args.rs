//! Command-line surface (§6), implemented with `clap`'s derive API per
//! the corpus convention of a `#[derive(Parser)]` args struct whose
//! `--help` text comes straight from doc comments.

use crate::error::{Error, Result};
use crate::heuristic::Heuristic;
use crate::mode::SearchMode;
use clap::Parser;
use std::path::PathBuf;

/// Optimal solver for the sliding-tile N-puzzle.
#[derive(Parser, Debug)]
#[command(name = "npuzzle", version, about, long_about = None)]
pub struct Args {
    /// Puzzle file to read. Omit and pass -g N to generate one instead.
    #[arg(value_name = "FILE")]
    pub puzzle_file: Option<PathBuf>,

    /// Generate a random N x N puzzle instead of reading a file.
    #[arg(short = 'g', long = "generate", value_name = "N")]
    pub generate: Option<u8>,

    /// Heuristic used to estimate remaining distance.
    #[arg(long = "heuristic", default_value = "manhattan")]
    pub heuristic: String,

    /// Search mode.
    #[arg(long = "search", default_value = "astar")]
    pub search: String,

    /// Worker thread count (default: detected CPU count).
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Force the generator to produce a solvable puzzle.
    #[arg(short = 's')]
    pub solvable: bool,

    /// Force the generator to produce an unsolvable puzzle.
    #[arg(short = 'u')]
    pub unsolvable: bool,

    /// Shuffle iterations used by the generator.
    #[arg(short = 'i', long = "iterations", default_value_t = 10_000)]
    pub iterations: u32,

    /// Emit the machine-readable JSON surface instead of the banner.
    #[arg(long)]
    pub json: bool,

    /// Raise the log level: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Which parity the generator should be steered toward, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedParity {
    Solvable,
    Unsolvable,
}

impl Args {
    /// Cross-option validation the derive macro can't express on its
    /// own: exactly one of a puzzle file or `-g` must be given, and `-s`
    /// / `-u` are mutually exclusive.
    pub fn validate(&self) -> Result<()> {
        match (&self.puzzle_file, self.generate) {
            (None, None) => return Err(Error::MissingArgument("a puzzle file or -g N")),
            (Some(_), Some(_)) => {
                return Err(Error::ConflictingOptions(
                    "a puzzle file and -g N are mutually exclusive",
                ))
            }
            _ => {}
        }
        if self.solvable && self.unsolvable {
            return Err(Error::ConflictingOptions("-s and -u are mutually exclusive"));
        }
        Ok(())
    }

    pub fn heuristic(&self) -> Result<Heuristic> {
        self.heuristic.parse()
    }

    pub fn mode(&self) -> Result<SearchMode> {
        self.search.parse()
    }

    pub fn forced_parity(&self) -> Option<ForcedParity> {
        if self.unsolvable {
            Some(ForcedParity::Unsolvable)
        } else if self.solvable {
            Some(ForcedParity::Solvable)
        } else {
            None
        }
    }

    /// Resolved thread count: the explicit `-t`, or the detected CPU
    /// count when omitted.
    pub fn threads(&self) -> Result<usize> {
        match self.threads {
            Some(0) => Err(Error::InvalidThreads(0)),
            Some(n) => Ok(n),
            None => Ok(std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)),
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
