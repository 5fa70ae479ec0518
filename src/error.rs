//! This module defines general error types used throughout the crate.

use std::time::Duration;

use thiserror::Error;

/// Error type for converting integers to (C like) enums using TryFrom
#[derive(Debug, Error)]
pub enum TryFromIntToEnumError {
    /// attempted to convert integer into enum value, but integer was out of bounds
    #[error("attempted to convert integer into enum value, but integer was out of bounds")]
    OutOfBounds,
}

/// Errors raised while building move and pruning tables. These are configuration errors: they
/// happen before any search starts and mean the tables for a cube size can't be trusted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The requested side length is not one the solver knows how to model.
    #[error("unsupported cube size {0}, expected a side length between 2 and 7")]
    UnsupportedSize(u8),
    /// Writing a coordinate onto a cube and reading it back gave a different ordinal.
    #[error("coordinate {coord} does not round trip: wrote {ordinal}, read back {got}")]
    RoundTrip {
        /// Name of the coordinate type
        coord: &'static str,
        /// The ordinal that was written
        ordinal: usize,
        /// The ordinal that was read back
        got: usize,
    },
    /// The breadth first search of a pruning table did not reach every coordinate pair.
    #[error("pruning table {table} only reached {visited} of {total} entries")]
    IncompleteCoverage {
        /// Name of the pruning table
        table: &'static str,
        /// Entries reached by the search
        visited: usize,
        /// Entries in the table
        total: usize,
    },
}

/// The limit a search ran into before finding a solution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bound {
    /// No solution exists within this many moves.
    Moves(usize),
    /// The time budget ran out.
    Time(Duration),
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Moves(n) => write!(f, "{n} moves"),
            Bound::Time(d) => write!(f, "{:.3}s", d.as_secs_f64()),
        }
    }
}

/// Negative results of a solve.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// No solution was found within the configured move or time ceiling. Retrying with a larger
    /// bound may succeed.
    #[error("no solution found within {0}")]
    BoundExceeded(Bound),
    /// The caller cancelled the search.
    #[error("the search was cancelled")]
    Cancelled,
    /// The cube given to the solver has a different size to the one its tables were built for.
    #[error("solver is configured for size {expected} but the cube has size {found}")]
    SizeMismatch {
        /// Size of the solver
        expected: u8,
        /// Size of the cube
        found: u8,
    },
}
