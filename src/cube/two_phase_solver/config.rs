//! Solver configuration.

use crate::cube::CubeSize;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long the solver keeps searching.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    /// Return the first solution found.
    #[default]
    FirstFound,
    /// Keep looking for shorter solutions until the phase 1 depth reaches the length of the best
    /// one (which is then optimal for this search), or the time limit runs out.
    Optimize,
}

/// A flag shared between a running search and whoever wants to stop it. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that hasn't been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search holding this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything that controls a [`Solver`](super::Solver).
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub(crate) size: CubeSize,
    pub(crate) mode: SearchMode,
    pub(crate) max_moves: Option<usize>,
    pub(crate) max_time: Option<Duration>,
    pub(crate) cancel: Option<CancelToken>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(CubeSize::THREE)
    }
}

impl SolverConfig {
    /// First found search of cubes of the given size, with no time limit and the size's default
    /// move ceiling. For sizes above 3 only the reduced cube is solved, with outer layer turns
    /// (see [`CubeSize::new`]).
    pub fn new(size: CubeSize) -> Self {
        Self {
            size,
            mode: SearchMode::default(),
            max_moves: None,
            max_time: None,
            cancel: None,
        }
    }

    /// Set the search mode.
    #[must_use]
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Limit solutions to at most `max_moves` face turns.
    #[must_use]
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = Some(max_moves);
        self
    }

    /// Limit the time a single solve may take.
    #[must_use]
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Let the search be stopped through `token`.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The cube size this configuration solves.
    pub fn size(&self) -> CubeSize {
        self.size
    }

    /// The search mode.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The move ceiling, either configured or the default for the cube size.
    pub fn max_moves(&self) -> usize {
        self.max_moves.unwrap_or(self.size.move_ceiling())
    }

    /// The time limit, if any.
    pub fn max_time(&self) -> Option<Duration> {
        self.max_time
    }
}
