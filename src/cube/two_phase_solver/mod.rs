//! An implementation of the two phase solver described [here](https://kociemba.org/cube.htm).
//!
//! Phase 1 brings the cube into the subgroup `<U, D, R2, L2, F2, B2>` (corners twisted and edges
//! flipped correctly, middle slice edges in the middle slice) and phase 2 solves it using only
//! moves of that subgroup. Both phases are iterative deepening searches guided by pruning tables.
//! Every phase 1 solution of the current depth is handed to phase 2, so that in
//! [`SearchMode::Optimize`] the solver keeps finding shorter total solutions. Phase 1 keeps
//! deepening up to the move limit: twelve moves always reach the subgroup, but the phase 1 part
//! of a short total solution can be longer.

mod config;
mod move_tables;
mod prune;
mod tables;

pub use config::{CancelToken, SearchMode, SolverConfig};
pub use tables::{TableCache, Tables};

use move_tables::{DominoMove, SubMove};

use super::coords::{
    CPCoord, COCoord, DominoEPCoord, DominoESliceCoord, EOCoord, ESliceEdgeCoord,
};
use super::moves::{Face, FaceTurn};
use super::CubieCube;
use crate::coord::Coordinate;
use crate::error::{Bound, SolveError, TableError};
use crate::moves::MoveSequence;

use log::{debug, info, trace};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation and the time limit are checked every this many nodes.
const CHECK_INTERVAL: usize = 4096;

struct Phase1;
struct Phase2;

trait Phase {
    type Cube: Copy;
    type Move: SubMove;
    type Prune: PhasePrune;

    fn get_cube(cube: &CubieCube) -> Self::Cube;

    fn make_move(tables: &Tables, cube: Self::Cube, m: Self::Move) -> Self::Cube;

    fn init_prune(tables: &Tables, c: Self::Cube) -> Option<Self::Prune>;

    fn update_prune(tables: &Tables, p: Self::Prune, c: Self::Cube) -> Self::Prune;

    /// Called when a search of this phase reaches its goal using exactly the full depth. Returns
    /// whether the whole search is over.
    fn found(search: &mut Search<'_>, sol: &[Self::Move]) -> Result<bool, Interrupt>;
}

impl Phase for Phase1 {
    type Cube = P1Cube;
    type Move = FaceTurn;
    type Prune = P1PruneState;

    fn get_cube(c: &CubieCube) -> P1Cube {
        P1Cube {
            co: COCoord::from_puzzle(c),
            eo: EOCoord::from_puzzle(c),
            slice: ESliceEdgeCoord::from_puzzle(c),
        }
    }

    fn make_move(tables: &Tables, cube: P1Cube, m: FaceTurn) -> P1Cube {
        P1Cube {
            co: tables.co.make_move(cube.co, m),
            eo: tables.eo.make_move(cube.eo, m),
            slice: tables.slice.make_move(cube.slice, m),
        }
    }

    fn init_prune(tables: &Tables, c: P1Cube) -> Option<P1PruneState> {
        Some(P1PruneState {
            co_eo: tables.twist_flip.bound(c.co, c.eo)?,
            co_slice: tables.twist_slice.bound(c.co, c.slice)?,
            eo_slice: tables.flip_slice.bound(c.eo, c.slice)?,
        })
    }

    fn update_prune(tables: &Tables, p: P1PruneState, c: P1Cube) -> P1PruneState {
        P1PruneState {
            co_eo: tables.twist_flip.update(p.co_eo, c.co, c.eo),
            co_slice: tables.twist_slice.update(p.co_slice, c.co, c.slice),
            eo_slice: tables.flip_slice.update(p.eo_slice, c.eo, c.slice),
        }
    }

    fn found(search: &mut Search<'_>, sol: &[FaceTurn]) -> Result<bool, Interrupt> {
        // Ending on a phase 2 move means a shorter phase 1 solution was already handed to
        // phase 2, with more moves to spare.
        if sol.last().is_some_and(|&m| DominoMove::from_move(m).is_some()) {
            return Ok(false);
        }
        search.phase2(sol)
    }
}

impl Phase for Phase2 {
    type Cube = P2Cube;
    type Move = DominoMove;
    type Prune = P2PruneState;

    fn get_cube(c: &CubieCube) -> P2Cube {
        P2Cube {
            cp: CPCoord::from_puzzle(c),
            ep: DominoEPCoord::from_puzzle(c),
            slice: DominoESliceCoord::from_puzzle(c),
        }
    }

    fn make_move(tables: &Tables, cube: P2Cube, m: DominoMove) -> P2Cube {
        P2Cube {
            cp: tables.cp.make_move(cube.cp, m),
            ep: tables.ep.make_move(cube.ep, m),
            slice: tables.d_slice.make_move(cube.slice, m),
        }
    }

    fn init_prune(tables: &Tables, c: P2Cube) -> Option<P2PruneState> {
        Some(P2PruneState {
            cp_slice: tables.cp_slice.bound(c.cp, c.slice)?,
            ep_slice: tables.ep_slice.bound(c.ep, c.slice)?,
        })
    }

    fn update_prune(tables: &Tables, p: P2PruneState, c: P2Cube) -> P2PruneState {
        P2PruneState {
            cp_slice: tables.cp_slice.update(p.cp_slice, c.cp, c.slice),
            ep_slice: tables.ep_slice.update(p.ep_slice, c.ep, c.slice),
        }
    }

    fn found(_: &mut Search<'_>, _: &[DominoMove]) -> Result<bool, Interrupt> {
        Ok(true)
    }
}

#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
struct P1Cube {
    co: COCoord,
    eo: EOCoord,
    slice: ESliceEdgeCoord,
}

#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
struct P2Cube {
    cp: CPCoord,
    ep: DominoEPCoord,
    slice: DominoESliceCoord,
}

/// The exact distances of each coordinate pair to solved. The pruning tables are exact, so the
/// phase goal is reached exactly when the combined bound is 0.
trait PhasePrune: Copy {
    fn val(self) -> usize;
}

#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
struct P1PruneState {
    co_eo: usize,
    co_slice: usize,
    eo_slice: usize,
}

#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
struct P2PruneState {
    cp_slice: usize,
    ep_slice: usize,
}

impl PhasePrune for P1PruneState {
    fn val(self) -> usize {
        self.co_eo.max(self.co_slice).max(self.eo_slice)
    }
}

impl PhasePrune for P2PruneState {
    fn val(self) -> usize {
        self.cp_slice.max(self.ep_slice)
    }
}

/// Turning the same face twice in a row is never useful, and of two opposite faces (which
/// commute) only one order is searched.
fn allowed(prev: Option<Face>, next: Face) -> bool {
    match prev {
        None => true,
        Some(prev) => next != prev && !(next == prev.opposite() && next < prev),
    }
}

/// Why a search stopped early.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Interrupt {
    Cancelled,
    OutOfTime,
}

/// A solution, split into the moves of each phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    phase1: MoveSequence<FaceTurn>,
    phase2: MoveSequence<FaceTurn>,
    optimal: bool,
}

impl Solution {
    /// The moves that bring the cube into the phase 2 subgroup.
    pub fn phase1(&self) -> &MoveSequence<FaceTurn> {
        &self.phase1
    }

    /// The moves that solve the cube from there.
    pub fn phase2(&self) -> &MoveSequence<FaceTurn> {
        &self.phase2
    }

    /// The whole solution, with moves at the phase boundary merged.
    pub fn moves(&self) -> MoveSequence<FaceTurn> {
        self.phase1.clone().append(self.phase2.clone()).cancel()
    }

    /// The number of face turns in [`moves`](Solution::moves).
    pub fn len(&self) -> usize {
        self.moves().len()
    }

    /// Whether the search proved that no shorter solution exists. Only an
    /// [`Optimize`](SearchMode::Optimize) search that ran to completion proves this; a first found
    /// solution, or the best one found before the time limit, is not known to be optimal.
    pub fn is_optimal(&self) -> bool {
        self.optimal
    }

    /// Whether the cube was already solved.
    pub fn is_empty(&self) -> bool {
        self.phase1.is_empty() && self.phase2.is_empty()
    }
}

/// Shows both phases separated by a dot, followed by the length in face turns, e.g.
/// `R U' . D2 B2 (4f)`.
impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.phase1.is_empty() {
            write!(f, "{} ", self.phase1)?;
        }
        write!(f, ".")?;
        if !self.phase2.is_empty() {
            write!(f, " {}", self.phase2)?;
        }
        write!(f, " ({}f)", self.len())
    }
}

/// The state of a single solve.
struct Search<'a> {
    tables: &'a Tables,
    scramble: &'a CubieCube,
    mode: SearchMode,
    max_moves: usize,
    max_time: Option<Duration>,
    cancel: Option<&'a CancelToken>,
    start: Instant,
    nodes: usize,
    best: Option<Solution>,
}

impl Search<'_> {
    fn check(&self) -> Result<(), Interrupt> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(Interrupt::Cancelled);
        }
        if self.max_time.is_some_and(|t| self.start.elapsed() >= t) {
            return Err(Interrupt::OutOfTime);
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), Interrupt> {
        self.nodes += 1;
        if self.nodes % CHECK_INTERVAL == 0 {
            self.check()
        } else {
            Ok(())
        }
    }

    /// Solutions must be strictly shorter than this many moves plus one.
    fn move_limit(&self) -> usize {
        match (&self.best, self.mode) {
            (Some(best), SearchMode::Optimize) => self.max_moves.min(best.len().saturating_sub(1)),
            _ => self.max_moves,
        }
    }

    fn run(&mut self) -> Result<Solution, SolveError> {
        if let Err(i) = self.check() {
            return self.interrupted(i);
        }

        let cube = Phase1::get_cube(self.scramble);
        let Some(prune) = Phase1::init_prune(self.tables, cube) else {
            return Err(SolveError::BoundExceeded(Bound::Moves(self.max_moves)));
        };
        let mut sol = Vec::new();

        // The limit drops every time Optimize finds a shorter solution
        let mut depth = prune.val();
        while depth <= self.move_limit() {
            debug!("Searching phase 1 depth {depth}");
            let depth_start = Instant::now();
            match self.search_phase::<Phase1>(cube, prune, &mut sol, None, depth) {
                Ok(true) => break,
                Ok(false) => {}
                Err(i) => return self.interrupted(i),
            }
            debug!(
                "Traversed phase 1 depth {depth} in {:?}, {} nodes so far",
                depth_start.elapsed(),
                self.nodes
            );

            if let Err(i) = self.check() {
                return self.interrupted(i);
            }
            depth += 1;
        }

        let mut best = self
            .best
            .take()
            .ok_or(SolveError::BoundExceeded(Bound::Moves(self.max_moves)))?;
        best.optimal = self.mode == SearchMode::Optimize;
        Ok(best)
    }

    fn interrupted(&mut self, i: Interrupt) -> Result<Solution, SolveError> {
        match i {
            Interrupt::Cancelled => Err(SolveError::Cancelled),
            Interrupt::OutOfTime => {
                let limit = self.max_time.unwrap_or_default();
                info!("Out of time after {:?}", self.start.elapsed());
                self.best
                    .take()
                    .ok_or(SolveError::BoundExceeded(Bound::Time(limit)))
            }
        }
    }

    /// Finish the phase 1 solution `p1` with the shortest phase 2 solution that fits in the
    /// remaining moves.
    fn phase2(&mut self, p1: &[FaceTurn]) -> Result<bool, Interrupt> {
        let Some(allowance) = self.move_limit().checked_sub(p1.len()) else {
            return Ok(false);
        };

        let cube = self.scramble.clone().make_moves(p1.iter().copied().collect());
        let c = Phase2::get_cube(&cube);
        let Some(prune) = Phase2::init_prune(self.tables, c) else {
            return Ok(false);
        };
        trace!(
            "Phase 1 solution {}, phase 2 needs at least {} of {allowance} moves",
            itertools::join(p1, " "),
            prune.val()
        );

        let mut sol = Vec::new();
        for depth in prune.val()..=allowance {
            if self.search_phase::<Phase2>(c, prune, &mut sol, None, depth)? {
                let solution = Solution {
                    phase1: p1.iter().copied().collect(),
                    phase2: std::mem::take(&mut sol)
                        .into_iter()
                        .map(SubMove::into_move)
                        .collect(),
                    optimal: false,
                };
                info!("Found {solution} after {:?}", self.start.elapsed());
                self.best = Some(solution);
                return Ok(self.mode == SearchMode::FirstFound);
            }
        }

        Ok(false)
    }

    fn search_phase<P: Phase>(
        &mut self,
        cube: P::Cube,
        prune: P::Prune,
        sol: &mut Vec<P::Move>,
        prev: Option<Face>,
        togo: usize,
    ) -> Result<bool, Interrupt> {
        if prune.val() > togo {
            return Ok(false);
        }
        if togo == 0 {
            // Only reached with a bound of 0, which is the goal
            return P::found(self, sol);
        }
        self.tick()?;

        for &m in P::Move::MOVE_LIST {
            let face = m.face();
            if !allowed(prev, face) {
                continue;
            }

            let cube2 = P::make_move(self.tables, cube, m);
            let prune2 = P::update_prune(self.tables, prune, cube2);
            sol.push(m);
            if self.search_phase::<P>(cube2, prune2, sol, Some(face), togo - 1)? {
                return Ok(true);
            }
            sol.pop();
        }

        Ok(false)
    }
}

/// A cube solver that uses Kociemba's two phase algorithm.
pub struct Solver {
    config: SolverConfig,
    tables: Arc<Tables>,
}

impl Solver {
    /// Create a solver, building the tables for the configured size if `cache` doesn't have them
    /// yet.
    pub fn new(config: SolverConfig, cache: &TableCache) -> Result<Self, TableError> {
        let tables = cache.get(config.size())?;
        Ok(Self { config, tables })
    }

    /// The configuration this solver was made with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Obtain a solving sequence for the cube (such that applying the sequence solves the cube).
    pub fn solve(&self, cube: &CubieCube) -> Result<Solution, SolveError> {
        if cube.size() != self.config.size() {
            return Err(SolveError::SizeMismatch {
                expected: self.config.size().layers(),
                found: cube.size().layers(),
            });
        }

        let mut search = Search {
            tables: &self.tables,
            scramble: cube,
            mode: self.config.mode(),
            max_moves: self.config.max_moves(),
            max_time: self.config.max_time(),
            cancel: self.config.cancel.as_ref(),
            start: Instant::now(),
            nodes: 0,
            best: None,
        };

        info!(
            "Solving {} cube, {:?} within {} moves",
            self.config.size(),
            search.mode,
            search.max_moves
        );
        let result = search.run();
        match &result {
            Ok(sol) => info!(
                "Solved in {:?} with {} nodes: {sol}",
                search.start.elapsed(),
                search.nodes
            ),
            Err(e) => info!("No solution after {} nodes: {e}", search.nodes),
        }
        result
    }
}
