//! A two phase solver for cubes from 2x2x2 up to 7x7x7.
//!
//! Cubes are modelled at the cubie level of their outer layers (see [`cube`]), which for the big
//! cubes is the reduced cube. The solver follows Kociemba's two phase algorithm: move tables and
//! pruning tables are built once per piece layout and shared through a
//! [`TableCache`](cube::two_phase_solver::TableCache), then each solve is an iterative deepening
//! search over coordinates.
//!
//! ```no_run
//! use twophase::cube::moves::{Face, FaceTurn};
//! use twophase::cube::two_phase_solver::{Solver, SolverConfig, TableCache};
//! use twophase::cube::{CubeSize, CubieCube};
//! use twophase::moves::MoveSequence;
//! use twophase::mv;
//!
//! let cache = TableCache::new();
//! let solver = Solver::new(SolverConfig::new(CubeSize::THREE), &cache).unwrap();
//! let cube = CubieCube::SOLVED.make_moves(MoveSequence(vec![mv!(R, 1), mv!(U, 3)]));
//! let solution = solver.solve(&cube).unwrap();
//! assert!(cube.make_moves(solution.moves()).is_solved());
//! ```

#![deny(missing_docs)]

pub mod coord;
pub mod cube;
pub mod error;
pub mod moves;
