//! Pruning tables for the two phase solver.
//!
//! Each table covers a pair of coordinates, as in Kociemba's original program: twist, flip and
//! slice choice pairwise for phase 1, and corner or edge permutation with the slice edge
//! permutation for phase 2.

use super::move_tables::{DominoMove, MoveTable, SubMove};
use crate::coord::Coordinate;
use crate::cube::coords::{
    CPCoord, COCoord, DominoEPCoord, DominoESliceCoord, EOCoord, ESliceEdgeCoord,
};
use crate::cube::moves::FaceTurn;
use crate::cube::{CubeSize, CubieCube};
use crate::error::TableError;

use log::{debug, info};
use std::sync::Arc;

const UNVISITED: u8 = 3;

/// A pruning table indexed by a pair of raw coordinates.
///
/// We store 4 entries per byte. An entry is the optimal search depth of the state modulo 3, see
/// https://kociemba.org/math/pruning.htm for a detailed explanation. Essentially though, we can
/// compute the whole pruning depth based on solely the pruning depth modulo 3 if we know the
/// pruning depth of the current state we are in, when searching. The stored depths are exact, so
/// they never overestimate the distance to the solved pair.
pub struct PruningTable<
    M: SubMove,
    A: Coordinate<CubieCube>,
    B: Coordinate<CubieCube>,
    const MOVES: usize,
> {
    table: Box<[u8]>,
    b_count: usize,
    max_depth: usize,
    a_moves: Arc<MoveTable<M, A, MOVES>>,
    b_moves: Arc<MoveTable<M, B, MOVES>>,
}

impl<M: SubMove, A: Coordinate<CubieCube>, B: Coordinate<CubieCube>, const MOVES: usize>
    PruningTable<M, A, B, MOVES>
{
    /// Generate the table with a breadth first search from the solved pair. Every pair must be
    /// reachable, otherwise the depth of a pair couldn't be recovered and this is a configuration
    /// error.
    pub fn generate(
        name: &'static str,
        size: CubeSize,
        a_moves: Arc<MoveTable<M, A, MOVES>>,
        b_moves: Arc<MoveTable<M, B, MOVES>>,
    ) -> Result<Self, TableError> {
        let total = A::count(size) * B::count(size);
        let mut table = Self {
            table: vec![0xff; total.div_ceil(4)].into_boxed_slice(),
            b_count: B::count(size),
            max_depth: 0,
            a_moves,
            b_moves,
        };

        let (a, b) = (A::default(), B::default());
        table.set(a, b, 0);
        let mut visited = 1;
        let mut stack = vec![(a, b)];
        let mut next = vec![];
        let mut depth = 1;

        while !stack.is_empty() {
            while let Some((a, b)) = stack.pop() {
                for &m in M::MOVE_LIST {
                    let a2 = table.a_moves.make_move(a, m);
                    let b2 = table.b_moves.make_move(b, m);
                    if table.query(a2, b2) == UNVISITED {
                        next.push((a2, b2));
                        table.set(a2, b2, (depth % 3) as u8);
                        visited += 1;
                    }
                }
            }

            if !next.is_empty() {
                table.max_depth = depth;
                debug!("{name}: {} entries at depth {depth}", next.len());
            }
            stack = std::mem::take(&mut next);
            depth += 1;
        }

        if visited != total {
            return Err(TableError::IncompleteCoverage {
                table: name,
                visited,
                total,
            });
        }

        info!(
            "Generated {name} pruning table for {size}: {total} entries, max depth {}",
            table.max_depth
        );
        Ok(table)
    }

    /// Compute the index and shift into the table given a coordinate pair.
    fn index(&self, a: A, b: B) -> (usize, usize) {
        let i = a.repr() * self.b_count + b.repr();
        (i >> 2, (i & 3) * 2)
    }

    /// Set the depth in the search tree of this coordinate pair modulo 3.
    fn set(&mut self, a: A, b: B, val: u8) {
        assert!(val & !3 == 0);
        let (index, shift) = self.index(a, b);

        self.table[index] &= !(3 << shift);
        self.table[index] |= val << shift;
    }

    /// Determine the bound of a coordinate pair modulo 3 with a lookup
    fn query(&self, a: A, b: B) -> u8 {
        let (index, shift) = self.index(a, b);

        (self.table[index] >> shift) & 3
    }

    /// The largest distance found in the table.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Update a prune bound given the next state (fast). `cur` must be the exact bound of a
    /// neighbour of `(a, b)`.
    pub fn update(&self, cur: usize, a: A, b: B) -> usize {
        let n = self.query(a, b) as usize;
        let c = cur % 3;
        match (n + 3 - c) % 3 {
            0 => cur,
            1 => cur + 1,
            _ => cur - 1,
        }
    }

    /// Compute the bound on a given coordinate pair (slow). This walks down to the solved pair,
    /// one neighbour one step closer at a time. `None` means the pair isn't in the table, which
    /// a fully covered table never reports.
    pub fn bound(&self, mut a: A, mut b: B) -> Option<usize> {
        let mut bound = 0;
        while !(a.solved() && b.solved()) {
            let n = self.query(a, b);
            if n == UNVISITED {
                return None;
            }
            // n - 1 but underflow
            let goal = (n + 2) % 3;
            (a, b) = M::MOVE_LIST
                .iter()
                .map(|&m| (self.a_moves.make_move(a, m), self.b_moves.make_move(b, m)))
                .find(|&(a, b)| self.query(a, b) == goal)?;

            bound += 1;
        }
        Some(bound)
    }
}

pub type TwistFlipPruneTable = PruningTable<FaceTurn, COCoord, EOCoord, 18>;
pub type ESliceTwistPruneTable = PruningTable<FaceTurn, COCoord, ESliceEdgeCoord, 18>;
pub type ESliceFlipPruneTable = PruningTable<FaceTurn, EOCoord, ESliceEdgeCoord, 18>;
pub type DominoSliceCPPruneTable = PruningTable<DominoMove, CPCoord, DominoESliceCoord, 10>;
pub type DominoSliceEPPruneTable = PruningTable<DominoMove, DominoEPCoord, DominoESliceCoord, 10>;

#[cfg(test)]
mod test {
    use super::super::move_tables::{
        COMoveTable, DominoCPMoveTable, DominoEPMoveTable, DominoESliceMoveTable, EOMoveTable,
        ESliceEdgeMoveTable,
    };
    use super::*;
    use crate::moves::MoveSequence;

    use proptest::collection::vec;
    use proptest::prelude::*;

    fn admissable_and_update_correct<
        M: SubMove,
        A: Coordinate<CubieCube>,
        B: Coordinate<CubieCube>,
        const MOVES: usize,
    >(
        prune_table: &PruningTable<M, A, B, MOVES>,
        mvs: MoveSequence<M>,
    ) {
        let a = prune_table.a_moves.make_moves(A::default(), mvs.clone());
        let b = prune_table.b_moves.make_moves(B::default(), mvs.clone());
        let bound = prune_table.bound(a, b).unwrap();
        assert!(bound <= mvs.len());
        assert!(bound <= prune_table.max_depth());

        for &m in M::MOVE_LIST {
            let a2 = prune_table.a_moves.make_move(a, m);
            let b2 = prune_table.b_moves.make_move(b, m);
            let b2_bound = prune_table.update(bound, a2, b2);
            assert_eq!(b2_bound, prune_table.bound(a2, b2).unwrap());
        }
    }

    #[test]
    fn solved_is_zero() {
        let size = CubeSize::THREE;
        let co = Arc::new(COMoveTable::generate(size).unwrap());
        let slice = Arc::new(ESliceEdgeMoveTable::generate(size).unwrap());
        let table = PruningTable::generate("twist/choice", size, co, slice).unwrap();
        assert_eq!(table.bound(Default::default(), Default::default()), Some(0));
        assert_eq!(table.query(Default::default(), Default::default()), 0);
    }

    #[test]
    fn check_admissable_and_update() {
        let size = CubeSize::THREE;
        let co = Arc::new(COMoveTable::generate(size).unwrap());
        let eo = Arc::new(EOMoveTable::generate(size).unwrap());
        let slice = Arc::new(ESliceEdgeMoveTable::generate(size).unwrap());
        let co_slice = PruningTable::generate("twist/choice", size, co, slice.clone()).unwrap();
        let eo_slice = PruningTable::generate("flip/choice", size, eo, slice).unwrap();
        proptest!(|(mvs in vec(any::<FaceTurn>(), 0..20).prop_map(MoveSequence))| {
            admissable_and_update_correct(&co_slice, mvs.clone());
            admissable_and_update_correct(&eo_slice, mvs.clone());
        });

        let cp = Arc::new(DominoCPMoveTable::generate(size).unwrap());
        let ep = Arc::new(DominoEPMoveTable::generate(size).unwrap());
        let d_slice = Arc::new(DominoESliceMoveTable::generate(size).unwrap());
        let cp_slice = PruningTable::generate("corners/slice", size, cp, d_slice.clone()).unwrap();
        let ep_slice = PruningTable::generate("edges/slice", size, ep, d_slice).unwrap();
        proptest!(|(mvs in vec(any::<DominoMove>(), 0..20).prop_map(MoveSequence))| {
            admissable_and_update_correct(&cp_slice, mvs.clone());
            admissable_and_update_correct(&ep_slice, mvs.clone());
        });
    }

    #[test]
    fn exact_depths_for_single_moves() {
        let size = CubeSize::THREE;
        let co = Arc::new(COMoveTable::generate(size).unwrap());
        let eo = Arc::new(EOMoveTable::generate(size).unwrap());
        let table = PruningTable::generate("twist/flip", size, co.clone(), eo.clone()).unwrap();
        for &m in FaceTurn::MOVE_LIST {
            let a = co.make_move(Default::default(), m);
            let b = eo.make_move(Default::default(), m);
            // Half turns and U/D turns keep twist and flip solved
            let expected = if a.solved() && b.solved() { 0 } else { 1 };
            assert_eq!(table.bound(a, b), Some(expected));
        }
        // Phase 1 never needs more than 12 moves, and this is a lower bound for it
        assert!(table.max_depth() <= 12);
    }

    #[test]
    fn corners_only_tables_are_small() {
        let size = CubeSize::TWO;
        let co = Arc::new(COMoveTable::generate(size).unwrap());
        let slice = Arc::new(ESliceEdgeMoveTable::generate(size).unwrap());
        let table = PruningTable::generate("twist/choice", size, co, slice).unwrap();
        assert_eq!(table.table.len(), 2187_usize.div_ceil(4));

        let cp = Arc::new(DominoCPMoveTable::generate(size).unwrap());
        let d_slice = Arc::new(DominoESliceMoveTable::generate(size).unwrap());
        let cp_slice = PruningTable::generate("corners/slice", size, cp, d_slice).unwrap();
        assert_eq!(cp_slice.bound(Default::default(), Default::default()), Some(0));
    }

    #[test]
    fn incomplete_coverage_is_reported() {
        // Quarter turns of R/L/F/B are missing from the phase 2 moves, so pairing the twist with
        // the choice under them only reaches the solved pair.
        let size = CubeSize::THREE;
        let co = Arc::new(MoveTable::<DominoMove, COCoord, 10>::generate(size).unwrap());
        let slice = Arc::new(MoveTable::<DominoMove, ESliceEdgeCoord, 10>::generate(size).unwrap());
        let err = PruningTable::generate("twist/choice", size, co, slice).err();
        assert_eq!(
            err,
            Some(TableError::IncompleteCoverage {
                table: "twist/choice",
                visited: 1,
                total: 2187 * 495,
            })
        );
    }
}
