//! Move tables for each coordinate type

use crate::coord::{Coordinate, FromCoordinate};
use crate::cube::coords::{
    CPCoord, COCoord, DominoEPCoord, DominoESliceCoord, EOCoord, ESliceEdgeCoord,
};
use crate::cube::moves::{Face, FaceTurn, FACE_TURNS};
use crate::cube::{CubeSize, CubieCube};
use crate::error::TableError;
use crate::moves::{Cancellation, Move};

use log::debug;
use std::marker::PhantomData;

#[cfg(test)]
use proptest::strategy::Strategy;
#[cfg(test)]
use proptest_derive::Arbitrary;

/// A type that encodes a subset of the set of face turns, e.g. the phase 2 moves.
pub trait SubMove: Move + Copy + std::fmt::Debug
where
    Self: 'static,
{
    /// Interpret a move as a normal move to be applied to a `CubieCube`.
    fn into_move(self) -> FaceTurn;

    /// The number of moves that exist
    fn count() -> usize {
        Self::MOVE_LIST.len()
    }

    /// The list of all moves that this type encodes, in index order.
    const MOVE_LIST: &'static [Self];

    /// Returns all of the states that come from applying each move to the given puzzle, along with
    /// the given move.
    fn successor_states(puzzle: CubieCube) -> impl Iterator<Item = (Self, CubieCube)> {
        Self::MOVE_LIST
            .iter()
            .map(move |m| (*m, puzzle.clone().make_move(m.into_move())))
    }

    /// Get the index of this move in the move list. Every table over this move type uses the same
    /// index for the same move.
    fn index(self) -> usize;

    /// The face this move turns.
    fn face(self) -> Face {
        self.into_move().face
    }
}

/// A move table, which stores mappings of coordinate + move pairs to the coordinate that results
/// from applying the move.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveTable<M: SubMove, C: Coordinate<CubieCube>, const MOVES: usize> {
    table: Box<[[C; MOVES]]>,
    _phantom: PhantomData<M>,
}

impl<M: SubMove, C: Coordinate<CubieCube>, const MOVES: usize> MoveTable<M, C, MOVES>
where
    CubieCube: FromCoordinate<C>,
{
    /// Generate a move table for cubes of the given size. This is slightly expensive so making
    /// move tables repeatedly should be avoided, since the resulting move table generated will
    /// always be identical.
    ///
    /// Each coordinate is written onto a solved cube and read back before its moves are
    /// tabulated; a coordinate that doesn't read back as itself is a configuration error.
    pub fn generate(size: CubeSize) -> Result<Self, TableError> {
        debug_assert_eq!(M::count(), MOVES);

        let table = (0..C::count(size))
            .map(|i| {
                let coord = C::from_repr(i);
                let mut cube = CubieCube::solved(size);
                cube.set_coord(coord);

                let got = C::from_puzzle(&cube);
                if got != coord {
                    return Err(TableError::RoundTrip {
                        coord: std::any::type_name::<C>(),
                        ordinal: i,
                        got: got.repr(),
                    });
                }

                let mut t: [C; MOVES] = std::array::from_fn(|_| Default::default());
                for (mv, next) in M::successor_states(cube) {
                    t[mv.index()] = C::from_puzzle(&next);
                }

                Ok(t)
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();

        debug!(
            "Generated {} move table with {} entries",
            std::any::type_name::<C>(),
            table.len() * MOVES
        );

        Ok(Self {
            table,
            _phantom: PhantomData,
        })
    }
}

impl<M: SubMove, C: Coordinate<CubieCube>, const MOVES: usize> MoveTable<M, C, MOVES> {
    /// Determine what coordinate comes from applying a move.
    pub fn make_move(&self, coord: C, mv: M) -> C {
        self.table[coord.repr()][mv.index()]
    }

    /// Determine what coordinate comes from applying a sequence of moves.
    #[cfg(test)]
    pub fn make_moves(&self, coord: C, alg: crate::moves::MoveSequence<M>) -> C {
        alg.0.into_iter().fold(coord, |c, m| self.make_move(c, m))
    }

    /// The number of coordinates in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

impl SubMove for FaceTurn {
    fn into_move(self) -> FaceTurn {
        self
    }

    const MOVE_LIST: &'static [FaceTurn] = &FACE_TURNS;

    fn index(self) -> usize {
        self.into()
    }
}

/// A move of the phase 2 group `<U, D, R2, L2, F2, B2>`, which keeps the twist, the flip and the
/// choice of middle slice slots solved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
#[allow(missing_docs)]
pub enum DominoMove {
    R2,
    L2,
    #[cfg_attr(test, proptest(strategy = "(1..=3u8).prop_map(DominoMove::U)", weight = 3))]
    U(u8),
    #[cfg_attr(test, proptest(strategy = "(1..=3u8).prop_map(DominoMove::D)", weight = 3))]
    D(u8),
    F2,
    B2,
}

impl Move for DominoMove {
    fn inverse(self) -> Self {
        match self {
            DominoMove::U(n) => DominoMove::U((4 - n % 4) % 4),
            DominoMove::D(n) => DominoMove::D((4 - n % 4) % 4),
            _ => self,
        }
    }

    fn commutes_with(&self, b: &Self) -> bool {
        use DominoMove as M;
        match self {
            M::R2 | M::L2 => matches!(b, M::R2 | M::L2),
            M::F2 | M::B2 => matches!(b, M::F2 | M::B2),
            M::U(_) | M::D(_) => matches!(b, M::U(_) | M::D(_)),
        }
    }

    fn cancel(self, b: Self) -> Cancellation<Self> {
        use DominoMove as M;
        match (self, b) {
            (M::R2, M::R2) | (M::L2, M::L2) | (M::F2, M::F2) | (M::B2, M::B2) => {
                Cancellation::NoMove
            }
            (M::U(n), M::U(m)) if (n + m) % 4 == 0 => Cancellation::NoMove,
            (M::D(n), M::D(m)) if (n + m) % 4 == 0 => Cancellation::NoMove,
            (M::U(n), M::U(m)) => Cancellation::OneMove(M::U((n + m) % 4)),
            (M::D(n), M::D(m)) => Cancellation::OneMove(M::D((n + m) % 4)),
            _ => Cancellation::TwoMove(self, b),
        }
    }
}

impl SubMove for DominoMove {
    fn into_move(self) -> FaceTurn {
        use crate::mv;
        match self {
            DominoMove::R2 => mv!(R, 2),
            DominoMove::L2 => mv!(L, 2),
            DominoMove::U(n) => mv!(U, n),
            DominoMove::D(n) => mv!(D, n),
            DominoMove::F2 => mv!(F, 2),
            DominoMove::B2 => mv!(B, 2),
        }
    }

    const MOVE_LIST: &'static [DominoMove] = &[
        DominoMove::R2,
        DominoMove::L2,
        DominoMove::U(1),
        DominoMove::U(2),
        DominoMove::U(3),
        DominoMove::D(1),
        DominoMove::D(2),
        DominoMove::D(3),
        DominoMove::F2,
        DominoMove::B2,
    ];

    fn index(self) -> usize {
        match self {
            DominoMove::R2 => 0,
            DominoMove::L2 => 1,
            // Counts are always in 1..=3, the mod only keeps a bad count from indexing another
            // face's moves
            DominoMove::U(n) => 1 + (n % 4) as usize,
            DominoMove::D(n) => 4 + (n % 4) as usize,
            DominoMove::F2 => 8,
            DominoMove::B2 => 9,
        }
    }
}

impl DominoMove {
    /// Interpret a face turn as a phase 2 move, if it is one.
    pub fn from_move(mv: FaceTurn) -> Option<DominoMove> {
        match (mv.face, mv.count) {
            (Face::U, n @ 1..=3) => Some(DominoMove::U(n)),
            (Face::D, n @ 1..=3) => Some(DominoMove::D(n)),
            (Face::R, 2) => Some(DominoMove::R2),
            (Face::L, 2) => Some(DominoMove::L2),
            (Face::F, 2) => Some(DominoMove::F2),
            (Face::B, 2) => Some(DominoMove::B2),
            _ => None,
        }
    }
}

pub type COMoveTable = MoveTable<FaceTurn, COCoord, 18>;
pub type EOMoveTable = MoveTable<FaceTurn, EOCoord, 18>;
pub type ESliceEdgeMoveTable = MoveTable<FaceTurn, ESliceEdgeCoord, 18>;
pub type DominoCPMoveTable = MoveTable<DominoMove, CPCoord, 10>;
pub type DominoEPMoveTable = MoveTable<DominoMove, DominoEPCoord, 10>;
pub type DominoESliceMoveTable = MoveTable<DominoMove, DominoESliceCoord, 10>;

#[cfg(test)]
mod test {
    use super::*;
    use crate::moves::MoveSequence;

    use proptest::collection::vec;
    use proptest::prelude::*;

    #[test]
    fn move_indices() {
        for (i, &m) in DominoMove::MOVE_LIST.iter().enumerate() {
            assert_eq!(m.index(), i);
            assert_eq!(DominoMove::from_move(m.into_move()), Some(m));
        }
        for (i, &m) in FaceTurn::MOVE_LIST.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
        assert_eq!(DominoMove::from_move(crate::mv!(R, 1)), None);
    }

    fn closed<M: SubMove, C: Coordinate<CubieCube>, const MOVES: usize>(
        table: &MoveTable<M, C, MOVES>,
        size: CubeSize,
    ) {
        assert_eq!(table.len(), C::count(size));
        for c in (0..C::count(size)).map(C::from_repr) {
            for &m in M::MOVE_LIST {
                assert!(table.make_move(c, m).repr() < C::count(size));
            }
        }
    }

    #[test]
    fn generates_closed_tables() {
        for size in [CubeSize::TWO, CubeSize::THREE] {
            closed(&COMoveTable::generate(size).unwrap(), size);
            closed(&EOMoveTable::generate(size).unwrap(), size);
            closed(&ESliceEdgeMoveTable::generate(size).unwrap(), size);
            closed(&DominoCPMoveTable::generate(size).unwrap(), size);
            closed(&DominoEPMoveTable::generate(size).unwrap(), size);
            closed(&DominoESliceMoveTable::generate(size).unwrap(), size);
        }
    }

    /* We check that the following diagram commutes
     *
     *   CubieCube --apply_move--> CubieCube
     *      |                         |
     *      |                         |
     * from_puzzle              from_puzzle
     *      |                         |
     *      |                         |
     *      v                         v
     *    Coord -----apply_move---> Coord
     *
     * Move application should be compatable with coordinate translation.
     */

    fn diagram_commutes<
        M: SubMove,
        C: Coordinate<CubieCube> + std::fmt::Debug,
        const MOVES: usize,
    >(
        table: &MoveTable<M, C, MOVES>,
        p: CubieCube,
        mvs: MoveSequence<M>,
    ) {
        let l = table.make_moves(C::from_puzzle(&p), mvs.clone());
        let r = C::from_puzzle(&p.make_moves(mvs.0.into_iter().map(|m| m.into_move()).collect()));
        assert_eq!(l, r);
    }

    #[test]
    fn commutes_normal() {
        let co_table = COMoveTable::generate(CubeSize::THREE).unwrap();
        let eo_table = EOMoveTable::generate(CubeSize::THREE).unwrap();
        let eslice_table = ESliceEdgeMoveTable::generate(CubeSize::THREE).unwrap();
        proptest!(|(mvs in vec(any::<FaceTurn>(), 0..20).prop_map(MoveSequence))| {
            diagram_commutes(&co_table, CubieCube::SOLVED, mvs.clone());
            diagram_commutes(&eo_table, CubieCube::SOLVED, mvs.clone());
            diagram_commutes(&eslice_table, CubieCube::SOLVED, mvs.clone());
        });
    }

    #[test]
    fn commutes_domino() {
        let cp_table = DominoCPMoveTable::generate(CubeSize::THREE).unwrap();
        let ep_table = DominoEPMoveTable::generate(CubeSize::THREE).unwrap();
        let eslice_table = DominoESliceMoveTable::generate(CubeSize::THREE).unwrap();
        proptest!(|(mvs in vec(any::<DominoMove>(), 0..20).prop_map(MoveSequence))| {
            diagram_commutes(&cp_table, CubieCube::SOLVED, mvs.clone());
            diagram_commutes(&ep_table, CubieCube::SOLVED, mvs.clone());
            diagram_commutes(&eslice_table, CubieCube::SOLVED, mvs.clone());
        });
    }

    #[test]
    fn commutes_corners_only() {
        let size = CubeSize::TWO;
        let co_table = COMoveTable::generate(size).unwrap();
        let cp_table = DominoCPMoveTable::generate(size).unwrap();
        proptest!(|(mvs in vec(any::<FaceTurn>(), 0..20).prop_map(MoveSequence))| {
            diagram_commutes(&co_table, CubieCube::solved(size), mvs);
        });
        proptest!(|(mvs in vec(any::<DominoMove>(), 0..20).prop_map(MoveSequence))| {
            diagram_commutes(&cp_table, CubieCube::solved(size), mvs);
        });
    }

    proptest! {
        #[test]
        fn domino_moves_preserve_phase_one(mvs in vec(any::<DominoMove>(), 0..30)) {
            let cube = CubieCube::SOLVED.make_moves(mvs.into_iter().map(SubMove::into_move).collect());
            assert!(COCoord::from_puzzle(&cube).solved());
            assert!(EOCoord::from_puzzle(&cube).solved());
            assert!(ESliceEdgeCoord::from_puzzle(&cube).solved());
        }

        #[test]
        fn domino_cancel_matches_cube(mvs in vec(any::<DominoMove>(), 0..20).prop_map(MoveSequence)) {
            let cancelled = mvs.clone().cancel();
            let as_moves = |s: MoveSequence<DominoMove>| -> MoveSequence<FaceTurn> { s.0.into_iter().map(SubMove::into_move).collect() };
            assert!(cancelled.len() <= mvs.len());
            assert_eq!(
                CubieCube::SOLVED.make_moves(as_moves(mvs)),
                CubieCube::SOLVED.make_moves(as_moves(cancelled)),
            );
        }
    }
}
