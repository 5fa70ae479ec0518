//! Outer layer face turns and their effect on a `CubieCube`.

use super::{Corner, CornerTwist, CubieCube, Edge, EdgeFlip};
use crate::moves::{Cancellation, MoveSequence};

#[cfg(test)]
use proptest_derive::Arbitrary;

/// The face being turned. Faces are ordered so that each face is directly followed by its
/// opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum Face {
    /// Right
    R,
    /// Left
    L,
    /// Up
    U,
    /// Down
    D,
    /// Front
    F,
    /// Back
    B,
}

impl Face {
    /// Every face in order.
    pub const ARRAY: [Face; 6] = [Face::R, Face::L, Face::U, Face::D, Face::F, Face::B];

    /// The face opposite to the given one.
    pub fn opposite(self) -> Face {
        match self {
            Face::R => Face::L,
            Face::L => Face::R,
            Face::U => Face::D,
            Face::D => Face::U,
            Face::F => Face::B,
            Face::B => Face::F,
        }
    }
}

/// Stores a face and a count of clockwise quarter turns. An anti-clockwise turn has a count of 3.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
#[allow(missing_docs)]
pub struct FaceTurn {
    pub face: Face,
    #[cfg_attr(test, proptest(strategy = "1..=3u8"))]
    pub count: u8,
}

impl crate::moves::Move for FaceTurn {
    fn inverse(self) -> Self {
        Self {
            face: self.face,
            count: (4 - self.count % 4) % 4,
        }
    }

    fn commutes_with(&self, b: &Self) -> bool {
        self.face == b.face || self.face.opposite() == b.face
    }

    fn cancel(self, b: Self) -> Cancellation<Self> {
        if self.face == b.face {
            let count = (self.count + b.count) % 4;
            if count == 0 {
                Cancellation::NoMove
            } else {
                Cancellation::OneMove(FaceTurn {
                    face: self.face,
                    count,
                })
            }
        } else {
            Cancellation::TwoMove(self, b)
        }
    }
}

impl std::fmt::Display for FaceTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.count {
            1 => write!(f, "{:?}", self.face),
            3 => write!(f, "{:?}'", self.face),
            _ => write!(f, "{:?}{}", self.face, self.count),
        }
    }
}

// Debug reads like notation too, it makes failing proptests much easier to read
impl std::fmt::Debug for FaceTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

/// The index of a face turn among the 18 face turns, grouped by face.
impl From<FaceTurn> for usize {
    fn from(mv: FaceTurn) -> usize {
        mv.face as usize * 3 + (mv.count as usize - 1)
    }
}

/// Create a move by specifying a face and quarter turn count. Note that you do not need to
/// specify for example Face::R, you only need to specify R.
#[macro_export]
macro_rules! mv {
    ($face:ident, $count: expr) => {
        FaceTurn {
            face: Face::$face,
            count: $count,
        }
    };
}

/// Every face turn, grouped by face with counts 1, 2, 3. The position of a move in this list is
/// its index in every face turn move table.
pub const FACE_TURNS: [FaceTurn; 18] = [
    mv!(R, 1),
    mv!(R, 2),
    mv!(R, 3),
    mv!(L, 1),
    mv!(L, 2),
    mv!(L, 3),
    mv!(U, 1),
    mv!(U, 2),
    mv!(U, 3),
    mv!(D, 1),
    mv!(D, 2),
    mv!(D, 3),
    mv!(F, 1),
    mv!(F, 2),
    mv!(F, 3),
    mv!(B, 1),
    mv!(B, 2),
    mv!(B, 3),
];

// Indexed by face. A quarter turn puts the piece from position OFFSETS[i] into position i,
// adding the orientation change for position i.
const CO_OFFSETS: [[u8; 8]; 6] = [
    [2, 0, 0, 1, 1, 0, 0, 2],
    [0, 1, 2, 0, 0, 2, 1, 0],
    [0; 8],
    [0; 8],
    [1, 2, 0, 0, 2, 1, 0, 0],
    [0, 0, 1, 2, 0, 0, 2, 1],
];
const CP_OFFSETS: [[u8; 8]; 6] = [
    [4, 1, 2, 0, 7, 5, 6, 3],
    [0, 2, 6, 3, 4, 1, 5, 7],
    [3, 0, 1, 2, 4, 5, 6, 7],
    [0, 1, 2, 3, 5, 6, 7, 4],
    [1, 5, 2, 3, 0, 4, 6, 7],
    [0, 1, 3, 7, 4, 5, 2, 6],
];
const EO_OFFSETS: [[u8; 12]; 6] = [
    [0; 12],
    [0; 12],
    [0; 12],
    [0; 12],
    [1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0, 0],
    [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 1],
];
const EP_OFFSETS: [[u8; 12]; 6] = [
    [0, 1, 2, 8, 4, 5, 6, 11, 7, 9, 10, 3],
    [0, 10, 2, 3, 4, 9, 6, 7, 8, 1, 5, 11],
    [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
    [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
    [9, 1, 2, 3, 8, 5, 6, 7, 0, 4, 10, 11],
    [0, 1, 11, 3, 4, 5, 10, 7, 8, 9, 2, 6],
];

impl CubieCube {
    /// Apply an algorithm to a cube
    pub fn make_moves(self, mvs: MoveSequence<FaceTurn>) -> CubieCube {
        mvs.0.into_iter().fold(self, |c, m| c.make_move(m))
    }

    /// Apply a move to a cube.
    pub fn make_move(self, mv: FaceTurn) -> CubieCube {
        (0..mv.count % 4).fold(self, |c, _| c.turn_face(mv.face))
    }

    /// Apply a move in place.
    pub fn apply(&mut self, mv: FaceTurn) {
        for _ in 0..mv.count % 4 {
            self.quarter_turn(mv.face);
        }
    }

    /// Make a single clockwise quarter turn of a face.
    pub fn turn_face(mut self, face: Face) -> CubieCube {
        self.quarter_turn(face);
        self
    }

    fn quarter_turn(&mut self, face: Face) {
        let co_offsets = CO_OFFSETS[face as usize];
        let cp_offsets = CP_OFFSETS[face as usize];

        let old_co = self.co;
        let old_cp = self.cp;
        for i in 0..8 {
            let from = cp_offsets[i] as usize;
            self.cp[i] = old_cp[from];
            self.co[i] = old_co[from].twist_by(twist_of(co_offsets[i]));
        }

        // Cubes without edges keep their edge arrays solved, so that equality and the edge
        // coordinates ignore them.
        if !self.size.has_edges() {
            return;
        }

        let eo_offsets = EO_OFFSETS[face as usize];
        let ep_offsets = EP_OFFSETS[face as usize];
        let old_eo = self.eo;
        let old_ep = self.ep;
        for i in 0..12 {
            let from = ep_offsets[i] as usize;
            self.ep[i] = old_ep[from];
            self.eo[i] = if eo_offsets[i] == 1 {
                old_eo[from].flip()
            } else {
                old_eo[from]
            };
        }
    }

    /// Multiply two cube states in the cube group (apply `self`, then `other`).
    pub fn multiply_cube(self, other: CubieCube) -> CubieCube {
        let mut result = CubieCube::solved(self.size);

        for i in 0..8 {
            let from = other.cp[i] as usize;
            result.co[i] = self.co[from].twist_by(other.co[i]);
            result.cp[i] = self.cp[from];
        }

        if self.size.has_edges() {
            for i in 0..12 {
                let from = other.ep[i] as usize;
                result.eo[i] = self.eo[from].flip_by(other.eo[i]);
                result.ep[i] = self.ep[from];
            }
        }

        result
    }

    /// Get the inverse in the cube group.
    pub fn inverse(self) -> CubieCube {
        let mut result = CubieCube::solved(self.size);

        for i in 0..8 {
            result.co[self.cp[i] as usize] = self.co[i].inverse();
            result.cp[self.cp[i] as usize] = Corner::ARRAY[i];
        }

        for i in 0..12 {
            result.eo[self.ep[i] as usize] = self.eo[i];
            result.ep[self.ep[i] as usize] = Edge::ARRAY[i];
        }

        result
    }
}

fn twist_of(n: u8) -> CornerTwist {
    match n {
        0 => CornerTwist::Oriented,
        1 => CornerTwist::Clockwise,
        _ => CornerTwist::AntiClockwise,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cube::CubeSize;
    use crate::moves::Move;

    #[test]
    fn quarter_turns_have_order_four() {
        for face in Face::ARRAY {
            let mut cube = CubieCube::SOLVED;
            for _ in 0..4 {
                cube = cube.turn_face(face);
            }
            assert_eq!(cube, CubieCube::SOLVED);
            assert_ne!(CubieCube::SOLVED.turn_face(face), CubieCube::SOLVED);
        }
    }

    #[test]
    fn move_indices() {
        for (i, &m) in FACE_TURNS.iter().enumerate() {
            assert_eq!(usize::from(m), i);
        }
    }

    #[test]
    fn sexy_move_order() {
        let sexy = MoveSequence(vec![mv!(R, 1), mv!(U, 1), mv!(R, 3), mv!(U, 3)]);
        let mut cube = CubieCube::SOLVED;
        for i in 1..=6 {
            cube = cube.make_moves(sexy.clone());
            assert_eq!(cube.is_solved(), i == 6);
        }
    }

    #[test]
    fn corners_only() {
        let cube = CubieCube::solved(CubeSize::TWO).make_move(mv!(F, 1));
        assert!(cube.edges().next().is_none());
        assert_eq!(cube.ep, Edge::ARRAY);
        assert!(!cube.is_solved());
        assert!(cube.make_move(mv!(F, 3)).is_solved());
    }

    #[test]
    fn display() {
        let alg = MoveSequence(vec![mv!(R, 1), mv!(U, 2), mv!(F, 3)]);
        assert_eq!(alg.to_string(), "R U2 F'");
        assert_eq!(format!("{:?}", mv!(B, 3)), "B'");
    }

    use proptest::collection::vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn apply_matches_make_move(mvs in vec(any::<FaceTurn>(), 0..20)) {
            let mut a = CubieCube::SOLVED;
            for &m in &mvs {
                a.apply(m);
            }
            assert_eq!(a, CubieCube::SOLVED.make_moves(MoveSequence(mvs)));
        }

        #[test]
        fn cancel_same_moves(mvs in vec(any::<FaceTurn>(), 0..20).prop_map(MoveSequence)) {
            let cancelled = mvs.clone().cancel();
            assert!(cancelled.len() <= mvs.len());
            assert_eq!(CubieCube::SOLVED.make_moves(mvs), CubieCube::SOLVED.make_moves(cancelled));
        }

        #[test]
        fn invert_identity(mvs in vec(any::<FaceTurn>(), 0..20).prop_map(MoveSequence)) {
            let cancelled = mvs.clone().cancel();
            assert_eq!(CubieCube::SOLVED.make_moves(mvs.clone()).make_moves(mvs.inverse()), CubieCube::SOLVED);
            assert!(cancelled.clone().append(cancelled.clone().inverse()).cancel().is_empty());
        }

        #[test]
        fn cancel_idempotent(mvs in vec(any::<FaceTurn>(), 0..20).prop_map(MoveSequence)) {
            let cancelled = mvs.clone().cancel();
            assert_eq!(cancelled.clone().cancel(), cancelled);
        }

        #[test]
        fn inverse_apply(mvs in vec(any::<FaceTurn>(), 0..20).prop_map(MoveSequence)) {
            let state = CubieCube::SOLVED.make_moves(mvs);
            assert_eq!(CubieCube::SOLVED, state.clone().multiply_cube(state.clone().inverse()));
            assert_eq!(CubieCube::SOLVED, state.clone().inverse().multiply_cube(state));
        }

        #[test]
        fn multiply_is_move_application(
            a in vec(any::<FaceTurn>(), 0..10).prop_map(MoveSequence),
            b in vec(any::<FaceTurn>(), 0..10).prop_map(MoveSequence),
        ) {
            let x = CubieCube::SOLVED.make_moves(a.clone());
            let y = CubieCube::SOLVED.make_moves(b.clone());
            assert_eq!(x.multiply_cube(y), CubieCube::SOLVED.make_moves(a.append(b)));
        }

        #[test]
        fn inverse_move(m in any::<FaceTurn>()) {
            assert!(CubieCube::SOLVED.make_move(m).make_move(m.inverse()).is_solved());
        }
    }
}
