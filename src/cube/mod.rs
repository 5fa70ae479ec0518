//! Cubie level model of an NxN cube, for N from 2 to 7.
//!
//! Only the outer layers are modelled: corners, and for N >= 3 twelve edge positions. On a big
//! cube an edge position stands for the whole group of wing (and middle) edges between two
//! faces, so this is the reduced form of the cube. Outer face turns keep a reduced cube reduced,
//! which is all the solver needs.

pub mod coords;
pub mod moves;
pub mod two_phase_solver;

use crate::error::{TableError, TryFromIntToEnumError};

/// The side length of a cube, between 2 and 7 inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CubeSize(u8);

/// The kinds of pieces a cube size has, which is all that move and pruning tables depend on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layout {
    /// Only corners, the 2x2x2.
    CornersOnly,
    /// Corners and (reduced) edges, every size from 3 up.
    CornersAndEdges,
}

impl CubeSize {
    /// The classic 2x2x2.
    pub const TWO: CubeSize = CubeSize(2);
    /// The classic 3x3x3.
    pub const THREE: CubeSize = CubeSize(3);

    /// Create a cube size, failing for side lengths the solver doesn't support.
    ///
    /// Sizes 4 to 7 are modelled as their reduced cube: the same corners and twelve edge
    /// positions as the 3x3x3, turned with outer layers only. They share the 3x3x3 tables, and
    /// solutions never contain inner layer turns, so centres and edge groups must already be
    /// reduced.
    pub fn new(n: u8) -> Result<CubeSize, TableError> {
        if (2..=7).contains(&n) {
            Ok(CubeSize(n))
        } else {
            Err(TableError::UnsupportedSize(n))
        }
    }

    /// The side length.
    pub fn layers(self) -> u8 {
        self.0
    }

    /// The piece layout of this size.
    pub fn layout(self) -> Layout {
        if self.0 == 2 {
            Layout::CornersOnly
        } else {
            Layout::CornersAndEdges
        }
    }

    /// Whether cubes of this size have edges.
    pub fn has_edges(self) -> bool {
        self.layout() == Layout::CornersAndEdges
    }

    /// The default ceiling on solution length. Two phase solutions stay well within this for
    /// every legal state (phase 1 needs at most 12 moves, phase 2 at most 18).
    pub fn move_ceiling(self) -> usize {
        match self.layout() {
            Layout::CornersOnly => 25,
            Layout::CornersAndEdges => 30,
        }
    }
}

impl TryFrom<u8> for CubeSize {
    type Error = TableError;

    fn try_from(n: u8) -> Result<CubeSize, TableError> {
        CubeSize::new(n)
    }
}

impl std::fmt::Display for CubeSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}x{0}x{0}", self.0)
    }
}

/// A corner position (or the corner piece that belongs there).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Corner {
    UFR,
    UFL,
    UBL,
    UBR,
    DFR,
    DFL,
    DBL,
    DBR,
}

impl Corner {
    /// Every corner in order.
    pub const ARRAY: [Corner; 8] = [
        Corner::UFR,
        Corner::UFL,
        Corner::UBL,
        Corner::UBR,
        Corner::DFR,
        Corner::DFL,
        Corner::DBL,
        Corner::DBR,
    ];
}

/// An edge position (or the edge piece that belongs there). The last four are the middle slice
/// (E slice) edges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Edge {
    UF,
    UL,
    UB,
    UR,
    DF,
    DL,
    DB,
    DR,
    FR,
    FL,
    BL,
    BR,
}

impl Edge {
    /// Every edge in order.
    pub const ARRAY: [Edge; 12] = [
        Edge::UF,
        Edge::UL,
        Edge::UB,
        Edge::UR,
        Edge::DF,
        Edge::DL,
        Edge::DB,
        Edge::DR,
        Edge::FR,
        Edge::FL,
        Edge::BL,
        Edge::BR,
    ];

    /// Whether this edge belongs in the middle slice between the U and D faces.
    pub fn e_slice(self) -> bool {
        self >= Edge::FR
    }
}

/// The orientation of a corner relative to the U/D axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CornerTwist {
    /// U/D sticker faces U/D
    Oriented,
    /// Twisted a third of a turn clockwise
    Clockwise,
    /// Twisted a third of a turn anticlockwise
    AntiClockwise,
}

impl CornerTwist {
    /// Twist clockwise once more.
    pub fn clockwise(self) -> CornerTwist {
        self.twist_by(CornerTwist::Clockwise)
    }

    /// Twist anticlockwise once more.
    pub fn anticlockwise(self) -> CornerTwist {
        self.twist_by(CornerTwist::AntiClockwise)
    }

    /// Add two twists.
    pub fn twist_by(self, other: CornerTwist) -> CornerTwist {
        match (self as u8 + other as u8) % 3 {
            0 => CornerTwist::Oriented,
            1 => CornerTwist::Clockwise,
            _ => CornerTwist::AntiClockwise,
        }
    }

    /// The twist that undoes this one.
    pub fn inverse(self) -> CornerTwist {
        match self {
            CornerTwist::Oriented => CornerTwist::Oriented,
            CornerTwist::Clockwise => CornerTwist::AntiClockwise,
            CornerTwist::AntiClockwise => CornerTwist::Clockwise,
        }
    }
}

/// The orientation of an edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeFlip {
    /// Not flipped
    Oriented,
    /// Flipped
    Flipped,
}

impl EdgeFlip {
    /// The other orientation.
    pub fn flip(self) -> EdgeFlip {
        match self {
            EdgeFlip::Oriented => EdgeFlip::Flipped,
            EdgeFlip::Flipped => EdgeFlip::Oriented,
        }
    }

    /// Add two flips.
    pub fn flip_by(self, other: EdgeFlip) -> EdgeFlip {
        match other {
            EdgeFlip::Oriented => self,
            EdgeFlip::Flipped => self.flip(),
        }
    }
}

macro_rules! u8_enum_conversions {
    ($ty:ty, $array:expr) => {
        impl From<$ty> for u8 {
            fn from(v: $ty) -> u8 {
                v as u8
            }
        }

        impl TryFrom<u8> for $ty {
            type Error = TryFromIntToEnumError;

            fn try_from(n: u8) -> Result<$ty, TryFromIntToEnumError> {
                $array
                    .get(n as usize)
                    .copied()
                    .ok_or(TryFromIntToEnumError::OutOfBounds)
            }
        }
    };
}

u8_enum_conversions!(Corner, Corner::ARRAY);
u8_enum_conversions!(Edge, Edge::ARRAY);
u8_enum_conversions!(
    CornerTwist,
    [
        CornerTwist::Oriented,
        CornerTwist::Clockwise,
        CornerTwist::AntiClockwise
    ]
);
u8_enum_conversions!(EdgeFlip, [EdgeFlip::Oriented, EdgeFlip::Flipped]);

/// A cube stored as the permutation and orientation of each piece. `cp[i]` is the corner found
/// at position `i`, `co[i]` its twist, and likewise for edges.
///
/// Cubes can only be made from the solved state by moves (or, inside the crate, by writing
/// coordinates of canonical cubes), so every `CubieCube` is solvable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CubieCube {
    pub(crate) size: CubeSize,
    pub(crate) co: [CornerTwist; 8],
    pub(crate) cp: [Corner; 8],
    pub(crate) eo: [EdgeFlip; 12],
    pub(crate) ep: [Edge; 12],
}

impl CubieCube {
    /// The solved 3x3x3.
    pub const SOLVED: CubieCube = CubieCube::solved(CubeSize::THREE);

    /// The solved cube of the given size.
    pub const fn solved(size: CubeSize) -> CubieCube {
        CubieCube {
            size,
            co: [CornerTwist::Oriented; 8],
            cp: Corner::ARRAY,
            eo: [EdgeFlip::Oriented; 12],
            ep: Edge::ARRAY,
        }
    }

    /// The size of this cube.
    pub fn size(&self) -> CubeSize {
        self.size
    }

    /// Whether this cube is solved. On a cube without edges, only corners are compared.
    pub fn is_solved(&self) -> bool {
        *self == CubieCube::solved(self.size)
    }

    /// Corner positions and twists, in `Corner` order.
    pub fn corners(&self) -> impl Iterator<Item = (Corner, CornerTwist)> + '_ {
        self.cp.iter().copied().zip(self.co.iter().copied())
    }

    /// Edge positions and flips, in `Edge` order. Empty for cubes without edges.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, EdgeFlip)> + '_ {
        let n = if self.size.has_edges() { 12 } else { 0 };
        self.ep
            .iter()
            .copied()
            .zip(self.eo.iter().copied())
            .take(n)
    }
}
