//! We give a general description of a coordinate, which is a type used to encode coset information
//! of a puzzle.

use crate::cube::CubeSize;

/// A coordinate type, encoding cosets of the puzzle P.
pub trait Coordinate<P>: Copy + Default + Eq {
    /// Obtain the coordinate that corresponds to the given puzzle.
    fn from_puzzle(puzzle: &P) -> Self;

    /// Determine whether the given coordinate represents a solved state
    fn solved(self) -> bool {
        self.repr() == 0
    }

    /// The number of possible coordinate states on a puzzle of the given size. Pieces that a
    /// size doesn't have leave a single state.
    fn count(size: CubeSize) -> usize;

    /// A representation of this coordinate as a usize, for use in table lookups.
    fn repr(self) -> usize;

    /// Convert the representation of a coordinate to the coordinate itself. We assume 0
    /// corresponds to the solved state.
    fn from_repr(n: usize) -> Self;
}

/// Gives the ability to set a coordinate onto a puzzle.
pub trait FromCoordinate<C>: Sized
where
    C: Coordinate<Self>,
{
    /// Modify the puzzle so that its coordinate for `C` is `coord`. Pieces the coordinate doesn't
    /// describe are put in a canonical arrangement.
    ///
    /// Panics if `coord` is out of range for the puzzle's size.
    fn set_coord(&mut self, coord: C);
}
