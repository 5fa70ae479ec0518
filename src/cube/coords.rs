//! The coordinates the two phase solver works with, and how to read them from and write them to
//! a `CubieCube`.
//!
//! Phase 1 uses the corner twist, the edge flip and the choice of slots holding the middle slice
//! edges. Phase 2 uses the corner permutation, the permutation of the U/D layer edges and the
//! permutation of the middle slice edges. Every coordinate is 0 on the solved cube, and pieces a
//! cube size doesn't have collapse a coordinate to the single state 0.

use super::{Corner, CornerTwist, CubeSize, CubieCube, Edge, EdgeFlip};
use crate::coord::{Coordinate, FromCoordinate};

/// Corner orientation (twist), 3^7 states.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct COCoord(u16);

/// Edge orientation (flip), 2^11 states.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct EOCoord(u16);

/// Which four edge slots hold the middle slice edges (choice), 12 choose 4 states.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct ESliceEdgeCoord(u16);

/// Corner permutation, 8! states.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct CPCoord(u16);

/// Permutation of the eight edges outside the middle slice, 8! states. Only meaningful once the
/// middle slice edges are in the middle slice.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct DominoEPCoord(u16);

/// Permutation of the four middle slice edges, 4! states. Only meaningful once the middle slice
/// edges are in the middle slice.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct DominoESliceCoord(u16);

fn to_o_coord<const COUNT: usize, const STATES: u16>(arr: &[u8; COUNT]) -> u16 {
    arr.iter()
        .skip(1)
        .fold(0, |acc, &i| (acc * STATES) + i as u16)
}

/// Lehmer code of a permutation: digit `idx` counts the larger pieces in front of position
/// `idx`, and position 1 is the least significant digit.
fn to_p_coord<const COUNT: usize>(arr: &[u8; COUNT]) -> u16 {
    (1..COUNT).rev().fold(0, |acc, idx| {
        (acc * (idx + 1) as u16) + arr[0..idx].iter().filter(|&&x| x > arr[idx]).count() as u16
    })
}

/// Inverse of `to_p_coord`, where `pieces` is in ascending order.
fn from_p_coord<T: Copy, const COUNT: usize>(mut n: usize, pieces: [T; COUNT]) -> [T; COUNT] {
    let mut digits = [0; COUNT];
    for (idx, digit) in digits.iter_mut().enumerate().skip(1) {
        *digit = n % (idx + 1);
        n /= idx + 1;
    }

    let mut remaining = pieces.to_vec();
    let mut out = pieces;
    for idx in (0..COUNT).rev() {
        let j = remaining.len() - 1 - digits[idx];
        out[idx] = remaining.remove(j);
    }
    out
}

const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let mut r = 1;
    let mut i = 0;
    while i < k {
        r = r * (n - i) / (i + 1);
        i += 1;
    }
    r
}

fn check_range<C: Coordinate<CubieCube>>(coord: C, size: CubeSize) {
    assert!(
        coord.repr() < C::count(size),
        "{} out of range for a {size} cube: {}",
        std::any::type_name::<C>(),
        coord.repr()
    );
}

macro_rules! repr_impls {
    () => {
        fn repr(self) -> usize {
            self.0 as usize
        }

        fn from_repr(n: usize) -> Self {
            Self(n as u16)
        }
    };
}

impl Coordinate<CubieCube> for COCoord {
    fn from_puzzle(puzzle: &CubieCube) -> Self {
        COCoord(to_o_coord::<8, 3>(&puzzle.co.map(|n| n.into())))
    }

    fn count(_: CubeSize) -> usize {
        // 3^7
        2187
    }

    repr_impls!();
}

impl FromCoordinate<COCoord> for CubieCube {
    fn set_coord(&mut self, coord: COCoord) {
        check_range(coord, self.size);
        let mut first = CornerTwist::Oriented;
        let mut n = coord.0;

        for i in (1..8).rev() {
            self.co[i] = match n % 3 {
                0 => CornerTwist::Oriented,
                1 => {
                    first = first.anticlockwise();
                    CornerTwist::Clockwise
                }
                _ => {
                    first = first.clockwise();
                    CornerTwist::AntiClockwise
                }
            };
            n /= 3;
        }

        self.co[0] = first;
    }
}

impl Coordinate<CubieCube> for EOCoord {
    fn from_puzzle(puzzle: &CubieCube) -> Self {
        EOCoord(to_o_coord::<12, 2>(&puzzle.eo.map(|n| n.into())))
    }

    fn count(size: CubeSize) -> usize {
        if size.has_edges() {
            // 2^11
            2048
        } else {
            1
        }
    }

    repr_impls!();
}

impl FromCoordinate<EOCoord> for CubieCube {
    fn set_coord(&mut self, coord: EOCoord) {
        check_range(coord, self.size);
        let mut first = EdgeFlip::Oriented;
        let mut n = coord.0;

        for i in (1..12).rev() {
            self.eo[i] = if n % 2 == 1 {
                first = first.flip();
                EdgeFlip::Flipped
            } else {
                EdgeFlip::Oriented
            };
            n /= 2;
        }

        self.eo[0] = first;
    }
}

impl Coordinate<CubieCube> for ESliceEdgeCoord {
    fn from_puzzle(puzzle: &CubieCube) -> Self {
        // Combinatorial number system over the slots, counted from the back: a slice edge in
        // slot j with x slice edges behind it contributes (11 - j) choose (x + 1).
        let mut r = 0;
        let mut x = 0;
        for j in (0..12).rev() {
            if puzzle.ep[j].e_slice() {
                r += binomial(11 - j, x + 1);
                x += 1;
            }
        }
        ESliceEdgeCoord(r as u16)
    }

    fn count(size: CubeSize) -> usize {
        if size.has_edges() {
            binomial(12, 4)
        } else {
            1
        }
    }

    repr_impls!();
}

impl FromCoordinate<ESliceEdgeCoord> for CubieCube {
    fn set_coord(&mut self, coord: ESliceEdgeCoord) {
        check_range(coord, self.size);
        let mut a = coord.repr();
        let mut x = 4;
        let mut slice = Edge::ARRAY[8..].iter().copied();
        let mut other = Edge::ARRAY[..8].iter().copied();

        for j in 0..12 {
            let c = binomial(11 - j, x);
            let next = if x > 0 && a >= c {
                a -= c;
                x -= 1;
                slice.next()
            } else {
                other.next()
            };
            // Four slice edges and eight others fill the twelve slots exactly.
            if let Some(e) = next {
                self.ep[j] = e;
            }
        }
    }
}

impl Coordinate<CubieCube> for CPCoord {
    fn from_puzzle(puzzle: &CubieCube) -> Self {
        CPCoord(to_p_coord::<8>(&puzzle.cp.map(|n| n.into())))
    }

    fn count(_: CubeSize) -> usize {
        40320
    }

    repr_impls!();
}

impl FromCoordinate<CPCoord> for CubieCube {
    fn set_coord(&mut self, coord: CPCoord) {
        check_range(coord, self.size);
        self.cp = from_p_coord(coord.repr(), Corner::ARRAY);
    }
}

impl Coordinate<CubieCube> for DominoEPCoord {
    fn from_puzzle(puzzle: &CubieCube) -> Self {
        let ud: [u8; 8] = std::array::from_fn(|i| puzzle.ep[i].into());
        DominoEPCoord(to_p_coord(&ud))
    }

    fn count(size: CubeSize) -> usize {
        if size.has_edges() {
            40320
        } else {
            1
        }
    }

    repr_impls!();
}

impl FromCoordinate<DominoEPCoord> for CubieCube {
    fn set_coord(&mut self, coord: DominoEPCoord) {
        check_range(coord, self.size);
        let ud: [Edge; 8] = std::array::from_fn(|i| Edge::ARRAY[i]);
        self.ep[..8].copy_from_slice(&from_p_coord(coord.repr(), ud));
        self.ep[8..].copy_from_slice(&Edge::ARRAY[8..]);
    }
}

impl Coordinate<CubieCube> for DominoESliceCoord {
    fn from_puzzle(puzzle: &CubieCube) -> Self {
        let slice: [u8; 4] = std::array::from_fn(|i| puzzle.ep[i + 8].into());
        DominoESliceCoord(to_p_coord(&slice))
    }

    fn count(size: CubeSize) -> usize {
        if size.has_edges() {
            24
        } else {
            1
        }
    }

    repr_impls!();
}

impl FromCoordinate<DominoESliceCoord> for CubieCube {
    fn set_coord(&mut self, coord: DominoESliceCoord) {
        check_range(coord, self.size);
        let slice = [Edge::FR, Edge::FL, Edge::BL, Edge::BR];
        self.ep[..8].copy_from_slice(&Edge::ARRAY[..8]);
        self.ep[8..].copy_from_slice(&from_p_coord(coord.repr(), slice));
    }
}
