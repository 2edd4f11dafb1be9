use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Grid coordinate as `(row, col)`.
///
/// Signed on purpose, neighbor arithmetic may step outside the grid and is
/// rejected by the bounds checks of whoever indexes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos(pub i32, pub i32);

/// Size of a grid as `(rows, cols)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size(pub usize, pub usize);

impl Pos {
    pub const ZERO: Pos = Pos(0, 0);

    pub fn row(self) -> i32 {
        self.0
    }

    pub fn col(self) -> i32 {
        self.1
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    pub fn all_non_negative(self) -> bool {
        self.0 >= 0 && self.1 >= 0
    }

    /// Positions one step away in the four axis directions, in the fixed
    /// expansion order used by the generator and every search.
    pub fn neighbors(self) -> [Pos; 4] {
        Dir::ALL.map(|dir| self + dir.offset())
    }
}

impl Size {
    pub fn rows(self) -> usize {
        self.0
    }

    pub fn cols(self) -> usize {
        self.1
    }

    pub fn area(self) -> usize {
        self.0 * self.1
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0 || self.1 == 0
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.all_non_negative() && (pos.0 as usize) < self.0 && (pos.1 as usize) < self.1
    }
}

/// Axis direction on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Down,
    Up,
    Right,
    Left,
}

impl Dir {
    /// +row, -row, +col, -col
    pub const ALL: [Dir; 4] = [Dir::Down, Dir::Up, Dir::Right, Dir::Left];

    pub fn offset(self) -> Pos {
        match self {
            Dir::Down => Pos(1, 0),
            Dir::Up => Pos(-1, 0),
            Dir::Right => Pos(0, 1),
            Dir::Left => Pos(0, -1),
        }
    }

    pub fn reverse(self) -> Dir {
        match self {
            Dir::Down => Dir::Up,
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Left => Dir::Right,
        }
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, other: Pos) -> Pos {
        Pos(self.0 + other.0, self.1 + other.1)
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, other: Pos) -> Pos {
        Pos(self.0 - other.0, self.1 - other.1)
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, other: Pos) {
        self.0 += other.0;
        self.1 += other.1;
    }
}

impl SubAssign for Pos {
    fn sub_assign(&mut self, other: Pos) {
        self.0 -= other.0;
        self.1 -= other.1;
    }
}

impl Mul<i32> for Pos {
    type Output = Pos;

    fn mul(self, other: i32) -> Pos {
        Pos(self.0 * other, self.1 * other)
    }
}

impl From<(i32, i32)> for Pos {
    fn from(tuple: (i32, i32)) -> Self {
        Pos(tuple.0, tuple.1)
    }
}

impl From<Pos> for (i32, i32) {
    fn from(val: Pos) -> Self {
        (val.0, val.1)
    }
}

impl From<(usize, usize)> for Size {
    fn from(tuple: (usize, usize)) -> Self {
        Size(tuple.0, tuple.1)
    }
}
