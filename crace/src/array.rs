use std::ops;

use crate::dims::{Pos, Size};

/// Row-major 2D buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array2D<T> {
    buf: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2D<T> {
    pub fn size(&self) -> Size {
        Size(self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn pos_to_idx(&self, pos: Pos) -> Option<usize> {
        if !self.size().contains(pos) {
            return None;
        }

        let Pos(row, col) = pos;
        Some(row as usize * self.cols + col as usize)
    }

    pub fn idx_to_pos(&self, idx: usize) -> Option<Pos> {
        if idx >= self.buf.len() {
            return None;
        }

        Some(Pos((idx / self.cols) as i32, (idx % self.cols) as i32))
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.pos_to_idx(pos).and_then(|i| self.buf.get(i))
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        self.pos_to_idx(pos).and_then(|i| self.buf.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.buf.iter_mut()
    }

    pub fn iter_pos(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.buf.len()).filter_map(move |i| self.idx_to_pos(i))
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Array2D<U> {
        Array2D {
            buf: self.buf.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }

        let start = row * self.cols;
        Some(&self.buf[start..start + self.cols])
    }
}

impl<T: Clone> Array2D<T> {
    pub fn new(item: T, size: Size) -> Self {
        Self {
            buf: vec![item; size.area()],
            rows: size.0,
            cols: size.1,
        }
    }

    pub fn fill(&mut self, item: T) {
        self.buf.fill(item);
    }
}

impl<T> ops::Index<Pos> for Array2D<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {:?}", index))
    }
}

impl<T> ops::IndexMut<Pos> for Array2D<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        self.get_mut(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {:?}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip_and_bounds() {
        let mut arr = Array2D::new(0u8, Size(3, 4));
        arr[Pos(2, 3)] = 7;

        assert_eq!(arr.pos_to_idx(Pos(2, 3)), Some(11));
        assert_eq!(arr.idx_to_pos(11), Some(Pos(2, 3)));
        assert_eq!(arr.get(Pos(2, 3)), Some(&7));
        assert_eq!(arr.get(Pos(3, 0)), None);
        assert_eq!(arr.get(Pos(0, -1)), None);
        assert_eq!(arr.idx_to_pos(12), None);
    }

    #[test]
    fn rows() {
        let mut arr = Array2D::new('.', Size(2, 3));
        arr[Pos(1, 0)] = '#';
        assert_eq!(arr.row(1), Some(&['#', '.', '.'][..]));
        assert_eq!(arr.row(2), None);
        assert_eq!(arr.iter_pos().count(), 6);
    }
}
