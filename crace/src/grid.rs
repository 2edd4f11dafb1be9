use std::collections::VecDeque;

use crate::{
    array::Array2D,
    dims::{Pos, Size},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    obstacle: bool,
    visited: bool,
}

impl Cell {
    pub fn wall() -> Cell {
        Cell {
            obstacle: true,
            visited: false,
        }
    }

    pub fn open() -> Cell {
        Cell {
            obstacle: false,
            visited: false,
        }
    }

    pub fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Cell can be entered by a search and was not reached yet.
    pub fn is_free(&self) -> bool {
        !self.obstacle && !self.visited
    }
}

/// Rectangular grid of cells, addressed by `Pos(row, col)`.
///
/// Every accessor is bounds checked, out of range positions read as `None`
/// and writes to them are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2D<Cell>,
}

impl Grid {
    pub fn filled(size: Size) -> Grid {
        Grid {
            cells: Array2D::new(Cell::wall(), size),
        }
    }

    pub fn open(size: Size) -> Grid {
        Grid {
            cells: Array2D::new(Cell::open(), size),
        }
    }

    /// Builds a grid from rows of text, `#` is an obstacle and anything else
    /// is open. Rows shorter than the first one are padded with obstacles.
    pub fn from_rows(rows: &[&str]) -> Grid {
        let cols = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut grid = Grid::filled(Size(rows.len(), cols));
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().take(cols).enumerate() {
                grid.set_obstacle(Pos(r as i32, c as i32), ch == '#');
            }
        }
        grid
    }

    pub fn size(&self) -> Size {
        self.cells.size()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.size().contains(pos)
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.cells.get(pos)
    }

    pub fn is_obstacle(&self, pos: Pos) -> Option<bool> {
        self.get(pos).map(Cell::is_obstacle)
    }

    pub fn is_visited(&self, pos: Pos) -> Option<bool> {
        self.get(pos).map(Cell::is_visited)
    }

    /// In bounds, not an obstacle and not visited.
    pub fn is_free(&self, pos: Pos) -> bool {
        self.get(pos).is_some_and(Cell::is_free)
    }

    pub fn set_obstacle(&mut self, pos: Pos, obstacle: bool) -> bool {
        match self.cells.get_mut(pos) {
            Some(cell) => {
                cell.obstacle = obstacle;
                true
            }
            None => false,
        }
    }

    pub fn mark_visited(&mut self, pos: Pos) -> bool {
        match self.cells.get_mut(pos) {
            Some(cell) => {
                cell.visited = true;
                true
            }
            None => false,
        }
    }

    pub fn clear_visited(&mut self) {
        self.cells.iter_mut().for_each(|cell| cell.visited = false);
    }

    /// Deep copy with obstacles kept and every visited mark reset, one per
    /// runner so runs never observe each other.
    pub fn clone_fresh(&self) -> Grid {
        let mut grid = self.clone();
        grid.clear_visited();
        grid
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.obstacle).count()
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    pub fn iter_pos(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter_pos()
    }

    pub fn open_neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        pos.neighbors()
            .into_iter()
            .filter(move |&n| self.is_obstacle(n) == Some(false))
    }

    /// Hop distances from `from` through open cells, `None` where unreachable.
    /// Ignores visited marks.
    pub fn distances_from(&self, from: Pos) -> Array2D<Option<u32>> {
        let mut dist = Array2D::new(None, self.size());
        if self.is_obstacle(from) != Some(false) {
            return dist;
        }

        let mut queue = VecDeque::from([from]);
        dist[from] = Some(0);
        while let Some(pos) = queue.pop_front() {
            let d = dist[pos].unwrap_or_default();
            for next in self.open_neighbors(pos) {
                if dist[next].is_none() {
                    dist[next] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }

        dist
    }

    pub fn is_reachable(&self, from: Pos, to: Pos) -> bool {
        self.distances_from(from).get(to).copied().flatten().is_some()
    }
}
