use std::{collections::VecDeque, fmt};

use log::debug;
use rand::{seq::SliceRandom as _, thread_rng, Rng as _, SeedableRng as _};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    array::Array2D,
    dims::{Dir, Pos, Size},
    grid::Grid,
};

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("Invalid maze size: {0:?}")]
    InvalidSize(Size),
    #[error("{what} position {pos:?} is outside of the {size:?} grid")]
    OutOfBounds {
        what: &'static str,
        pos: Pos,
        size: Size,
    },
}

/// What happened while generating one maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carving {
    pub seed: u64,
    /// Number of carve steps, each opens a wall cell and a lattice node.
    pub carves: usize,
    /// Lattice nodes opened, including start.
    pub nodes: usize,
    /// Cells opened afterwards to connect the end to the carved network.
    pub repaired: usize,
    /// Cycles closed by clearing the end and by the repair. Zero means the
    /// open cells still form a tree.
    pub loops: usize,
}

#[derive(Debug, Clone)]
pub struct Maze {
    pub grid: Grid,
    pub start: Pos,
    pub end: Pos,
    pub carving: Carving,
}

pub trait Carver: fmt::Debug + Sync + Send {
    /// Carves passages into a fully walled `grid`, starting at `start`.
    /// Returns the number of carve steps.
    fn carve(&self, grid: &mut Grid, start: Pos, rng: &mut Random) -> usize;
}

/// Iterative randomized depth-first search over a lattice with step 2, so
/// every passage keeps a wall one cell thick on both sides.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthFirstCarver;

impl Carver for DepthFirstCarver {
    fn carve(&self, grid: &mut Grid, start: Pos, rng: &mut Random) -> usize {
        let mut stack = Vec::with_capacity(grid.size().area() / 4 + 1);
        let mut carves = 0;

        grid.set_obstacle(start, false);
        grid.mark_visited(start);
        stack.push(start);

        while let Some(&current) = stack.last() {
            let unvisited = Dir::ALL
                .into_iter()
                .map(|dir| (current + dir.offset(), current + dir.offset() * 2))
                .filter(|&(_, node)| grid.is_visited(node) == Some(false))
                .collect::<SmallVec<[_; 4]>>();

            match unvisited.choose(rng) {
                Some(&(through, node)) => {
                    grid.set_obstacle(through, false);
                    grid.set_obstacle(node, false);
                    grid.mark_visited(node);
                    stack.push(node);
                    carves += 1;
                }
                None => {
                    stack.pop();
                }
            }
        }

        grid.clear_visited();
        carves
    }
}

#[derive(Debug)]
pub struct Generator {
    carver: Box<dyn Carver>,
    ensure_connected: bool,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Box::new(DepthFirstCarver))
    }
}

impl Generator {
    pub fn new(carver: Box<dyn Carver>) -> Self {
        Self {
            carver,
            ensure_connected: true,
        }
    }

    pub fn ensure_connected(mut self, value: bool) -> Self {
        self.ensure_connected = value;
        self
    }

    pub fn generate(
        &self,
        size: Size,
        start: Pos,
        end: Pos,
        seed: Option<u64>,
    ) -> Result<Maze, GenError> {
        validate(size, start, end)?;

        let seed = seed.unwrap_or_else(|| thread_rng().gen());
        let mut rng = Random::seed_from_u64(seed);

        let mut grid = Grid::filled(size);
        let carves = self.carver.carve(&mut grid, start, &mut rng);
        let nodes = grid.open_count();

        grid.set_obstacle(start, false);
        let mut loops = 0;
        if grid.is_obstacle(end) == Some(true) {
            grid.set_obstacle(end, false);
            // a cleared wall joins every open neighbor it has
            loops += grid.open_neighbors(end).count().saturating_sub(1);
        }

        let repair = if self.ensure_connected {
            connect(&mut grid, start, end)
        } else {
            Repair::default()
        };
        loops += repair.loops;

        debug!(
            "generated {}x{} maze, seed {}, {} carves, {} repaired, {} loops",
            size.0, size.1, seed, carves, repair.opened, loops
        );

        Ok(Maze {
            grid,
            start,
            end,
            carving: Carving {
                seed,
                carves,
                nodes: nodes - carves,
                repaired: repair.opened,
                loops,
            },
        })
    }
}

/// Largest grid accepted, every runner keeps a few arrays of this many cells.
pub const MAX_CELLS: usize = 1 << 22;

pub fn validate(size: Size, start: Pos, end: Pos) -> Result<(), GenError> {
    let too_big = size
        .0
        .checked_mul(size.1)
        .map_or(true, |cells| cells > MAX_CELLS);
    if size.is_empty() || too_big || size.0 > i32::MAX as usize || size.1 > i32::MAX as usize {
        return Err(GenError::InvalidSize(size));
    }
    for (what, pos) in [("Start", start), ("End", end)] {
        if !size.contains(pos) {
            return Err(GenError::OutOfBounds { what, pos, size });
        }
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Repair {
    opened: usize,
    loops: usize,
}

/// How the route search treats a cell.
enum Hop {
    Through,
    Attach,
    Avoid,
}

/// Opens a route from `end` to the cells reachable from `start`.
///
/// The route is the shortest one whose last wall borders exactly one
/// reachable cell, so the open cells stay a tree. When every candidate
/// borders more than one, the shortest route overall is opened and the
/// extra joins are counted as loops.
fn connect(grid: &mut Grid, start: Pos, end: Pos) -> Repair {
    let reach = grid.distances_from(start);
    if reach[end].is_some() {
        return Repair::default();
    }

    let reachable_around = |pos: Pos| {
        pos.neighbors()
            .into_iter()
            .filter(|&n| reach.get(n).is_some_and(Option::is_some))
            .count()
    };
    let hop = |pos: Pos, loop_free: bool| {
        if reach[pos].is_some() {
            return Hop::Avoid;
        }
        match reachable_around(pos) {
            0 => Hop::Through,
            1 => Hop::Attach,
            _ if loop_free => Hop::Avoid,
            _ => Hop::Attach,
        }
    };

    let size = grid.size();
    let route = find_route(size, end, |pos| hop(pos, true)).or_else(|| {
        debug!("no loop free route to {:?}, accepting a loop", end);
        find_route(size, end, |pos| hop(pos, false))
    });
    // start is always open, so some wall borders the reachable cells
    let Some(route) = route else {
        return Repair::default();
    };

    let mut opened = 0;
    for &pos in &route {
        if grid.is_obstacle(pos) == Some(true) {
            grid.set_obstacle(pos, false);
            opened += 1;
        }
    }
    let loops = route
        .first()
        .map_or(0, |&last| reachable_around(last).saturating_sub(1));

    debug!(
        "connected end {:?} to the carved network, opened {}, {} loops",
        end, opened, loops
    );
    Repair { opened, loops }
}

/// Breadth first search from `from` through `Through` cells, ending at the
/// first `Attach` cell. Returns the cells from that one back to `from`.
fn find_route(size: Size, from: Pos, hop: impl Fn(Pos) -> Hop) -> Option<Vec<Pos>> {
    let mut parent: Array2D<Option<Pos>> = Array2D::new(None, size);
    let mut queue = VecDeque::from([from]);
    parent[from] = Some(from);

    while let Some(pos) = queue.pop_front() {
        match hop(pos) {
            Hop::Avoid => {}
            Hop::Through => {
                for next in pos.neighbors() {
                    if size.contains(next) && parent[next].is_none() {
                        parent[next] = Some(pos);
                        queue.push_back(next);
                    }
                }
            }
            Hop::Attach => {
                let mut route = vec![pos];
                let mut current = pos;
                while current != from {
                    current = parent[current]?;
                    route.push(current);
                }
                return Some(route);
            }
        }
    }
    None
}
