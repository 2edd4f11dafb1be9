mod frontier;

pub use frontier::{ClosestTo, Entry, Frontier, Queue, Stack};

use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::{array::Array2D, dims::Pos, grid::Grid};

/// The four searches that race each other.
///
/// The priority based ones are named by what they actually order by, the
/// labels shown to the user keep the classic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    BreadthFirst,
    DepthFirst,
    /// Closest to the end first, no path cost is accumulated.
    GreedyBestFirst,
    /// Closest to the start first, by Manhattan distance.
    OriginDistance,
}

impl SearchKind {
    pub const ALL: [SearchKind; 4] = [
        SearchKind::BreadthFirst,
        SearchKind::DepthFirst,
        SearchKind::GreedyBestFirst,
        SearchKind::OriginDistance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchKind::BreadthFirst => "BFS",
            SearchKind::DepthFirst => "DFS",
            SearchKind::GreedyBestFirst => "A*",
            SearchKind::OriginDistance => "Dijkstra",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SearchKind::BreadthFirst => "breadth-first, FIFO queue",
            SearchKind::DepthFirst => "depth-first, LIFO stack",
            SearchKind::GreedyBestFirst => "greedy best-first, distance to end",
            SearchKind::OriginDistance => "nearest-first, distance from start",
        }
    }

    pub fn frontier(self, start: Pos, end: Pos) -> Box<dyn Frontier> {
        match self {
            SearchKind::BreadthFirst => Box::<Queue>::default(),
            SearchKind::DepthFirst => Box::<Stack>::default(),
            SearchKind::GreedyBestFirst => Box::new(ClosestTo::new(end)),
            SearchKind::OriginDistance => Box::new(ClosestTo::new(start)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `end` was taken from the frontier `hops` moves away from start.
    Found { hops: u32, expanded: usize },
    /// Frontier ran dry, `end` can't be reached.
    NotFound { expanded: usize },
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found { .. })
    }

    pub fn expanded(&self) -> usize {
        match *self {
            Outcome::Found { expanded, .. } | Outcome::NotFound { expanded } => expanded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Cell was taken from the frontier and its neighbors discovered.
    Visited(Entry),
    Finished(Outcome),
}

/// One search over its own copy of the grid.
///
/// The runner is advanced one extraction at a time with [`SearchRunner::step`],
/// so callers can interleave several runners and pace them however they like.
#[derive(Debug)]
pub struct SearchRunner {
    kind: SearchKind,
    grid: Grid,
    start: Pos,
    end: Pos,
    frontier: Box<dyn Frontier>,
    parents: Array2D<Option<Pos>>,
    expanded: Array2D<bool>,
    order: Vec<Pos>,
    outcome: Option<Outcome>,
}

impl SearchRunner {
    /// Takes ownership of `grid`, visited marks already on it are respected.
    pub fn new(kind: SearchKind, mut grid: Grid, start: Pos, end: Pos) -> Self {
        let mut frontier = kind.frontier(start, end);
        if grid.mark_visited(start) {
            frontier.push(Entry { pos: start, hops: 0 });
        }

        Self {
            kind,
            parents: Array2D::new(None, grid.size()),
            expanded: Array2D::new(false, grid.size()),
            order: Vec::new(),
            grid,
            start,
            end,
            frontier,
            outcome: None,
        }
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn end(&self) -> Pos {
        self.end
    }

    pub fn is_obstacle(&self, pos: Pos) -> Option<bool> {
        self.grid.is_obstacle(pos)
    }

    /// Discovered, either expanded already or waiting in the frontier.
    pub fn is_visited(&self, pos: Pos) -> Option<bool> {
        self.grid.is_visited(pos)
    }

    pub fn is_expanded(&self, pos: Pos) -> Option<bool> {
        self.expanded.get(pos).copied()
    }

    /// Expanded positions in traversal order.
    pub fn order(&self) -> &[Pos] {
        &self.order
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn step(&mut self) -> Step {
        if let Some(outcome) = self.outcome {
            return Step::Finished(outcome);
        }

        let Some(entry) = self.frontier.pop() else {
            return self.finish(Outcome::NotFound {
                expanded: self.order.len(),
            });
        };

        if entry.pos == self.end {
            return self.finish(Outcome::Found {
                hops: entry.hops,
                expanded: self.order.len(),
            });
        }

        self.order.push(entry.pos);
        self.expanded[entry.pos] = true;

        for next in entry.pos.neighbors() {
            if self.grid.is_free(next) {
                self.grid.mark_visited(next);
                self.parents[next] = Some(entry.pos);
                self.frontier.push(Entry {
                    pos: next,
                    hops: entry.hops + 1,
                });
            }
        }

        trace!(
            target: self.kind.label(),
            "expanded {:?}, frontier {}",
            entry.pos,
            self.frontier.len()
        );

        Step::Visited(entry)
    }

    /// Steps until the search finishes.
    pub fn run(&mut self) -> Outcome {
        loop {
            if let Step::Finished(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Route from start to end along the discovery tree, once the end was found.
    pub fn path(&self) -> Option<Vec<Pos>> {
        if !self.outcome?.is_found() {
            return None;
        }

        let mut path = vec![self.end];
        let mut current = self.end;
        while current != self.start {
            current = self.parents.get(current).copied().flatten()?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    fn finish(&mut self, outcome: Outcome) -> Step {
        match outcome {
            Outcome::Found { hops, expanded } => info!(
                target: self.kind.label(),
                "reached {:?} in {} hops, {} cells expanded",
                self.end,
                hops,
                expanded
            ),
            Outcome::NotFound { expanded } => info!(
                target: self.kind.label(),
                "gave up after {} cells, {:?} is unreachable",
                expanded,
                self.end
            ),
        }
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }
}
