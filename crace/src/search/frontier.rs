use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, VecDeque},
    fmt,
};

use crate::dims::Pos;

/// A discovered position and how many moves it took to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub pos: Pos,
    pub hops: u32,
}

/// Discovered but not yet expanded positions of one search.
pub trait Frontier: fmt::Debug + Send {
    fn push(&mut self, entry: Entry);

    fn pop(&mut self) -> Option<Entry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct Queue(VecDeque<Entry>);

impl Frontier for Queue {
    fn push(&mut self, entry: Entry) {
        self.0.push_back(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Default)]
pub struct Stack(Vec<Entry>);

impl Frontier for Stack {
    fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug)]
struct Keyed {
    priority: u32,
    seq: u64,
    entry: Entry,
}

impl Keyed {
    fn key(&self) -> Reverse<(u32, u64)> {
        // reversed so the max-heap hands out the smallest priority first
        Reverse((self.priority, self.seq))
    }
}

impl Ord for Keyed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Keyed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Keyed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Keyed {}

/// Hands out the entry closest to `target` in Manhattan distance.
///
/// Equal distances come out in insertion order, which is the order a stable
/// sort of the whole frontier before every extraction would produce.
#[derive(Debug)]
pub struct ClosestTo {
    target: Pos,
    heap: BinaryHeap<Keyed>,
    seq: u64,
}

impl ClosestTo {
    pub fn new(target: Pos) -> Self {
        Self {
            target,
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl Frontier for ClosestTo {
    fn push(&mut self, entry: Entry) {
        self.heap.push(Keyed {
            priority: entry.pos.manhattan(self.target),
            seq: self.seq,
            entry,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<Entry> {
        self.heap.pop().map(|keyed| keyed.entry)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(row: i32, col: i32) -> Entry {
        Entry {
            pos: Pos(row, col),
            hops: 0,
        }
    }

    fn drain(frontier: &mut dyn Frontier) -> Vec<Pos> {
        std::iter::from_fn(|| frontier.pop()).map(|e| e.pos).collect()
    }

    #[test]
    fn queue_and_stack() {
        let mut queue = Queue::default();
        let mut stack = Stack::default();
        for e in [entry(0, 1), entry(0, 2), entry(0, 3)] {
            queue.push(e);
            stack.push(e);
        }
        assert_eq!(drain(&mut queue), [Pos(0, 1), Pos(0, 2), Pos(0, 3)]);
        assert_eq!(drain(&mut stack), [Pos(0, 3), Pos(0, 2), Pos(0, 1)]);
    }

    #[test]
    fn closest_breaks_ties_by_insertion() {
        let mut frontier = ClosestTo::new(Pos(0, 0));
        for e in [entry(2, 0), entry(0, 1), entry(1, 1), entry(0, 2), entry(1, 0)] {
            frontier.push(e);
        }
        assert_eq!(frontier.len(), 5);
        assert_eq!(
            drain(&mut frontier),
            [Pos(0, 1), Pos(1, 0), Pos(2, 0), Pos(1, 1), Pos(0, 2)]
        );
        assert!(frontier.is_empty());
    }

    #[test]
    fn closest_matches_stable_resort() {
        // reference: stable sort of the whole frontier before every pop
        let target = Pos(3, 3);
        let pushes = [
            vec![entry(0, 0), entry(5, 5), entry(3, 0)],
            vec![entry(0, 3), entry(6, 0)],
            vec![],
            vec![entry(3, 6), entry(2, 2)],
            vec![],
        ];

        let mut frontier = ClosestTo::new(target);
        let mut reference: Vec<Entry> = Vec::new();
        for batch in pushes {
            for e in batch {
                frontier.push(e);
                reference.push(e);
            }
            reference.sort_by_key(|e| e.pos.manhattan(target));
            let expected = (!reference.is_empty()).then(|| reference.remove(0));
            assert_eq!(frontier.pop(), expected);
        }
    }
}
