use std::collections::HashMap;
use std::mem::size_of;

use log::debug;

use super::Position;
use crate::board::MATE_UPPER;

/// Proven bounds on a position's value: `lower <= score <= upper`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub lower: i32,
    pub upper: i32,
}

impl Default for Entry {
    fn default() -> Self {
        Self { lower: -MATE_UPPER, upper: MATE_UPPER }
    }
}

impl Entry {
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }
}

/// Searches at different depths, or with and without null-move permission,
/// are not interchangeable and never share a slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key<P> {
    pub pos: P,
    pub depth: i32,
    pub can_null: bool,
}

impl<P> Key<P> {
    pub fn new(pos: P, depth: i32, can_null: bool) -> Self {
        Self { pos, depth, can_null }
    }
}

/// Score bounds per [`Key`] plus the best move known for each position.
///
/// Unbounded by default. With a capacity set, inserting a new key into a full
/// table flushes the score bounds; a flush only turns hits into misses, and a
/// miss reads as the unbounded entry, so it can never tighten a bound.
pub struct Tt<P: Position> {
    scores: HashMap<Key<P>, Entry>,
    moves: HashMap<P, P::Move>,
    capacity: Option<usize>,
    flushes: u64,
}

impl<P: Position> Default for Tt<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Position> Tt<P> {
    pub fn new() -> Self {
        Self { scores: HashMap::new(), moves: HashMap::new(), capacity: None, flushes: 0 }
    }

    pub fn clear(&mut self) {
        self.scores.clear();
        self.moves.clear();
    }

    /// Bounds stored for `key`, or the unbounded entry on a miss.
    pub fn get(&self, key: &Key<P>) -> Entry {
        self.scores.get(key).copied().unwrap_or_default()
    }

    pub fn put(&mut self, key: Key<P>, e: Entry) {
        if let Some(cap) = self.capacity {
            if self.scores.len() >= cap && !self.scores.contains_key(&key) {
                debug!("tt full at {} entries, flushing", self.scores.len());
                self.scores.clear();
                self.flushes += 1;
            }
        }
        self.scores.insert(key, e);
    }

    pub fn best_move(&self, pos: &P) -> Option<P::Move> {
        self.moves.get(pos).copied()
    }

    pub fn set_best_move(&mut self, pos: P, m: P::Move) {
        self.moves.insert(pos, m);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn moves_len(&self) -> usize {
        self.moves.len()
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key<P>, &Entry)> {
        self.scores.iter()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn set_capacity_entries(&mut self, cap: Option<usize>) {
        self.capacity = cap.map(|c| c.max(1));
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        // Rough per-entry footprint: key, bounds and hash map bookkeeping.
        let per_entry = size_of::<Key<P>>() + size_of::<Entry>() + 16;
        let entries = mb.saturating_mul(1024 * 1024) / per_entry;
        self.set_capacity_entries(if mb == 0 { None } else { Some(entries) });
    }
}
