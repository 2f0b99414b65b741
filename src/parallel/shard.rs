//! Sharded closed set and best-known-cost table (§4.5, §9): S independent
//! mutex-protected stripes keyed by `hash(board) mod S`, rather than one
//! contended concurrent map. Every operation here takes exactly one shard
//! lock and releases it before returning.

use crate::board::Board;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const DEFAULT_SHARD_COUNT: usize = 16;

fn shard_of(board: &Board, shard_count: usize) -> usize {
    let mut hasher = rustc_hash::FxHasher::default();
    board.hash(&mut hasher);
    (hasher.finish() as usize) % shard_count
}

pub struct ClosedSet {
    shards: Vec<Mutex<FxHashSet<Board>>>,
    count: AtomicUsize,
}

impl ClosedSet {
    pub fn new(shard_count: usize) -> Self {
        ClosedSet {
            shards: (0..shard_count).map(|_| Mutex::new(FxHashSet::default())).collect(),
            count: AtomicUsize::new(0),
        }
    }

    /// Inserts `board` if absent. Returns `true` if this call performed
    /// the insertion (the caller should keep the node); `false` if the
    /// board was already closed (the caller should discard the node).
    pub fn insert(&self, board: Board) -> bool {
        let idx = shard_of(&board, self.shards.len());
        let mut shard = self.shards[idx].lock().unwrap();
        let inserted = shard.insert(board);
        if inserted {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

pub struct BestGTable {
    shards: Vec<Mutex<FxHashMap<Board, u32>>>,
}

impl BestGTable {
    pub fn new(shard_count: usize) -> Self {
        BestGTable {
            shards: (0..shard_count)
                .map(|_| Mutex::new(FxHashMap::default()))
                .collect(),
        }
    }

    /// `true` iff `board` has no recorded cost, or its recorded cost is
    /// strictly greater than `g` — i.e. iff the caller's path is the best
    /// one seen so far and should be recorded and acted on. The table is
    /// updated in the same critical section so a racing relaxation check
    /// can never observe a stale entry.
    pub fn relax(&self, board: &Board, g: u32) -> bool {
        let idx = shard_of(board, self.shards.len());
        let mut shard = self.shards[idx].lock().unwrap();
        match shard.get(board) {
            Some(&known) if known <= g => false,
            _ => {
                shard.insert(board.clone(), g);
                true
            }
        }
    }

    /// `true` iff a strictly better path than `g` is already known — the
    /// relaxation gate applied to a node already pulled off a queue,
    /// where ties are *not* a reason to discard (the node may still be
    /// the authoritative settler for that cost).
    pub fn has_strictly_better(&self, board: &Board, g: u32) -> bool {
        let idx = shard_of(board, self.shards.len());
        let shard = self.shards[idx].lock().unwrap();
        matches!(shard.get(board), Some(&known) if known < g)
    }

    pub fn insert_if_absent(&self, board: Board, g: u32) {
        let idx = shard_of(&board, self.shards.len());
        let mut shard = self.shards[idx].lock().unwrap();
        shard.entry(board).or_insert(g);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn board(tiles: &[u8]) -> Board {
        Board::from_tiles(3, tiles.to_vec()).unwrap()
    }

    #[test]
    fn closed_set_insert_is_idempotent() {
        let closed = ClosedSet::new(DEFAULT_SHARD_COUNT);
        let b = board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert!(closed.insert(b.clone()));
        assert!(!closed.insert(b));
        assert_eq!(closed.len(), 1);
    }

    #[test]
    fn best_g_relaxes_only_on_strictly_better_cost() {
        let table = BestGTable::new(DEFAULT_SHARD_COUNT);
        let b = board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert!(table.relax(&b, 5));
        assert!(!table.relax(&b, 5), "equal cost should not relax again");
        assert!(table.relax(&b, 3), "strictly better cost should relax");
        assert!(!table.relax(&b, 4), "worse cost than the new best should not relax");
    }

    #[test]
    fn has_strictly_better_ignores_ties() {
        let table = BestGTable::new(DEFAULT_SHARD_COUNT);
        let b = board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        table.insert_if_absent(b.clone(), 4);
        assert!(!table.has_strictly_better(&b, 4));
        assert!(table.has_strictly_better(&b, 5));
        assert!(!table.has_strictly_better(&b, 3));
    }
}
