//! A worker's local open set: the priority queue and the memory pool it
//! draws nodes from, combined behind one mutex so that the pool is, per
//! the specification's shared-resource policy, "mutated only under its
//! queue mutex."
//!
//! Entries move between queues only while a node is still unexpanded (in
//! `open`, never yet popped): a steal physically copies the node's
//! content into the stealer's own pool and releases the donor's slot.
//! Once a node is popped and expanded it never moves again, so a
//! successor's `parent` reference — `(owner_worker, NodeId)` — stays
//! valid for the rest of the search; only the garbage nodes released by
//! pruning, relaxation, or a closed-set collision are ever recycled, and
//! those were never referenced as anyone's parent.

use crate::parallel::pool::{NodeId, Pool, PooledNode};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

/// f-cost value used to mean "this worker has nothing in flight."
pub const MIN_F_IDLE: u32 = u32::MAX;

/// How many entries a stealer drains from a victim's queue in one pass.
pub const STEAL_BATCH_SIZE: usize = 16;

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    f: u32,
    h: u32,
    id: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.h == other.h
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reversed so `BinaryHeap`, a max-heap, yields the smallest `(f, h)`
/// first — the same trick the sequential solver's `HeapEntry` uses.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.h.cmp(&self.h))
    }
}

struct Inner {
    pool: Pool,
    heap: BinaryHeap<HeapEntry>,
}

/// One worker's share of the parallel engine's state: its open set and
/// the arena its nodes live in, plus the two atomics other workers read
/// without taking the lock (`open_count` as a stealing hint, `min_f` for
/// the termination sniff).
pub struct WorkerQueue {
    inner: Mutex<Inner>,
    open_count: AtomicUsize,
    min_f: AtomicU32,
}

impl Default for WorkerQueue {
    fn default() -> Self {
        WorkerQueue {
            inner: Mutex::new(Inner {
                pool: Pool::new(),
                heap: BinaryHeap::new(),
            }),
            open_count: AtomicUsize::new(0),
            min_f: AtomicU32::new(MIN_F_IDLE),
        }
    }
}

impl WorkerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_count(&self) -> usize {
        self.open_count.load(AtomicOrdering::Relaxed)
    }

    pub fn min_f(&self) -> u32 {
        self.min_f.load(AtomicOrdering::SeqCst)
    }

    pub fn set_min_f(&self, f: u32) {
        self.min_f.store(f, AtomicOrdering::SeqCst);
    }

    pub fn mark_idle(&self) {
        self.set_min_f(MIN_F_IDLE);
    }

    /// Allocates `node` in this worker's own pool and pushes it to the
    /// open set. Used both for seeding the initial node and for
    /// promoting a surviving successor after expansion.
    pub fn push(&self, node: PooledNode) -> NodeId {
        let f = node.f;
        let h = node.h;
        let mut guard = self.inner.lock().unwrap();
        let id = guard.pool.alloc(node);
        guard.heap.push(HeapEntry { f, h, id });
        self.open_count.store(guard.heap.len(), AtomicOrdering::Relaxed);
        id
    }

    /// Pops the best node from this worker's own open set and publishes
    /// its f-cost to `min_f` before releasing the queue lock — or
    /// publishes idle (∞) if the queue was empty. The termination
    /// protocol's safety argument depends on this happening under the
    /// same lock as the pop itself, so that no other worker can ever
    /// observe a dequeue without also being able to observe the f-cost
    /// of the node that was dequeued.
    pub fn pop(&self) -> Option<(NodeId, PooledNode)> {
        let mut guard = self.inner.lock().unwrap();
        match guard.heap.pop() {
            Some(entry) => {
                let content = guard.pool.get(entry.id).clone();
                self.open_count.store(guard.heap.len(), AtomicOrdering::Relaxed);
                self.min_f.store(content.f, AtomicOrdering::SeqCst);
                Some((entry.id, content))
            }
            None => {
                self.min_f.store(MIN_F_IDLE, AtomicOrdering::SeqCst);
                None
            }
        }
    }

    /// Returns `id` to this worker's own pool. The caller must own `id`
    /// (it must have come from this queue) and must not read through it
    /// again.
    pub fn release(&self, id: NodeId) {
        let mut guard = self.inner.lock().unwrap();
        guard.pool.release(id);
    }

    /// Reads the content stored at `id` in this worker's own pool,
    /// without removing it. Used for parent-chain traversal during path
    /// reconstruction, after all workers have stopped.
    pub fn get(&self, id: NodeId) -> PooledNode {
        self.inner.lock().unwrap().pool.get(id).clone()
    }

    /// Live nodes currently held by this worker (open + settled,
    /// everything not yet released) — this worker's contribution to the
    /// memory high-water mark.
    pub fn live_count(&self) -> usize {
        self.inner.lock().unwrap().pool.live_count()
    }

    /// Attempts a non-blocking steal of up to [`STEAL_BATCH_SIZE`] nodes
    /// from `victim`. On success, the best of the drained nodes is
    /// allocated into this worker's own pool and returned to the caller
    /// for immediate processing; the rest are pushed to this worker's
    /// own open set; `min_f` is published while the pool/heap insertion
    /// still holds this worker's own queue lock, same as `pop`. Returns
    /// `None` without touching this worker's state if the victim's lock
    /// is contended or its queue is empty.
    pub fn try_steal_from(&self, victim: &WorkerQueue) -> Option<(NodeId, PooledNode)> {
        let mut drained = Vec::with_capacity(STEAL_BATCH_SIZE);
        {
            let mut victim_guard = victim.inner.try_lock().ok()?;
            for _ in 0..STEAL_BATCH_SIZE {
                match victim_guard.heap.pop() {
                    Some(entry) => {
                        let content = victim_guard.pool.get(entry.id).clone();
                        victim_guard.pool.release(entry.id);
                        drained.push(content);
                    }
                    None => break,
                }
            }
            victim
                .open_count
                .store(victim_guard.heap.len(), AtomicOrdering::Relaxed);
        }
        if drained.is_empty() {
            return None;
        }

        let mut iter = drained.into_iter();
        let best = iter.next().unwrap();

        let mut guard = self.inner.lock().unwrap();
        let best_id = guard.pool.alloc(best.clone());
        for node in iter {
            let (f, h) = (node.f, node.h);
            let id = guard.pool.alloc(node);
            guard.heap.push(HeapEntry { f, h, id });
        }
        self.open_count.store(guard.heap.len(), AtomicOrdering::Relaxed);
        self.min_f.store(best.f, AtomicOrdering::SeqCst);
        drop(guard);

        Some((best_id, best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn board(tiles: &[u8]) -> Board {
        Board::from_tiles(3, tiles.to_vec()).unwrap()
    }

    fn node(board: Board, g: u32, h: u32) -> PooledNode {
        PooledNode {
            board,
            g,
            h,
            f: g + h,
            parent: None,
        }
    }

    #[test]
    fn pop_returns_lowest_f_then_lowest_h() {
        let q = WorkerQueue::new();
        q.push(node(board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]), 5, 3));
        q.push(node(board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]), 2, 1));
        q.push(node(board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]), 2, 0));
        let (_, first) = q.pop().unwrap();
        assert_eq!(first.f, 2);
        assert_eq!(first.h, 0);
    }

    #[test]
    fn steal_drains_victim_and_keeps_best_for_the_stealer() {
        let victim = WorkerQueue::new();
        victim.push(node(board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]), 5, 5));
        victim.push(node(board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]), 1, 1));
        victim.push(node(board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]), 3, 3));

        let thief = WorkerQueue::new();
        let (_, stolen) = thief.try_steal_from(&victim).unwrap();
        assert_eq!(stolen.f, 2, "thief should retain the victim's best entry");
        assert_eq!(victim.open_count(), 0);
        assert_eq!(thief.open_count(), 2, "the other two entries move to the thief's own queue");
    }

    #[test]
    fn steal_from_empty_victim_fails_cleanly() {
        let victim = WorkerQueue::new();
        let thief = WorkerQueue::new();
        assert!(thief.try_steal_from(&victim).is_none());
    }
}
