//! FIFO tracker.
//!
//! Read and write pointers are one bit wider than the index: they count modulo `2 * depth`, so a
//! full ring (`wptr - rptr == depth`) and an empty ring (`wptr == rptr`) are told apart without a
//! separate flag.

/// Pointers of a circular buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracker {
    depth: usize,
    wptr: usize,
    rptr: usize,
}

impl Tracker {
    /// Creates an empty tracker.
    pub fn new(depth: usize) -> Self { Self { depth, wptr: 0, rptr: 0 } }

    /// Returns the depth.
    pub fn depth(&self) -> usize { self.depth }

    /// Returns the number of entries.
    pub fn count(&self) -> usize { distance(self.wptr, self.rptr, self.depth) }

    /// Returns whether the ring is full.
    pub fn full(&self) -> bool { self.count() == self.depth }

    /// Returns whether the ring is empty.
    pub fn empty(&self) -> bool { self.wptr == self.rptr }

    /// Returns the slot to be written next.
    pub fn write_index(&self) -> usize { index(self.wptr, self.depth) }

    /// Returns the slot to be read next.
    pub fn read_index(&self) -> usize { index(self.rptr, self.depth) }

    /// Advances the pointers on an enqueue and/or a dequeue.
    pub fn update(&mut self, enq: bool, deq: bool) {
        debug_assert!(!(enq && self.full()), "enqueue into a full ring");
        debug_assert!(!(deq && self.empty()), "dequeue from an empty ring");
        if enq {
            self.wptr = incr(self.wptr, self.depth);
        }
        if deq {
            self.rptr = incr(self.rptr, self.depth);
        }
    }

    /// Empties the ring.
    pub fn clear(&mut self) {
        self.wptr = 0;
        self.rptr = 0;
    }
}

/// Increments a pointer modulo `2 * depth`.
pub fn incr(ptr: usize, depth: usize) -> usize { (ptr + 1) % (2 * depth) }

/// Returns the slot a pointer addresses.
pub fn index(ptr: usize, depth: usize) -> usize { ptr % depth }

/// Returns the number of entries between a write and a read pointer.
pub fn distance(wptr: usize, rptr: usize, depth: usize) -> usize { (wptr + 2 * depth - rptr) % (2 * depth) }
