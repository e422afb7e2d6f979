//! Stimulus source.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::*;

/// Drives a valid-ready channel from a queue of beats.
///
/// Once a beat is presented it stays on the channel unchanged until it is accepted; stalls only
/// delay the presentation of the next beat.
#[derive(Debug, Clone)]
pub struct Source<V: Signal> {
    queue: VecDeque<V>,
    presented: Option<V>,
    stall: f64,
    rng: ChaCha8Rng,
    cycle: u64,
    sent: Vec<V>,
    sent_cycles: Vec<u64>,
}

impl<V: Signal> Source<V> {
    /// Creates a source that withholds the next beat with probability `stall_percent`%.
    pub fn new(beats: impl IntoIterator<Item = V>, stall_percent: u32, seed: u64) -> Result<Self, ConfigError> {
        if stall_percent > 100 {
            return Err(ConfigError::StallPercent { percent: stall_percent });
        }
        let mut source = Self {
            queue: beats.into_iter().collect(),
            presented: None,
            stall: percent_to_prob(stall_percent),
            rng: ChaCha8Rng::seed_from_u64(seed),
            cycle: 0,
            sent: Vec::new(),
            sent_cycles: Vec::new(),
        };
        source.refill();
        Ok(source)
    }

    /// Appends beats to the queue.
    pub fn push(&mut self, beats: impl IntoIterator<Item = V>) {
        self.queue.extend(beats);
        if self.presented.is_none() {
            self.refill();
        }
    }

    /// Returns the forward signals for the current cycle.
    pub fn fwd(&self) -> Valid<V> { Valid::from(self.presented.clone()) }

    /// Returns the beat currently presented.
    pub fn presented(&self) -> Option<&V> { self.presented.as_ref() }

    /// Returns whether every beat has been accepted.
    pub fn is_done(&self) -> bool { self.presented.is_none() && self.queue.is_empty() }

    /// Returns the accepted beats in order.
    pub fn sent(&self) -> &[V] { &self.sent }

    /// Returns the cycle at which each beat was accepted.
    pub fn sent_cycles(&self) -> &[u64] { &self.sent_cycles }

    /// Drops every beat not yet accepted, including the one presented.
    pub fn flush(&mut self) {
        self.presented = None;
        self.queue.clear();
    }

    /// Advances by one edge given the sink's `ready`.
    pub fn tick(&mut self, bwd: &Ready) {
        if bwd.ready {
            if let Some(beat) = self.presented.take() {
                self.sent.push(beat);
                self.sent_cycles.push(self.cycle);
            }
        }
        self.cycle += 1;
        if self.presented.is_none() {
            self.refill();
        }
    }

    fn refill(&mut self) {
        if self.queue.is_empty() || (self.stall > 0.0 && self.rng.gen_bool(self.stall)) {
            return;
        }
        self.presented = self.queue.pop_front();
    }
}
