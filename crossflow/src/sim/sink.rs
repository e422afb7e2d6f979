//! Response collectors.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::Drain;
use crate::*;

/// Consumes a valid-ready channel, withdrawing `ready` at random.
#[derive(Debug, Clone)]
pub struct Sink<V: Signal> {
    ready: bool,
    stall: f64,
    rng: ChaCha8Rng,
    cycle: u64,
    received: Vec<V>,
    received_cycles: Vec<u64>,
}

impl<V: Signal> Sink<V> {
    /// Creates a sink that deasserts `ready` with probability `stall_percent`% each cycle.
    pub fn new(stall_percent: u32, seed: u64) -> Result<Self, ConfigError> {
        if stall_percent > 100 {
            return Err(ConfigError::StallPercent { percent: stall_percent });
        }
        let mut sink = Self {
            ready: false,
            stall: percent_to_prob(stall_percent),
            rng: ChaCha8Rng::seed_from_u64(seed),
            cycle: 0,
            received: Vec::new(),
            received_cycles: Vec::new(),
        };
        sink.ready = sink.draw();
        Ok(sink)
    }

    /// Overrides the stall probability from the next cycle on.
    pub fn set_stall(&mut self, stall_percent: u32) { self.stall = percent_to_prob(stall_percent); }

    /// Returns the cycle at which each beat was received.
    pub fn received_cycles(&self) -> &[u64] { &self.received_cycles }

    fn draw(&mut self) -> bool { self.stall == 0.0 || !self.rng.gen_bool(self.stall) }
}

impl<V: Signal> Drain for Sink<V> {
    type Bwd = Ready;
    type Fwd = Valid<V>;
    type Item = V;

    fn bwd(&self) -> Ready { Ready::new(self.ready) }

    fn accepts(&self, fwd: &Valid<V>) -> bool { fwd.valid && self.ready }

    fn tick(&mut self, fwd: Valid<V>) {
        if self.accepts(&fwd) {
            self.received.push(fwd.inner);
            self.received_cycles.push(self.cycle);
        }
        self.cycle += 1;
        self.ready = self.draw();
    }

    fn received(&self) -> &[V] { &self.received }
}

/// Records the pulses of a channel without backpressure.
#[derive(Debug, Clone, Default)]
pub struct Monitor<V: Signal> {
    cycle: u64,
    received: Vec<V>,
    received_cycles: Vec<u64>,
}

impl<V: Signal> Monitor<V> {
    /// Creates a monitor.
    pub fn new() -> Self { Self { cycle: 0, received: Vec::new(), received_cycles: Vec::new() } }

    /// Returns the cycle at which each pulse was seen.
    pub fn received_cycles(&self) -> &[u64] { &self.received_cycles }
}

impl<V: Signal> Drain for Monitor<V> {
    type Bwd = ();
    type Fwd = Valid<V>;
    type Item = V;

    fn bwd(&self) {}

    fn accepts(&self, fwd: &Valid<V>) -> bool { fwd.valid }

    fn tick(&mut self, fwd: Valid<V>) {
        if fwd.valid {
            self.received.push(fwd.inner);
            self.received_cycles.push(self.cycle);
        }
        self.cycle += 1;
    }

    fn received(&self) -> &[V] { &self.received }
}
