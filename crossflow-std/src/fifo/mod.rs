//! FIFOs.

pub mod async_fifo;
pub mod tracker;

pub use async_fifo::*;
use tracing::debug;
use tracker::Tracker;

use crate::*;

/// Configuration of a [`Fifo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoConfig {
    /// Number of entries of the ring.
    pub depth: usize,
    /// Registers the output through a forward register slice.
    pub out_reg: bool,
}

impl Default for FifoConfig {
    fn default() -> Self { Self { depth: 16, out_reg: false } }
}

impl FifoConfig {
    /// Sets the depth.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Sets whether the output is registered.
    #[must_use]
    pub fn with_out_reg(mut self, out_reg: bool) -> Self {
        self.out_reg = out_reg;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::Depth { depth: self.depth });
        }
        Ok(())
    }

    pub(crate) fn out_pipe(&self) -> PipeConfig {
        if self.out_reg {
            PipeConfig::default()
        } else {
            PipeConfig::wire()
        }
    }
}

/// Occupancy flags of a ring, as seen by one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FifoStatus {
    /// No entry can be written.
    pub full: bool,
    /// No entry can be read.
    pub empty: bool,
    /// Number of entries.
    pub count: usize,
}

impl FifoStatus {
    /// Derives the flags from an entry count.
    pub fn from_count(count: usize, depth: usize) -> Self { Self { full: count >= depth, empty: count == 0, count } }
}

/// Circular buffer with first-word fall-through.
///
/// The head entry is presented combinationally. The input is ready iff the ring is not full,
/// independently of the output ready.
#[derive(Debug)]
pub struct FifoCore<V: Signal> {
    storage: Vec<V>,
    tracker: Tracker,
}

impl<V: Signal> FifoCore<V> {
    /// Creates an empty ring.
    pub fn new(depth: usize) -> Self { Self { storage: vec![V::default(); depth], tracker: Tracker::new(depth) } }

    /// Returns the status of the ring.
    pub fn status(&self) -> FifoStatus { FifoStatus::from_count(self.tracker.count(), self.tracker.depth()) }
}

impl<V: Signal> Module for FifoCore<V> {
    type I = VrChannel<V>;
    type O = VrChannel<V>;

    fn get_module_name(&self) -> &str { "fifo_core" }

    fn comb(&self, _: Valid<V>, _: Ready) -> (Valid<V>, Ready) {
        let head = if self.tracker.empty() {
            Valid::invalid()
        } else {
            Valid::valid(self.storage[self.tracker.read_index()].clone())
        };
        (head, Ready::new(!self.tracker.full()))
    }

    fn tick(&mut self, i_fwd: Valid<V>, o_bwd: Ready) {
        let enq = i_fwd.valid && !self.tracker.full();
        let deq = !self.tracker.empty() && o_bwd.ready;
        if enq {
            let index = self.tracker.write_index();
            self.storage[index] = i_fwd.inner;
        }
        self.tracker.update(enq, deq);
    }

    fn reset(&mut self) { self.tracker.clear(); }
}

/// Synchronous FIFO.
#[derive(Debug)]
pub struct Fifo<V: Signal> {
    config: FifoConfig,
    inner: Chain<FifoCore<V>, Pipe<V>>,
}

impl<V: Signal> Fifo<V> {
    /// Creates an empty FIFO.
    pub fn new(config: FifoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let inner = FifoCore::new(config.depth).chain(Pipe::new(config.out_pipe())?);
        debug!(?config, "fifo created");
        Ok(Self { config, inner })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FifoConfig { &self.config }

    /// Returns the status of the ring.
    pub fn status(&self) -> FifoStatus { self.inner.first().status() }

    /// Returns the number of beats stored, including the one held by the output register.
    pub fn occupancy(&self) -> usize { self.inner.first().status().count + self.inner.second().occupancy() }
}

impl<V: Signal> Module for Fifo<V> {
    type I = VrChannel<V>;
    type O = VrChannel<V>;

    fn get_module_name(&self) -> &str { "fifo" }

    fn comb(&self, i_fwd: Valid<V>, o_bwd: Ready) -> (Valid<V>, Ready) { self.inner.comb(i_fwd, o_bwd) }

    fn tick(&mut self, i_fwd: Valid<V>, o_bwd: Ready) { self.inner.tick(i_fwd, o_bwd) }

    fn reset(&mut self) { self.inner.reset() }
}
