//! Dual-clock FIFO.
//!
//! The write domain owns the write pointer and the RAM write port; the read domain owns the read
//! pointer, the RAM read port and an optional output register. Each pointer crosses to the other
//! domain in gray code through a chain of `sync_stages` flops per bit, so a sample taken during an
//! increment is either the old or the new pointer. A stale pointer only makes the flags
//! conservative: the writer may see a full ring that has room, the reader an empty ring that has
//! data.
//!
//! Gray code only changes one bit per increment if the pointer range is a power of two, so the RAM
//! and the pointers span `depth.next_power_of_two()` slots. The flags still count against `depth`.

use static_assertions::const_assert;
use tracing::{debug, trace};

use super::tracker::{distance, index};
use crate::*;

/// Configuration of an [`AsyncFifo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncFifoConfig {
    /// Number of entries of the ring, at least 1.
    pub depth: usize,
    /// Registers the read-side output through a forward register slice.
    pub out_reg: bool,
    /// Number of capture stages of each pointer synchronizer.
    pub sync_stages: usize,
    /// Metastability model of the capture flops.
    pub metastability: Metastability,
}

const DEFAULT_DEPTH: usize = 16;
const_assert!(DEFAULT_DEPTH > 0);

impl Default for AsyncFifoConfig {
    fn default() -> Self {
        Self { depth: DEFAULT_DEPTH, out_reg: false, sync_stages: MIN_SYNC_STAGES, metastability: Metastability::Ideal }
    }
}

impl AsyncFifoConfig {
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

    /// Sets the number of synchronizer stages.
    #[must_use]
    pub fn with_sync_stages(mut self, sync_stages: usize) -> Self {
        self.sync_stages = sync_stages;
        self
    }

    /// Sets the metastability model.
    #[must_use]
    pub fn with_metastability(mut self, metastability: Metastability) -> Self {
        self.metastability = metastability;
        self
    }

    /// Returns the number of RAM slots, which is also half the pointer range.
    pub fn slots(&self) -> usize { self.depth.next_power_of_two() }

    /// Returns the configuration of the pointer synchronizers.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default().with_stages(self.sync_stages).with_metastability(self.metastability)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::Depth { depth: self.depth });
        }
        self.sync_config().validate()
    }
}

/// Registers of the write domain.
#[derive(Debug)]
struct WriteSide {
    wptr: GrayCounter,
    wptr_gray: Launch<usize>,
    rptr_sync: SyncChain<usize>,
    resolver: Resolver,
}

/// Registers of the read domain.
#[derive(Debug)]
struct ReadSide<V: Signal> {
    rptr: GrayCounter,
    rptr_gray: Launch<usize>,
    wptr_sync: SyncChain<usize>,
    resolver: Resolver,
    pipe: Pipe<V>,
}

/// Dual-clock FIFO.
#[derive(Debug)]
pub struct AsyncFifo<V: Signal> {
    config: AsyncFifoConfig,
    ram: Vec<V>,
    write: WriteSide,
    read: ReadSide<V>,
    bridge: ResetBridge,
}

impl<V: Signal> AsyncFifo<V> {
    /// Creates an empty FIFO.
    pub fn new(config: AsyncFifoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let out_pipe = FifoConfig { depth: config.depth, out_reg: config.out_reg }.out_pipe();
        let slots = config.slots();
        debug!(?config, slots, pointer_bits = ptr_width(slots), "async fifo created");
        Ok(Self {
            config,
            ram: vec![V::default(); slots],
            write: WriteSide {
                wptr: GrayCounter::new(2 * slots),
                wptr_gray: Launch::new(0),
                rptr_sync: SyncChain::new(config.sync_stages)?,
                resolver: Resolver::new(config.metastability, 1),
            },
            read: ReadSide {
                rptr: GrayCounter::new(2 * slots),
                rptr_gray: Launch::new(0),
                wptr_sync: SyncChain::new(config.sync_stages)?,
                resolver: Resolver::new(config.metastability, 2),
                pipe: Pipe::new(out_pipe)?,
            },
            bridge: ResetBridge::new(&config.sync_config())?,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AsyncFifoConfig { &self.config }

    /// Returns the reset bridge.
    pub fn bridge(&self) -> &ResetBridge { &self.bridge }

    /// Returns the ring status as seen by the write domain.
    pub fn write_status(&self) -> FifoStatus {
        let rptr = gray_to_bin(*self.write.rptr_sync.output());
        FifoStatus::from_count(distance(self.write.wptr.value(), rptr, self.ram.len()), self.config.depth)
    }

    /// Returns the ring status as seen by the read domain.
    pub fn read_status(&self) -> FifoStatus {
        let wptr = gray_to_bin(*self.read.wptr_sync.output());
        FifoStatus::from_count(distance(wptr, self.read.rptr.value(), self.ram.len()), self.config.depth)
    }

    /// Returns the true number of entries of the ring, which neither domain can observe.
    pub fn occupancy(&self) -> usize { distance(self.write.wptr.value(), self.read.rptr.value(), self.ram.len()) }

    /// Returns the number of metastable samples resolved by the pointer synchronizers.
    pub fn resolved(&self) -> u64 { self.write.resolver.resolved() + self.read.resolver.resolved() }

    fn head(&self) -> Valid<V> {
        if self.bridge.held(Domain::Dst) || self.read_status().empty {
            Valid::invalid()
        } else {
            Valid::valid(self.ram[index(self.read.rptr.value(), self.ram.len())].clone())
        }
    }

    fn clear(&mut self, domain: Domain) {
        match domain {
            Domain::Src => {
                self.write.wptr.clear();
                self.write.rptr_sync.clear();
            }
            Domain::Dst => {
                self.read.rptr.clear();
                self.read.wptr_sync.clear();
                self.read.pipe.reset();
            }
        }
    }
}

impl<V: Signal> ClockCrossing for AsyncFifo<V> {
    type I = VrChannel<V>;
    type O = VrChannel<V>;

    fn get_module_name(&self) -> &str { "async_fifo" }

    fn comb_src(&self, _: Valid<V>) -> Ready {
        Ready::new(!self.bridge.held(Domain::Src) && !self.write_status().full)
    }

    fn comb_dst(&self, o_bwd: Ready) -> Valid<V> {
        if self.bridge.held(Domain::Dst) {
            return Valid::invalid();
        }
        self.read.pipe.comb(self.head(), o_bwd).0
    }

    fn tick_src(&mut self, i_fwd: Valid<V>, now: Time) {
        let push = i_fwd.valid && self.comb_src(Valid::invalid()).ready;
        if self.bridge.edge(Domain::Src, now) {
            self.clear(Domain::Src);
        } else {
            if push {
                let slot = index(self.write.wptr.value(), self.ram.len());
                self.ram[slot] = i_fwd.inner;
                self.write.wptr.incr();
            }
            self.write.rptr_sync.capture(&self.read.rptr_gray, now, &mut self.write.resolver);
        }
        if !self.bridge.frozen(Domain::Src) {
            let gray = self.write.wptr.gray();
            if gray != *self.write.wptr_gray.value() {
                trace!(now, wptr = self.write.wptr.value(), gray, "write pointer launched");
            }
            self.write.wptr_gray.set(gray, now);
        }
    }

    fn tick_dst(&mut self, o_bwd: Ready, now: Time) {
        let held = self.bridge.held(Domain::Dst);
        let head = self.head();
        let (_, head_bwd) = self.read.pipe.comb(head.clone(), o_bwd.clone());
        let pop = !held && fire(&head, &head_bwd);

        if self.bridge.edge(Domain::Dst, now) {
            self.clear(Domain::Dst);
        } else {
            if !held {
                self.read.pipe.tick(head, o_bwd);
            }
            if pop {
                self.read.rptr.incr();
            }
            self.read.wptr_sync.capture(&self.write.wptr_gray, now, &mut self.read.resolver);
        }
        if !self.bridge.frozen(Domain::Dst) {
            let gray = self.read.rptr.gray();
            if gray != *self.read.rptr_gray.value() {
                trace!(now, rptr = self.read.rptr.value(), gray, "read pointer launched");
            }
            self.read.rptr_gray.set(gray, now);
        }
    }

    fn assert_reset(&mut self, domain: Domain, kind: ResetKind, now: Time) {
        if self.bridge.assert_reset(domain, kind, now) {
            self.clear(domain);
        }
    }

    fn release_reset(&mut self, domain: Domain) { self.bridge.release_reset(domain); }
}
