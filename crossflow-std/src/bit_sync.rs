//! Synchronizer chains.
//!
//! A value crossing into a clock domain is captured by a chain of flops clocked by that domain.
//! The first flop may go metastable; each further stage gives it a destination cycle to resolve.
//! Only the last stage is safe to use.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::*;

/// Configuration of a synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Number of capture stages.
    pub stages: usize,
    /// Metastability model of the capture flops.
    pub metastability: Metastability,
}

impl Default for SyncConfig {
    fn default() -> Self { Self { stages: MIN_SYNC_STAGES, metastability: Metastability::Ideal } }
}

impl SyncConfig {
    /// Sets the number of stages.
    #[must_use]
    pub fn with_stages(mut self, stages: usize) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the metastability model.
    #[must_use]
    pub fn with_metastability(mut self, metastability: Metastability) -> Self {
        self.metastability = metastability;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SYNC_STAGES..=MAX_SYNC_STAGES).contains(&self.stages) {
            return Err(ConfigError::SyncStages { stages: self.stages });
        }
        if matches!(self.metastability, Metastability::Random { aperture: 0, .. }) {
            warn!("random metastability with a zero aperture never resolves a sample");
        }
        Ok(())
    }
}

/// Chain of capture stages.
#[derive(Debug, Clone)]
pub struct SyncChain<V: Signal> {
    stages: ArrayVec<V, MAX_SYNC_STAGES>,
}

/// Single-bit synchronizer.
pub type BitSync = SyncChain<bool>;

impl<V: Signal> SyncChain<V> {
    /// Creates a chain of `stages` flops holding the default value.
    pub fn new(stages: usize) -> Result<Self, ConfigError> {
        if !(MIN_SYNC_STAGES..=MAX_SYNC_STAGES).contains(&stages) {
            return Err(ConfigError::SyncStages { stages });
        }
        Ok(Self { stages: (0..stages).map(|_| V::default()).collect() })
    }

    /// Returns the number of stages.
    pub fn depth(&self) -> usize { self.stages.len() }

    /// Returns the synchronized value.
    pub fn output(&self) -> &V { &self.stages[self.stages.len() - 1] }

    /// Shifts the chain at a destination edge `now`. The first stage samples `input`.
    pub fn capture(&mut self, input: &Launch<V>, now: Time, resolver: &mut Resolver) {
        let sample = input.sample(now, resolver);
        self.shift(sample);
    }

    /// Shifts `value` into the first stage.
    pub fn shift(&mut self, value: V) {
        for i in (1..self.stages.len()).rev() {
            self.stages[i] = self.stages[i - 1].clone();
        }
        self.stages[0] = value;
    }

    /// Sets every stage to the default value.
    pub fn clear(&mut self) {
        for stage in &mut self.stages {
            *stage = V::default();
        }
    }
}

/// Single bit crossing from the source to the destination domain.
///
/// The source drives a launch register; the destination output follows it `stages` destination
/// edges after the first edge that samples the change.
#[derive(Debug)]
pub struct BitSyncCrossing {
    launch: Launch<bool>,
    chain: BitSync,
    resolver: Resolver,
    /// Reset asserted per domain.
    src_reset: bool,
    dst_reset: bool,
}

impl BitSyncCrossing {
    /// Creates a synchronizer.
    pub fn new(config: SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(?config, "bit synchronizer created");
        Ok(Self {
            launch: Launch::new(false),
            chain: SyncChain::new(config.stages)?,
            resolver: Resolver::new(config.metastability, 0),
            src_reset: false,
            dst_reset: false,
        })
    }

    /// Returns the chain.
    pub fn chain(&self) -> &BitSync { &self.chain }

    /// Returns the number of metastable samples resolved so far.
    pub fn resolved(&self) -> u64 { self.resolver.resolved() }
}

impl ClockCrossing for BitSyncCrossing {
    type I = UniChannel<bool>;
    type O = UniChannel<bool>;

    fn get_module_name(&self) -> &str { "bit_sync" }

    fn comb_src(&self, _: bool) {}

    fn comb_dst(&self, _: ()) -> bool { !self.dst_reset && *self.chain.output() }

    fn tick_src(&mut self, i_fwd: bool, now: Time) { self.launch.set(i_fwd && !self.src_reset, now); }

    fn tick_dst(&mut self, _: (), now: Time) {
        if self.dst_reset {
            self.chain.clear();
        } else {
            self.chain.capture(&self.launch, now, &mut self.resolver);
        }
    }

    fn assert_reset(&mut self, domain: Domain, kind: ResetKind, now: Time) {
        debug!(?domain, ?kind, now, "bit synchronizer reset asserted");
        match domain {
            Domain::Src => {
                self.src_reset = true;
                if kind == ResetKind::Async {
                    self.launch.set(false, now);
                }
            }
            Domain::Dst => {
                self.dst_reset = true;
                if kind == ResetKind::Async {
                    self.chain.clear();
                }
            }
        }
    }

    fn release_reset(&mut self, domain: Domain) {
        match domain {
            Domain::Src => self.src_reset = false,
            Domain::Dst => self.dst_reset = false,
        }
    }
}
