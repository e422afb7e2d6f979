//! Handshake pipeline stages.
//!
//! A pipe is a cascade of identical stages. Which path of the handshake a stage registers is
//! chosen by two flags:
//!
//! | `data_pipe` | `ready_pipe` | stage                  | latency |
//! |-------------|--------------|------------------------|---------|
//! | false       | false        | wire                   | 0       |
//! | true        | false        | [`register_slice_fwd`] | 1       |
//! | false       | true         | [`register_slice_bwd`] | 0       |
//! | true        | true         | [`buffer_skid`]        | 1       |

use tracing::{debug, warn};

use crate::*;

/// Configuration of a [`Pipe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeConfig {
    /// Number of stages.
    pub stages: usize,
    /// Registers the data path.
    pub data_pipe: bool,
    /// Registers the ready path.
    pub ready_pipe: bool,
}

impl Default for PipeConfig {
    fn default() -> Self { Self { stages: 1, data_pipe: true, ready_pipe: false } }
}

impl PipeConfig {
    /// Sets the number of stages.
    #[must_use]
    pub fn with_stages(mut self, stages: usize) -> Self {
        self.stages = stages;
        self
    }

    /// Sets whether the data path is registered.
    #[must_use]
    pub fn with_data_pipe(mut self, data_pipe: bool) -> Self {
        self.data_pipe = data_pipe;
        self
    }

    /// Sets whether the ready path is registered.
    #[must_use]
    pub fn with_ready_pipe(mut self, ready_pipe: bool) -> Self {
        self.ready_pipe = ready_pipe;
        self
    }

    /// A single pass-through stage.
    pub fn wire() -> Self { Self { stages: 1, data_pipe: false, ready_pipe: false } }

    /// Cycles from an accepted input beat to its earliest appearance at the output.
    pub fn latency(&self) -> usize { if self.data_pipe { self.stages } else { 0 } }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages == 0 {
            return Err(ConfigError::PipeStages);
        }
        Ok(())
    }

    fn stage<V: Signal>(&self) -> VrModule<V> {
        match (self.data_pipe, self.ready_pipe) {
            (false, false) => wire::<V>().boxed(),
            (true, false) => register_slice_fwd::<V>().boxed(),
            (false, true) => register_slice_bwd::<V>().boxed(),
            (true, true) => buffer_skid::<V>().boxed(),
        }
    }
}

/// Pipeline of handshake stages.
#[derive(Debug)]
pub struct Pipe<V: Signal> {
    config: PipeConfig,
    inner: Cascade<VrChannel<V>, VrModule<V>>,
    /// Beats inside the pipe.
    occupancy: usize,
}

impl<V: Signal> Pipe<V> {
    /// Creates a pipe.
    pub fn new(config: PipeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.stages > 1 && !config.data_pipe && !config.ready_pipe {
            warn!(stages = config.stages, "pipe of wires registers nothing");
        }
        let stages = (0..config.stages).map(|_| config.stage()).collect();
        debug!(?config, "pipe created");
        Ok(Self { config, inner: Cascade::new("pipe", stages), occupancy: 0 })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipeConfig { &self.config }

    /// Returns the number of beats accepted but not yet delivered.
    pub fn occupancy(&self) -> usize { self.occupancy }
}

impl<V: Signal> Module for Pipe<V> {
    type I = VrChannel<V>;
    type O = VrChannel<V>;

    fn get_module_name(&self) -> &str { self.inner.get_module_name() }

    fn comb(&self, i_fwd: Valid<V>, o_bwd: Ready) -> (Valid<V>, Ready) { self.inner.comb(i_fwd, o_bwd) }

    fn tick(&mut self, i_fwd: Valid<V>, o_bwd: Ready) {
        let (o_fwd, i_bwd) = self.inner.comb(i_fwd.clone(), o_bwd.clone());
        if fire(&i_fwd, &i_bwd) {
            self.occupancy += 1;
        }
        if fire(&o_fwd, &o_bwd) {
            self.occupancy -= 1;
        }
        self.inner.tick(i_fwd, o_bwd);
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.occupancy = 0;
    }
}
