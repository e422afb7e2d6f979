//! Static configuration shared by the components.

use static_assertions::const_assert;
use thiserror::Error;

use crate::clock::Time;

/// Maximum depth of a synchronizer chain.
pub const MAX_SYNC_STAGES: usize = 16;

/// Minimum depth of a synchronizer chain.
pub const MIN_SYNC_STAGES: usize = 2;

const_assert!(MIN_SYNC_STAGES >= 2);
const_assert!(MAX_SYNC_STAGES >= MIN_SYNC_STAGES);

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("synchronizer depth {stages} is outside {min}..={max}", min = MIN_SYNC_STAGES, max = MAX_SYNC_STAGES)]
    SyncStages { stages: usize },

    #[error("pipeline needs at least one stage")]
    PipeStages,

    #[error("FIFO depth must be at least 1, got {depth}")]
    Depth { depth: usize },

    #[error("clock period must be positive")]
    ClockPeriod,

    #[error("stall probability {percent}% is above 100%")]
    StallPercent { percent: u32 },
}

/// How a capture flop resolves a sample taken while its input is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metastability {
    /// A change is seen by any capture edge strictly after it.
    #[default]
    Ideal,

    /// A change less than `aperture` before a capture edge resolves every changing bit to its old or
    /// new value at random.
    Random {
        /// Setup/hold window around the capture edge.
        aperture: Time,
        /// Seed of the resolution RNG.
        seed: u64,
    },
}

impl Metastability {
    /// Returns the window in which a sample is metastable.
    pub fn aperture(&self) -> Time {
        match self {
            Self::Ideal => 0,
            Self::Random { aperture, .. } => *aperture,
        }
    }
}
