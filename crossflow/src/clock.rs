//! Clocks and the two-domain edge scheduler.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::*;

/// Simulation time in picoseconds.
pub type Time = u64;

/// Clock domains of a two-clock component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Source domain (write side of a FIFO).
    Src,
    /// Destination domain (read side of a FIFO).
    Dst,
}

impl Domain {
    /// Returns the other domain.
    pub fn peer(self) -> Self {
        match self {
            Self::Src => Self::Dst,
            Self::Dst => Self::Src,
        }
    }
}

/// How a reset assertion takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// Applied at the next edge of the domain's clock.
    Sync,
    /// Applied immediately at the assertion time, released at a clock edge.
    Async,
}

/// Free-running clock.
#[derive(Debug, Clone)]
pub struct Clock {
    period: Time,
    jitter: Time,
    next_edge: Time,
    cycles: u64,
    rng: ChaCha8Rng,
}

impl Clock {
    /// Creates a clock whose first rising edge is at `phase`.
    pub fn new(period: Time, phase: Time) -> Result<Self, ConfigError> {
        if period == 0 {
            return Err(ConfigError::ClockPeriod);
        }
        Ok(Self { period, jitter: 0, next_edge: phase, cycles: 0, rng: ChaCha8Rng::seed_from_u64(0) })
    }

    /// Adds up to `jitter` picoseconds of random period variation, drawn from a seeded RNG.
    ///
    /// The jitter is clamped below the period so that edges stay strictly ordered.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Time, seed: u64) -> Self {
        self.jitter = jitter.min(self.period - 1);
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Returns the nominal period.
    pub fn period(&self) -> Time { self.period }

    /// Returns the time of the next rising edge.
    pub fn next_edge(&self) -> Time { self.next_edge }

    /// Returns the number of edges taken so far.
    pub fn cycles(&self) -> u64 { self.cycles }

    /// Takes the next edge and returns its time.
    pub fn advance(&mut self) -> Time {
        let edge = self.next_edge;
        let period = if self.jitter == 0 {
            self.period
        } else {
            let low = self.period - self.jitter;
            self.rng.gen_range(low..=self.period + self.jitter)
        };
        self.next_edge += period;
        self.cycles += 1;
        edge
    }
}

/// Clock edges occurring at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edges {
    /// Time of the edges.
    pub time: Time,
    /// Whether the source clock has an edge.
    pub src: bool,
    /// Whether the destination clock has an edge.
    pub dst: bool,
}

impl Edges {
    /// Returns whether `domain` has an edge.
    pub fn has(&self, domain: Domain) -> bool {
        match domain {
            Domain::Src => self.src,
            Domain::Dst => self.dst,
        }
    }
}

/// Merges the source and destination clocks into one ordered stream of edges.
#[derive(Debug, Clone)]
pub struct Scheduler {
    src: Clock,
    dst: Clock,
}

impl Scheduler {
    /// Creates a scheduler.
    pub fn new(src: Clock, dst: Clock) -> Self { Self { src, dst } }

    /// Creates a scheduler whose destination period is `percent`% of the source period.
    ///
    /// The destination clock starts a third of a source period late so that coincident and
    /// near-coincident edges both occur at integer ratios.
    pub fn with_ratio(src_period: Time, percent: u64) -> Result<Self, ConfigError> {
        let dst_period = src_period * percent / 100;
        Ok(Self::new(Clock::new(src_period, 0)?, Clock::new(dst_period, src_period / 3)?))
    }

    /// Returns the clock of `domain`.
    pub fn clock(&self, domain: Domain) -> &Clock {
        match domain {
            Domain::Src => &self.src,
            Domain::Dst => &self.dst,
        }
    }

    /// Returns the clock of `domain` mutably.
    pub fn clock_mut(&mut self, domain: Domain) -> &mut Clock {
        match domain {
            Domain::Src => &mut self.src,
            Domain::Dst => &mut self.dst,
        }
    }

    /// Takes the next instant with at least one edge.
    pub fn next_edges(&mut self) -> Edges {
        let time = self.src.next_edge().min(self.dst.next_edge());
        let src = self.src.next_edge() == time;
        let dst = self.dst.next_edge() == time;
        if src {
            let _ = self.src.advance();
        }
        if dst {
            let _ = self.dst.advance();
        }
        Edges { time, src, dst }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_merged_in_time_order() {
        let mut scheduler = Scheduler::new(Clock::new(10, 0).unwrap(), Clock::new(15, 0).unwrap());
        let edges = (0..5).map(|_| scheduler.next_edges()).collect::<Vec<_>>();
        assert_eq!(edges[0], Edges { time: 0, src: true, dst: true });
        assert_eq!(edges[1], Edges { time: 10, src: true, dst: false });
        assert_eq!(edges[2], Edges { time: 15, src: false, dst: true });
        assert_eq!(edges[3], Edges { time: 20, src: true, dst: false });
        assert_eq!(edges[4], Edges { time: 30, src: true, dst: true });
    }

    #[test]
    fn ratio_scales_destination_period() {
        let scheduler = Scheduler::with_ratio(1000, 432).unwrap();
        assert_eq!(scheduler.clock(Domain::Dst).period(), 4320);
        assert!(Scheduler::with_ratio(1000, 0).is_err());
    }

    #[test]
    fn jitter_keeps_edges_increasing() {
        let mut clock = Clock::new(100, 0).unwrap().with_jitter(500, 7);
        let mut last = clock.advance();
        for _ in 0..1000 {
            let edge = clock.advance();
            assert!(edge > last);
            last = edge;
        }
    }
}
