//! Testbench toolkit.
//!
//! A [`Source`] drives a valid-ready input with random stalls while obeying the
//! stability-until-accepted rule, a [`Sink`] or [`Monitor`] records what leaves the design, and a
//! bench advances everything by clock edges: [`Bench`] for [`Module`]s and [`DualClockBench`] for
//! [`ClockCrossing`]s. A probe callback sees every cycle before the registers advance, which is
//! where reference-model checks go.

mod bench;
mod sink;
mod source;

use std::fmt::Debug;

use thiserror::Error;

pub use bench::*;
pub use sink::*;
pub use source::*;

use crate::*;

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("timed out after {cycles} cycles with {received}/{expected} beats received")]
    Timeout { cycles: u64, received: usize, expected: usize },

    #[error("beat {index} mismatched: expected {expected}, got {actual}")]
    Mismatch { index: usize, expected: String, actual: String },

    #[error("check failed at {time}ps: {message}")]
    Check { time: Time, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Compares the received sequence against the sent sequence.
pub fn check_in_order<V: Signal>(expected: &[V], actual: &[V]) -> Result<(), SimError> {
    for (index, (e, a)) in expected.iter().zip(actual).enumerate() {
        if e != a {
            return Err(SimError::Mismatch { index, expected: format!("{e:?}"), actual: format!("{a:?}") });
        }
    }
    if expected.len() != actual.len() {
        let index = expected.len().min(actual.len());
        let show = |v: &[V]| v.get(index).map_or_else(|| "nothing".to_string(), |v| format!("{v:?}"));
        return Err(SimError::Mismatch { index, expected: show(expected), actual: show(actual) });
    }
    Ok(())
}

/// Fails a probe with a message.
pub fn ensure(cond: bool, time: Time, message: impl FnOnce() -> String) -> Result<(), SimError> {
    if cond {
        Ok(())
    } else {
        Err(SimError::Check { time, message: message() })
    }
}

/// What a probe sees at one instant, before the registers advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Time of the instant; the cycle index for single-clock benches.
    pub time: Time,
    /// Whether the source (or only) clock has an edge.
    pub src: bool,
    /// Whether the destination (or only) clock has an edge.
    pub dst: bool,
    /// Beats accepted from the source before this instant.
    pub sent: usize,
    /// Beats recorded by the drain before this instant.
    pub received: usize,
    /// Beats accepted from the source at this instant.
    pub sending: bool,
    /// Beats recorded by the drain at this instant.
    pub receiving: bool,
}

/// Consumer side of a bench.
pub trait Drain: Debug {
    /// Forward signals consumed.
    type Fwd: Signal;
    /// Backward signals driven.
    type Bwd: Signal;
    /// Recorded item.
    type Item: Signal;

    /// Backward signals for the current cycle.
    fn bwd(&self) -> Self::Bwd;

    /// Whether the current cycle records a beat given `fwd`.
    fn accepts(&self, fwd: &Self::Fwd) -> bool;

    /// Advances by one edge.
    fn tick(&mut self, fwd: Self::Fwd);

    /// Items recorded so far.
    fn received(&self) -> &[Self::Item];
}
