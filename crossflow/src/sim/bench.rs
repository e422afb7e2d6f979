//! Benches driving a design under test from a [`Source`] into a [`Drain`].

use tracing::{debug, info};

use super::{Drain, Probe, SimError, Source};
use crate::*;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Cycles (or instants, for two clocks) simulated in this run.
    pub cycles: u64,
    /// Beats accepted from the source in total.
    pub sent: usize,
    /// Beats recorded by the drain in total.
    pub received: usize,
}

/// Single-clock bench.
#[derive(Debug)]
pub struct Bench<V: Signal, M: Module<I = VrChannel<V>>, D: Drain<Fwd = Fwd<M::O>, Bwd = Bwd<M::O>>> {
    source: Source<V>,
    dut: M,
    drain: D,
    cycle: u64,
}

impl<V: Signal, M: Module<I = VrChannel<V>>, D: Drain<Fwd = Fwd<M::O>, Bwd = Bwd<M::O>>> Bench<V, M, D> {
    /// Creates a bench.
    pub fn new(source: Source<V>, dut: M, drain: D) -> Self { Self { source, dut, drain, cycle: 0 } }

    /// Returns the source.
    pub fn source(&self) -> &Source<V> { &self.source }

    /// Returns the source mutably.
    pub fn source_mut(&mut self) -> &mut Source<V> { &mut self.source }

    /// Returns the design under test.
    pub fn dut(&self) -> &M { &self.dut }

    /// Returns the design under test mutably.
    pub fn dut_mut(&mut self) -> &mut M { &mut self.dut }

    /// Returns the drain.
    pub fn drain(&self) -> &D { &self.drain }

    /// Returns the drain mutably.
    pub fn drain_mut(&mut self) -> &mut D { &mut self.drain }

    /// Returns the number of cycles simulated.
    pub fn cycle(&self) -> u64 { self.cycle }

    /// Simulates one cycle. `probe` sees the settled cycle before the registers advance.
    pub fn step(&mut self, probe: &mut impl FnMut(&Probe, &M) -> Result<(), SimError>) -> Result<(), SimError> {
        let i_fwd = self.source.fwd();
        let o_bwd = self.drain.bwd();
        let (o_fwd, i_bwd) = self.dut.comb(i_fwd.clone(), o_bwd.clone());

        let info = Probe {
            time: self.cycle,
            src: true,
            dst: true,
            sent: self.source.sent().len(),
            received: self.drain.received().len(),
            sending: fire(&i_fwd, &i_bwd),
            receiving: self.drain.accepts(&o_fwd),
        };
        probe(&info, &self.dut)?;

        self.dut.tick(i_fwd, o_bwd);
        self.source.tick(&i_bwd);
        self.drain.tick(o_fwd);
        self.cycle += 1;
        Ok(())
    }

    /// Runs until the source is exhausted and `expected` beats were received, or `max_cycles` pass.
    pub fn run(
        &mut self, expected: usize, max_cycles: u64, mut probe: impl FnMut(&Probe, &M) -> Result<(), SimError>,
    ) -> Result<Report, SimError> {
        let start = self.cycle;
        info!(dut = self.dut.get_module_name(), expected, "run started");
        while !(self.source.is_done() && self.drain.received().len() >= expected) {
            if self.cycle - start >= max_cycles {
                return Err(SimError::Timeout {
                    cycles: max_cycles,
                    received: self.drain.received().len(),
                    expected,
                });
            }
            self.step(&mut probe)?;
        }
        let report = Report {
            cycles: self.cycle - start,
            sent: self.source.sent().len(),
            received: self.drain.received().len(),
        };
        info!(dut = self.dut.get_module_name(), cycles = report.cycles, "run completed");
        Ok(report)
    }

    /// Runs exactly `cycles` cycles.
    pub fn idle(
        &mut self, cycles: u64, mut probe: impl FnMut(&Probe, &M) -> Result<(), SimError>,
    ) -> Result<(), SimError> {
        for _ in 0..cycles {
            self.step(&mut probe)?;
        }
        Ok(())
    }
}

/// Two-clock bench. The source runs on the source clock and the drain on the destination clock.
#[derive(Debug)]
pub struct DualClockBench<
    V: Signal,
    X: ClockCrossing<I = VrChannel<V>>,
    D: Drain<Fwd = Fwd<X::O>, Bwd = Bwd<X::O>>,
> {
    source: Source<V>,
    dut: X,
    drain: D,
    scheduler: Scheduler,
    now: Time,
    instants: u64,
}

impl<V: Signal, X: ClockCrossing<I = VrChannel<V>>, D: Drain<Fwd = Fwd<X::O>, Bwd = Bwd<X::O>>>
    DualClockBench<V, X, D>
{
    /// Creates a bench.
    pub fn new(source: Source<V>, dut: X, drain: D, scheduler: Scheduler) -> Self {
        Self { source, dut, drain, scheduler, now: 0, instants: 0 }
    }

    /// Returns the source.
    pub fn source(&self) -> &Source<V> { &self.source }

    /// Returns the source mutably.
    pub fn source_mut(&mut self) -> &mut Source<V> { &mut self.source }

    /// Returns the design under test.
    pub fn dut(&self) -> &X { &self.dut }

    /// Returns the design under test mutably.
    pub fn dut_mut(&mut self) -> &mut X { &mut self.dut }

    /// Returns the drain.
    pub fn drain(&self) -> &D { &self.drain }

    /// Returns the drain mutably.
    pub fn drain_mut(&mut self) -> &mut D { &mut self.drain }

    /// Returns the time of the last simulated instant.
    pub fn now(&self) -> Time { self.now }

    /// Returns the scheduler.
    pub fn scheduler(&self) -> &Scheduler { &self.scheduler }

    /// Returns the time of the next edge of `domain`.
    pub fn next_edge(&self, domain: Domain) -> Time { self.scheduler.clock(domain).next_edge() }

    /// Simulates the next instant with at least one clock edge.
    ///
    /// Both halves evaluate their combinational logic against the state before the instant, then
    /// the registers of every clocked domain advance.
    pub fn step(&mut self, probe: &mut impl FnMut(&Probe, &X) -> Result<(), SimError>) -> Result<(), SimError> {
        let edges = self.scheduler.next_edges();
        self.now = edges.time;

        let i_fwd = self.source.fwd();
        let i_bwd = self.dut.comb_src(i_fwd.clone());
        let o_bwd = self.drain.bwd();
        let o_fwd = self.dut.comb_dst(o_bwd.clone());

        let info = Probe {
            time: edges.time,
            src: edges.src,
            dst: edges.dst,
            sent: self.source.sent().len(),
            received: self.drain.received().len(),
            sending: edges.src && fire(&i_fwd, &i_bwd),
            receiving: edges.dst && self.drain.accepts(&o_fwd),
        };
        probe(&info, &self.dut)?;

        if edges.src {
            self.dut.tick_src(i_fwd, edges.time);
            self.source.tick(&i_bwd);
        }
        if edges.dst {
            self.dut.tick_dst(o_bwd, edges.time);
            self.drain.tick(o_fwd);
        }
        self.instants += 1;
        Ok(())
    }

    /// Runs until the source is exhausted and `expected` beats were received, or `max_instants`
    /// instants pass.
    pub fn run(
        &mut self, expected: usize, max_instants: u64, mut probe: impl FnMut(&Probe, &X) -> Result<(), SimError>,
    ) -> Result<Report, SimError> {
        let start = self.instants;
        info!(dut = self.dut.get_module_name(), expected, "run started");
        while !(self.source.is_done() && self.drain.received().len() >= expected) {
            if self.instants - start >= max_instants {
                debug!(now = self.now, "run timed out");
                return Err(SimError::Timeout {
                    cycles: max_instants,
                    received: self.drain.received().len(),
                    expected,
                });
            }
            self.step(&mut probe)?;
        }
        let report = Report {
            cycles: self.instants - start,
            sent: self.source.sent().len(),
            received: self.drain.received().len(),
        };
        info!(dut = self.dut.get_module_name(), cycles = report.cycles, now = self.now, "run completed");
        Ok(report)
    }

    /// Runs every instant strictly before `until`.
    pub fn run_until(
        &mut self, until: Time, mut probe: impl FnMut(&Probe, &X) -> Result<(), SimError>,
    ) -> Result<(), SimError> {
        while self.next_edge(Domain::Src).min(self.next_edge(Domain::Dst)) < until {
            self.step(&mut probe)?;
        }
        Ok(())
    }
}

/// Probe that checks nothing.
pub fn no_probe<M: ?Sized>(_: &Probe, _: &M) -> Result<(), SimError> { Ok(()) }
