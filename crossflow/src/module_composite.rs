//! Composite modules comprising submodules.
//!
//! Composition wires the output of one module to the input of the next. Within a cycle the
//! forward signals flow from producer to consumer, but a consumer's ready may depend
//! combinationally on its own inputs and a producer's valid may depend on its output ready. The
//! composites therefore settle the internal backward signals to a fixed point before ticking.
//! An acyclic composition settles within a few rounds; failing to settle means a combinational
//! loop and panics.

use std::marker::PhantomData;

use tracing::trace;

use crate::*;

/// Maximum number of settle rounds per composition level.
pub const SETTLE_LIMIT: usize = 16;

/// Two modules connected back to back.
#[derive(Debug)]
pub struct Chain<A: Module, B: Module<I = A::O>> {
    first: A,
    second: B,
    module_name: String,
}

/// Settled signals of a chain.
struct Settled<A: Module, B: Module<I = A::O>> {
    mid_fwd: Fwd<A::O>,
    mid_bwd: Bwd<A::O>,
    o_fwd: Fwd<B::O>,
    i_bwd: Bwd<A::I>,
}

impl<A: Module, B: Module<I = A::O>> Chain<A, B> {
    /// Creates new chain.
    pub fn new(first: A, second: B) -> Self {
        let module_name = format!("{}_{}", first.get_module_name(), second.get_module_name());
        Self { first, second, module_name }
    }

    /// Returns the producer side.
    pub fn first(&self) -> &A { &self.first }

    /// Returns the consumer side.
    pub fn second(&self) -> &B { &self.second }

    fn settle(&self, i_fwd: &Fwd<A::I>, o_bwd: &Bwd<B::O>) -> Settled<A, B> {
        let mut mid_bwd = Bwd::<A::O>::default();
        for round in 0..SETTLE_LIMIT {
            let (mid_fwd, i_bwd) = self.first.comb(i_fwd.clone(), mid_bwd.clone());
            let (o_fwd, mid_bwd_next) = self.second.comb(mid_fwd.clone(), o_bwd.clone());
            if mid_bwd_next == mid_bwd {
                trace!(module = %self.module_name, round, "settled");
                return Settled { mid_fwd, mid_bwd, o_fwd, i_bwd };
            }
            mid_bwd = mid_bwd_next;
        }
        panic!(
            "combinational loop between `{}` and `{}`",
            self.first.get_module_name(),
            self.second.get_module_name()
        );
    }
}

impl<A: Module, B: Module<I = A::O>> Module for Chain<A, B> {
    type I = A::I;
    type O = B::O;

    fn get_module_name(&self) -> &str { &self.module_name }

    fn comb(&self, i_fwd: Fwd<A::I>, o_bwd: Bwd<B::O>) -> (Fwd<B::O>, Bwd<A::I>) {
        let settled = self.settle(&i_fwd, &o_bwd);
        (settled.o_fwd, settled.i_bwd)
    }

    fn tick(&mut self, i_fwd: Fwd<A::I>, o_bwd: Bwd<B::O>) {
        let Settled { mid_fwd, mid_bwd, .. } = self.settle(&i_fwd, &o_bwd);
        self.first.tick(i_fwd, mid_bwd);
        self.second.tick(mid_fwd, o_bwd);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

/// Sequence of modules of the same type, each feeding the next.
///
/// An empty cascade is a wire.
#[derive(Debug)]
pub struct Cascade<C: Interface, M: Module<I = C, O = C>> {
    stages: Vec<M>,
    module_name: String,
    _marker: PhantomData<C>,
}

impl<C: Interface, M: Module<I = C, O = C>> Cascade<C, M> {
    /// Creates new cascade.
    pub fn new(module_name: &str, stages: Vec<M>) -> Self {
        Self { stages, module_name: module_name.to_string(), _marker: PhantomData }
    }

    /// Returns the stages.
    pub fn stages(&self) -> &[M] { &self.stages }

    /// Settles the inter-stage wires.
    ///
    /// Returns the forward signals entering each stage, the backward signals leaving each stage's
    /// output, the cascade output and the cascade input backward signals.
    #[allow(clippy::type_complexity)]
    fn settle(&self, i_fwd: &Fwd<C>, o_bwd: &Bwd<C>) -> (Vec<Fwd<C>>, Vec<Bwd<C>>, Fwd<C>, Bwd<C>) {
        let n = self.stages.len();
        if n == 0 {
            return (vec![], vec![], i_fwd.clone(), o_bwd.clone());
        }

        // `bwds[i]` is the backward signal at the output of stage `i`.
        let mut bwds = vec![Bwd::<C>::default(); n];
        bwds[n - 1] = o_bwd.clone();

        for round in 0..SETTLE_LIMIT {
            let mut fwds = Vec::with_capacity(n);
            let mut i_bwds = Vec::with_capacity(n);
            let mut fwd = i_fwd.clone();
            for (stage, bwd) in self.stages.iter().zip(bwds.iter()) {
                fwds.push(fwd.clone());
                let (o_fwd, i_bwd) = stage.comb(fwd, bwd.clone());
                i_bwds.push(i_bwd);
                fwd = o_fwd;
            }

            let stable = (0..n - 1).all(|i| i_bwds[i + 1] == bwds[i]);
            if stable {
                trace!(module = %self.module_name, round, "settled");
                let i_bwd = i_bwds.swap_remove(0);
                return (fwds, bwds, fwd, i_bwd);
            }
            for i in 0..n - 1 {
                bwds[i] = i_bwds[i + 1].clone();
            }
        }
        panic!("combinational loop in `{}`", self.module_name);
    }
}

impl<C: Interface, M: Module<I = C, O = C>> Module for Cascade<C, M> {
    type I = C;
    type O = C;

    fn get_module_name(&self) -> &str { &self.module_name }

    fn comb(&self, i_fwd: Fwd<C>, o_bwd: Bwd<C>) -> (Fwd<C>, Bwd<C>) {
        let (_, _, o_fwd, i_bwd) = self.settle(&i_fwd, &o_bwd);
        (o_fwd, i_bwd)
    }

    fn tick(&mut self, i_fwd: Fwd<C>, o_bwd: Bwd<C>) {
        let (fwds, bwds, _, _) = self.settle(&i_fwd, &o_bwd);
        for ((stage, fwd), bwd) in self.stages.iter_mut().zip(fwds).zip(bwds) {
            stage.tick(fwd, bwd);
        }
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}
