//! Module.

use std::fmt::Debug;

use crate::*;

/// Single-clock module.
///
/// A module is a synchronous state machine between an input interface `I` and an output interface
/// `O`. In every cycle the surrounding logic first settles the combinational outputs with
/// [`Module::comb`], then advances the registers on the clock edge with [`Module::tick`] using
/// the same settled inputs.
///
/// `comb` must be a pure function of the registers and the given inputs. It may be evaluated any
/// number of times per cycle while a composition settles.
pub trait Module: Debug {
    /// Input interface.
    type I: Interface;

    /// Output interface.
    type O: Interface;

    /// Returns module name.
    fn get_module_name(&self) -> &str;

    /// Computes the current-cycle output forward signals and input backward signals.
    fn comb(&self, i_fwd: Fwd<Self::I>, o_bwd: Bwd<Self::O>) -> (Fwd<Self::O>, Bwd<Self::I>);

    /// Advances the registers by one clock edge.
    fn tick(&mut self, i_fwd: Fwd<Self::I>, o_bwd: Bwd<Self::O>);

    /// Returns the registers to their reset values.
    fn reset(&mut self);
}

impl<M: Module + ?Sized> Module for Box<M> {
    type I = M::I;
    type O = M::O;

    fn get_module_name(&self) -> &str { (**self).get_module_name() }

    fn comb(&self, i_fwd: Fwd<Self::I>, o_bwd: Bwd<Self::O>) -> (Fwd<Self::O>, Bwd<Self::I>) {
        (**self).comb(i_fwd, o_bwd)
    }

    fn tick(&mut self, i_fwd: Fwd<Self::I>, o_bwd: Bwd<Self::O>) { (**self).tick(i_fwd, o_bwd) }

    fn reset(&mut self) { (**self).reset() }
}

/// Boxed module between two valid-ready channels of the same payload.
pub type VrModule<V: Signal> = Box<dyn Module<I = VrChannel<V>, O = VrChannel<V>>>;

/// Composition combinators for modules.
pub trait ModuleExt: Module + Sized {
    /// Feeds the output of `self` to the input of `next`.
    fn chain<M: Module<I = Self::O>>(self, next: M) -> Chain<Self, M> { Chain::new(self, next) }

    /// Boxes `self`.
    fn boxed(self) -> Box<dyn Module<I = Self::I, O = Self::O>>
    where Self: 'static {
        Box::new(self)
    }
}

impl<M: Module> ModuleExt for M {}
