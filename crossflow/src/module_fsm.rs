//! Finite state machine (Mealy machine).

use std::fmt;
use std::marker::PhantomData;

use crate::*;

/// Finite state machine (Mealy machine).
///
/// The FSM is described by `F`, which computes (1) the current-cycle output forward signals,
/// (2) the current-cycle input backward signals, and (3) the next-cycle state, from the input
/// forward signals, the output backward signals and the current state.
pub struct Fsm<I: Interface, O: Interface, S: Signal, F>
where F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)
{
    /// Module name.
    module_name: String,
    /// FSM function.
    f: F,
    /// Initial value of registers in the FSM.
    init: S,
    /// Current value of registers in the FSM.
    state: S,
    _marker: PhantomData<(I, O)>,
}

impl<I: Interface, O: Interface, S: Signal, F> Fsm<I, O, S, F>
where F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)
{
    /// Creates a new FSM.
    pub fn new(module_name: &str, init: S, f: F) -> Self {
        Self { module_name: module_name.to_string(), f, state: init.clone(), init, _marker: PhantomData }
    }
}

impl<I: Interface, O: Interface, S: Signal, F> fmt::Debug for Fsm<I, O, S, F>
where F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm").field("module_name", &self.module_name).field("state", &self.state).finish()
    }
}

impl<I: Interface, O: Interface, S: Signal, F> Module for Fsm<I, O, S, F>
where F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)
{
    type I = I;
    type O = O;

    fn get_module_name(&self) -> &str { &self.module_name }

    fn comb(&self, i_fwd: I::Fwd, o_bwd: O::Bwd) -> (O::Fwd, I::Bwd) {
        let (o_fwd, i_bwd, _) = (self.f)(i_fwd, o_bwd, self.state.clone());
        (o_fwd, i_bwd)
    }

    fn tick(&mut self, i_fwd: I::Fwd, o_bwd: O::Bwd) {
        let (_, _, state_next) = (self.f)(i_fwd, o_bwd, self.state.clone());
        self.state = state_next;
    }

    fn reset(&mut self) { self.state = self.init.clone(); }
}

/// Creates a combinational module that passes a valid-ready channel through unchanged.
pub fn wire<V: Signal>() -> impl Module<I = VrChannel<V>, O = VrChannel<V>> {
    Fsm::<VrChannel<V>, VrChannel<V>, (), _>::new("wire", (), |fwd, bwd, s| (fwd, bwd, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accumulates accepted values; the output is the running sum.
    fn accumulator() -> impl Module<I = VrChannel<u32>, O = UniChannel<u32>> {
        Fsm::<VrChannel<u32>, UniChannel<u32>, u32, _>::new("accumulator", 0, |fwd, _, sum| {
            let sum_next = if fwd.valid { sum.wrapping_add(fwd.inner) } else { sum };
            (sum, Ready::new(true), sum_next)
        })
    }

    #[test]
    fn state_advances_only_on_tick() {
        let mut m = accumulator();
        let (out, ready) = m.comb(Valid::valid(5), ());
        assert_eq!(out, 0);
        assert!(ready.ready);

        // Repeated evaluation does not change the state.
        let _ = m.comb(Valid::valid(5), ());
        assert_eq!(m.comb(Valid::invalid(), ()).0, 0);

        m.tick(Valid::valid(5), ());
        m.tick(Valid::valid(7), ());
        assert_eq!(m.comb(Valid::invalid(), ()).0, 12);

        m.reset();
        assert_eq!(m.comb(Valid::invalid(), ()).0, 0);
    }

    #[test]
    fn wire_is_transparent() {
        let m = wire::<u8>();
        let (fwd, bwd) = m.comb(Valid::valid(9), Ready::new(false));
        assert_eq!(fwd, Valid::valid(9));
        assert!(!bwd.ready);
    }
}
