//! Two-clock components.

use std::fmt::Debug;

use crate::*;

/// Component whose input interface is clocked by the source domain and whose output interface is
/// clocked by the destination domain.
///
/// Each domain is an independent half. A half reads the other half's state only through
/// [`Launch`] registers sampled by its own capture flops; `tick_src` and `tick_dst` may be called
/// in any interleaving dictated by the two clocks.
pub trait ClockCrossing: Debug {
    /// Input interface, in the source domain.
    type I: Interface;

    /// Output interface, in the destination domain.
    type O: Interface;

    /// Returns module name.
    fn get_module_name(&self) -> &str;

    /// Computes the input backward signals for the current source cycle.
    fn comb_src(&self, i_fwd: Fwd<Self::I>) -> Bwd<Self::I>;

    /// Computes the output forward signals for the current destination cycle.
    fn comb_dst(&self, o_bwd: Bwd<Self::O>) -> Fwd<Self::O>;

    /// Advances the source domain by one edge at `now`.
    fn tick_src(&mut self, i_fwd: Fwd<Self::I>, now: Time);

    /// Advances the destination domain by one edge at `now`.
    fn tick_dst(&mut self, o_bwd: Bwd<Self::O>, now: Time);

    /// Asserts the reset of `domain` at `now`.
    fn assert_reset(&mut self, domain: Domain, kind: ResetKind, now: Time);

    /// Releases the reset of `domain`; takes effect at the domain's next edge.
    fn release_reset(&mut self, domain: Domain);
}
