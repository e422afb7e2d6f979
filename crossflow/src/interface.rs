//! Channel interfaces.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::*;

/// Interface of channels.
///
/// An interface is a bundle of forward signals (driven by the producer) and backward signals
/// (driven by the consumer). Interfaces are marker types; the values live in `Fwd` and `Bwd`.
pub trait Interface: 'static + Sized + Debug {
    /// Forward signals.
    type Fwd: Signal;

    /// Backward signals.
    type Bwd: Signal;
}

/// Forward signals of an interface.
pub type Fwd<I: Interface> = <I as Interface>::Fwd;

/// Backward signals of an interface.
pub type Bwd<I: Interface> = <I as Interface>::Bwd;

impl Interface for () {
    type Bwd = ();
    type Fwd = ();
}

impl<I1: Interface, I2: Interface> Interface for (I1, I2) {
    type Bwd = (I1::Bwd, I2::Bwd);
    type Fwd = (I1::Fwd, I2::Fwd);
}

/// Valid-ready channel.
///
/// A transfer happens on a clock edge iff `valid` and `ready` are both asserted in that cycle.
/// The producer must hold the payload stable while `valid` is asserted and `ready` is not.
#[derive(Debug)]
pub struct VrChannel<V: Signal> {
    _marker: PhantomData<V>,
}

impl<V: Signal> Interface for VrChannel<V> {
    type Bwd = Ready;
    type Fwd = Valid<V>;
}

/// Unidirectional channel.
#[derive(Debug)]
pub struct UniChannel<V: Signal> {
    _marker: PhantomData<V>,
}

impl<V: Signal> Interface for UniChannel<V> {
    type Bwd = ();
    type Fwd = V;
}

/// Valid/ready channel's forward signals.
#[derive(Debug, Clone, Default, PartialEq, Signal)]
pub struct Valid<V: Signal> {
    /// Inner data
    pub inner: V,

    /// Valid bit
    pub valid: bool,
}

impl<V: Signal> Valid<V> {
    /// Creates a new value.
    pub fn new(valid: bool, inner: V) -> Self { Self { inner, valid } }

    /// Creates an invalid value.
    pub fn invalid() -> Self { Self::new(false, V::default()) }

    /// Creates a valid value.
    pub fn valid(inner: V) -> Self { Self::new(true, inner) }

    /// Returns the inner value if valid.
    pub fn into_option(self) -> Option<V> {
        if self.valid {
            Some(self.inner)
        } else {
            None
        }
    }
}

impl<V: Signal> From<Option<V>> for Valid<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(inner) => Self::valid(inner),
            None => Self::invalid(),
        }
    }
}

/// Ready signal.
#[derive(Debug, Clone, Default, PartialEq, Signal)]
pub struct Ready {
    /// Ready bit
    pub ready: bool,
}

impl Ready {
    /// Creates a new value.
    pub fn new(ready: bool) -> Self { Self { ready } }
}

/// Returns whether a transfer happens in this cycle.
pub fn fire<V: Signal>(fwd: &Valid<V>, bwd: &Ready) -> bool { fwd.valid && bwd.ready }
