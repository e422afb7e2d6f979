//! Launch registers and capture-side metastability.
//!
//! A signal leaving its clock domain is driven by a launch register. The register remembers its
//! previous value and when it last changed, so a capture flop in another domain can tell whether
//! it sampled a settled value or a transition.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::*;

/// Register whose output crosses into another clock domain.
///
/// Only the owning domain calls [`Launch::set`]; other domains only [`Launch::sample`] it.
#[derive(Debug, Clone)]
pub struct Launch<V: Signal> {
    value: V,
    prev: V,
    changed_at: Option<Time>,
}

impl<V: Signal> Launch<V> {
    /// Creates a settled register.
    pub fn new(value: V) -> Self { Self { prev: value.clone(), value, changed_at: None } }

    /// Returns the value as seen by the owning domain.
    pub fn value(&self) -> &V { &self.value }

    /// Updates the register at the owning domain's edge `now`.
    pub fn set(&mut self, value: V, now: Time) {
        if value != self.value {
            self.prev = std::mem::replace(&mut self.value, value);
            self.changed_at = Some(now);
        }
    }

    /// Forces the register to a settled value.
    pub fn force(&mut self, value: V) {
        self.prev = value.clone();
        self.value = value;
        self.changed_at = None;
    }

    /// Samples the register from a foreign capture edge at `now`.
    ///
    /// A change stamped at `now` has not propagated yet, so the previous value is seen. A change
    /// inside the resolver's aperture is resolved bit by bit.
    pub fn sample(&self, now: Time, resolver: &mut Resolver) -> V {
        match self.changed_at {
            None => self.value.clone(),
            Some(at) if at >= now => self.prev.clone(),
            Some(at) => {
                if now - at < resolver.aperture() {
                    resolver.resolve(&self.prev, &self.value)
                } else {
                    self.value.clone()
                }
            }
        }
    }
}

/// Resolves metastable samples of a capture domain.
#[derive(Debug, Clone)]
pub struct Resolver {
    aperture: Time,
    rng: ChaCha8Rng,
    resolved: u64,
}

impl Resolver {
    /// Creates a resolver. `salt` distinguishes the capture domains sharing one configuration.
    pub fn new(metastability: Metastability, salt: u64) -> Self {
        let seed = match metastability {
            Metastability::Ideal => 0,
            Metastability::Random { seed, .. } => seed,
        };
        Self {
            aperture: metastability.aperture(),
            rng: ChaCha8Rng::seed_from_u64(seed ^ salt.rotate_left(32)),
            resolved: 0,
        }
    }

    /// Returns the metastable window.
    pub fn aperture(&self) -> Time { self.aperture }

    /// Returns the number of metastable samples resolved so far.
    pub fn resolved(&self) -> u64 { self.resolved }

    /// Resolves every bit that differs between `old` and `new` independently.
    pub fn resolve<V: Signal>(&mut self, old: &V, new: &V) -> V {
        self.resolved += 1;
        let bits = old
            .clone()
            .transl()
            .into_iter()
            .zip(new.clone().transl())
            .map(|(old, new)| if old == new || self.rng.gen_bool(0.5) { new } else { old })
            .collect::<Vec<_>>();
        V::untransl(&bits)
    }
}
