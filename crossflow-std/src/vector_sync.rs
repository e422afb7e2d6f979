//! Vector synchronizer.
//!
//! A multi-bit value cannot cross through per-bit chains: the bits may be captured in different
//! destination cycles and tear. Instead the source parks the value on a launch register that
//! stays stable, and a single request toggle crosses through a chain. The destination captures the
//! parked value once it sees the toggle, which by then has settled, and toggles an acknowledge
//! back. Only one value is in flight at a time.

use tracing::{debug, trace};

use crate::*;

/// Toggle request/acknowledge synchronizer of a multi-bit value.
///
/// The destination output is a one-cycle pulse per transferred value.
#[derive(Debug)]
pub struct VectorSync<V: Signal> {
    // Source domain.
    req_toggle: bool,
    req: Launch<bool>,
    data: Launch<V>,
    ack_sync: BitSync,
    src_resolver: Resolver,

    // Destination domain.
    ack_toggle: bool,
    ack: Launch<bool>,
    req_sync: BitSync,
    out: Valid<V>,
    dst_resolver: Resolver,

    bridge: ResetBridge,
}

impl<V: Signal> VectorSync<V> {
    /// Creates an idle synchronizer.
    pub fn new(config: SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(?config, width = V::WIDTH, "vector synchronizer created");
        Ok(Self {
            req_toggle: false,
            req: Launch::new(false),
            data: Launch::new(V::default()),
            ack_sync: BitSync::new(config.stages)?,
            src_resolver: Resolver::new(config.metastability, 3),
            ack_toggle: false,
            ack: Launch::new(false),
            req_sync: BitSync::new(config.stages)?,
            out: Valid::invalid(),
            dst_resolver: Resolver::new(config.metastability, 4),
            bridge: ResetBridge::new(&config)?,
        })
    }

    /// Returns whether a value is in flight.
    pub fn busy(&self) -> bool { self.req_toggle != *self.ack_sync.output() }

    /// Returns the reset bridge.
    pub fn bridge(&self) -> &ResetBridge { &self.bridge }

    fn src_ready(&self) -> bool { !self.busy() && !self.bridge.held(Domain::Src) }

    fn clear(&mut self, domain: Domain) {
        match domain {
            Domain::Src => {
                self.req_toggle = false;
                self.ack_sync.clear();
            }
            Domain::Dst => {
                self.ack_toggle = false;
                self.req_sync.clear();
                self.out = Valid::invalid();
            }
        }
    }
}

impl<V: Signal> ClockCrossing for VectorSync<V> {
    type I = VrChannel<V>;
    type O = UniChannel<Valid<V>>;

    fn get_module_name(&self) -> &str { "vector_sync" }

    fn comb_src(&self, _: Valid<V>) -> Ready { Ready::new(self.src_ready()) }

    fn comb_dst(&self, _: ()) -> Valid<V> {
        if self.bridge.held(Domain::Dst) {
            Valid::invalid()
        } else {
            self.out.clone()
        }
    }

    fn tick_src(&mut self, i_fwd: Valid<V>, now: Time) {
        let fire = i_fwd.valid && self.src_ready();
        if self.bridge.edge(Domain::Src, now) {
            self.clear(Domain::Src);
        } else {
            if fire {
                self.data.set(i_fwd.inner, now);
                self.req_toggle = !self.req_toggle;
            }
            self.ack_sync.capture(&self.ack, now, &mut self.src_resolver);
        }
        if !self.bridge.frozen(Domain::Src) {
            self.req.set(self.req_toggle, now);
        }
    }

    fn tick_dst(&mut self, _: (), now: Time) {
        let held = self.bridge.held(Domain::Dst);
        if self.bridge.edge(Domain::Dst, now) {
            self.clear(Domain::Dst);
        } else {
            let req = *self.req_sync.output();
            if !held && req != self.ack_toggle {
                let value = self.data.sample(now, &mut self.dst_resolver);
                trace!(now, ?value, "vector captured");
                self.out = Valid::valid(value);
                self.ack_toggle = req;
            } else {
                self.out = Valid::invalid();
            }
            self.req_sync.capture(&self.req, now, &mut self.dst_resolver);
        }
        if !self.bridge.frozen(Domain::Dst) {
            self.ack.set(self.ack_toggle, now);
        }
    }

    fn assert_reset(&mut self, domain: Domain, kind: ResetKind, now: Time) {
        if self.bridge.assert_reset(domain, kind, now) {
            self.clear(domain);
        }
    }

    fn release_reset(&mut self, domain: Domain) { self.bridge.release_reset(domain); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_pulses_once_after_round_trip() {
        let mut sync = VectorSync::<u16>::new(SyncConfig::default()).unwrap();
        assert!(sync.comb_src(Valid::valid(0xBEEF)).ready);
        sync.tick_src(Valid::valid(0xBEEF), 0);
        assert!(!sync.comb_src(Valid::valid(1)).ready);

        sync.tick_dst((), 10);
        sync.tick_dst((), 20);
        assert!(!sync.comb_dst(()).valid);
        sync.tick_dst((), 30);
        assert_eq!(sync.comb_dst(()), Valid::valid(0xBEEF));
        sync.tick_dst((), 40);
        assert!(!sync.comb_dst(()).valid);

        // The acknowledge needs two source edges to come back.
        sync.tick_src(Valid::invalid(), 45);
        assert!(!sync.comb_src(Valid::invalid()).ready);
        sync.tick_src(Valid::invalid(), 50);
        assert!(sync.comb_src(Valid::invalid()).ready);
    }
}
