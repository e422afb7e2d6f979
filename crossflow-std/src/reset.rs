//! Reset bridge between two clock domains.
//!
//! A reset of one domain must empty both. Each domain owns a [`ResetPort`] that launches a
//! request (`req`, "I am resetting") and an acknowledge (`ack`, "I cleared on your request") and
//! synchronizes the peer's pair. The handshake of a reset in domain A:
//!
//! 1. A clears and raises `req`. While `req` is up and the peer's `ack` is not seen yet, A keeps its
//!    outgoing pointers frozen so that B keeps a consistent view.
//! 2. B sees A's `req`, clears and raises `ack`; B keeps clearing while it sees the request.
//! 3. A sees `ack`: its outgoing pointers may now show the cleared state. Once A's reset is
//!    released, A drops `req`.
//! 4. B sees `req` drop and drops `ack`. A resumes once it no longer sees `ack`.
//!
//! Both domains may reset at the same time; each then acknowledges the other.

use tracing::debug;

use crate::*;

/// One domain's side of a [`ResetBridge`].
#[derive(Debug, Clone)]
pub struct ResetPort {
    /// Local reset input.
    asserted: bool,
    req: Launch<bool>,
    ack: Launch<bool>,
    peer_req: BitSync,
    peer_ack: BitSync,
    resolver: Resolver,
}

impl ResetPort {
    fn new(config: &SyncConfig, salt: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            asserted: false,
            req: Launch::new(false),
            ack: Launch::new(false),
            peer_req: BitSync::new(config.stages)?,
            peer_ack: BitSync::new(config.stages)?,
            resolver: Resolver::new(config.metastability, salt),
        })
    }

    /// Returns whether the domain may not transfer.
    pub fn held(&self) -> bool {
        self.asserted || *self.req.value() || *self.ack.value() || *self.peer_ack.output()
    }

    /// Returns whether the domain's outgoing pointers must keep their pre-reset value.
    pub fn frozen(&self) -> bool { *self.req.value() && !*self.peer_ack.output() }
}

/// Reset handshake between the source and destination domains.
#[derive(Debug, Clone)]
pub struct ResetBridge {
    src: ResetPort,
    dst: ResetPort,
}

impl ResetBridge {
    /// Creates an idle bridge.
    pub fn new(config: &SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { src: ResetPort::new(config, 0x5253)?, dst: ResetPort::new(config, 0x5244)? })
    }

    /// Returns the port of `domain`.
    pub fn port(&self, domain: Domain) -> &ResetPort {
        match domain {
            Domain::Src => &self.src,
            Domain::Dst => &self.dst,
        }
    }

    fn split(&mut self, domain: Domain) -> (&mut ResetPort, &ResetPort) {
        match domain {
            Domain::Src => (&mut self.src, &self.dst),
            Domain::Dst => (&mut self.dst, &self.src),
        }
    }

    /// Returns whether `domain` may not transfer.
    pub fn held(&self, domain: Domain) -> bool { self.port(domain).held() }

    /// Returns whether `domain` must keep its outgoing pointers.
    pub fn frozen(&self, domain: Domain) -> bool { self.port(domain).frozen() }

    /// Returns whether neither domain is held.
    pub fn is_idle(&self) -> bool { !self.src.held() && !self.dst.held() }

    /// Asserts the reset of `domain` at `now`. Returns whether the domain clears immediately.
    pub fn assert_reset(&mut self, domain: Domain, kind: ResetKind, now: Time) -> bool {
        debug!(?domain, ?kind, now, "reset asserted");
        let (port, _) = self.split(domain);
        port.asserted = true;
        match kind {
            ResetKind::Sync => false,
            ResetKind::Async => {
                port.req.set(true, now);
                true
            }
        }
    }

    /// Releases the reset of `domain`.
    pub fn release_reset(&mut self, domain: Domain) {
        debug!(?domain, "reset released");
        let (port, _) = self.split(domain);
        port.asserted = false;
    }

    /// Advances the handshake of `domain` at its edge `now`. Returns whether the domain clears.
    pub fn edge(&mut self, domain: Domain, now: Time) -> bool {
        let (port, peer) = self.split(domain);
        let peer_req = *port.peer_req.output();
        let peer_ack = *port.peer_ack.output();
        let was_held = port.held();

        let mut clear = false;
        if port.asserted {
            clear = true;
            port.req.set(true, now);
        } else if *port.req.value() && peer_ack {
            port.req.set(false, now);
        }
        if peer_req {
            clear = true;
        }
        port.ack.set(peer_req, now);

        port.peer_req.capture(&peer.req, now, &mut port.resolver);
        port.peer_ack.capture(&peer.ack, now, &mut port.resolver);

        if was_held && !port.held() {
            debug!(?domain, now, "reset handshake completed");
        }
        clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Alternates edges of both domains, 10 apart, starting at `start`.
    fn run(bridge: &mut ResetBridge, start: Time, pairs: u64) -> Vec<(bool, bool)> {
        (0..pairs)
            .map(|i| {
                let src = bridge.edge(Domain::Src, start + i * 20);
                let dst = bridge.edge(Domain::Dst, start + i * 20 + 10);
                (src, dst)
            })
            .collect()
    }

    #[test]
    fn one_sided_reset_clears_both_domains() {
        let mut bridge = ResetBridge::new(&SyncConfig::default()).unwrap();
        assert!(bridge.is_idle());

        assert!(!bridge.assert_reset(Domain::Src, ResetKind::Sync, 5));
        assert!(bridge.held(Domain::Src));
        assert!(!bridge.held(Domain::Dst));

        let clears = run(&mut bridge, 20, 5);
        assert!(clears.iter().all(|(src, _)| *src));
        assert!(clears.iter().any(|(_, dst)| *dst));
        assert!(bridge.held(Domain::Dst));
        assert!(!bridge.frozen(Domain::Src));

        bridge.release_reset(Domain::Src);
        let _ = run(&mut bridge, 120, 12);
        assert!(bridge.is_idle());
    }

    #[test]
    fn async_reset_clears_immediately_and_freezes() {
        let mut bridge = ResetBridge::new(&SyncConfig::default()).unwrap();
        assert!(bridge.assert_reset(Domain::Dst, ResetKind::Async, 3));
        assert!(bridge.frozen(Domain::Dst));
        bridge.release_reset(Domain::Dst);

        let _ = run(&mut bridge, 10, 16);
        assert!(bridge.is_idle());
        assert!(!bridge.frozen(Domain::Dst));
    }

    #[test]
    fn simultaneous_resets_complete() {
        let mut bridge = ResetBridge::new(&SyncConfig::default().with_stages(3)).unwrap();
        let _ = bridge.assert_reset(Domain::Src, ResetKind::Sync, 0);
        let _ = bridge.assert_reset(Domain::Dst, ResetKind::Async, 0);
        let _ = run(&mut bridge, 20, 6);
        bridge.release_reset(Domain::Src);
        bridge.release_reset(Domain::Dst);
        let _ = run(&mut bridge, 200, 20);
        assert!(bridge.is_idle());
    }
}
