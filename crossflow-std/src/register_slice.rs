//! Register slices for valid-ready channels.
//!
//! Reference: <https://chipressco.wpcomstaging.com/2019/03/16/valid-ready-protocol-and-register-slice/>

use crate::*;

/// Creates a forward register slice module.
///
/// The data path is registered. The input is ready when the slice is empty or its beat leaves in
/// the same cycle, so a full slice under a stalled output accepts nothing.
pub fn register_slice_fwd<V: Signal>() -> impl Module<I = VrChannel<V>, O = VrChannel<V>> {
    Fsm::<VrChannel<V>, VrChannel<V>, Valid<V>, _>::new("register_slice_fwd", Valid::invalid(), |fwd, bwd, s| {
        let is_occupied = s.valid;
        let remaining = is_occupied && !bwd.ready;

        let s_next = if fwd.valid && !remaining {
            fwd
        } else if bwd.ready {
            Valid::invalid()
        } else {
            s.clone()
        };

        (s, Ready::new(!remaining), s_next)
    })
}

/// Creates a backward register slice module.
///
/// The ready path is registered: the input ready is the emptiness of a skid register. While the
/// skid register is empty the data passes through combinationally; a beat accepted while the
/// output stalls is parked in the skid register and drained first.
pub fn register_slice_bwd<V: Signal>() -> impl Module<I = VrChannel<V>, O = VrChannel<V>> {
    Fsm::<VrChannel<V>, VrChannel<V>, Valid<V>, _>::new("register_slice_bwd", Valid::invalid(), |fwd, bwd, skid| {
        let ready = !skid.valid;
        let out = if skid.valid { skid.clone() } else { fwd.clone() };

        let skid_next = if skid.valid {
            if bwd.ready {
                Valid::invalid()
            } else {
                skid
            }
        } else if fwd.valid && !bwd.ready {
            fwd
        } else {
            Valid::invalid()
        };

        (out, Ready::new(ready), skid_next)
    })
}
