//! Utilities for valid-ready channels.

use crossflow_macro::Signal;

use crate::*;

/// Payload of a streaming transfer.
///
/// `lane_mask` marks the valid byte lanes of `payload` and `meta` carries sideband information
/// (e.g. a last-beat flag or a destination id). All three travel together and are never split.
#[derive(Debug, Clone, Default, PartialEq, Signal)]
pub struct Beat<D: Signal, K: Signal, U: Signal> {
    /// Payload
    pub payload: D,

    /// Lane mask
    pub lane_mask: K,

    /// Sideband metadata
    pub meta: U,
}

impl<D: Signal, K: Signal, U: Signal> Beat<D, K, U> {
    /// Creates a new beat.
    pub fn new(payload: D, lane_mask: K, meta: U) -> Self { Self { payload, lane_mask, meta } }
}

/// Valid-ready channel carrying [`Beat`]s.
pub type TransferChannel<D: Signal, K: Signal, U: Signal> = VrChannel<Beat<D, K, U>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat_fields_are_concatenated_in_order() {
        type B = Beat<Bits<8>, Bits<1>, bool>;
        assert_eq!(B::WIDTH, 10);

        let beat = B::new(Bits::from(0xA5u128), Bits::from(1u128), true);
        let bits = beat.clone().transl();
        assert_eq!(&bits[..8], &Bits::<8>::from(0xA5u128).transl()[..]);
        assert!(bits[8]);
        assert!(bits[9]);
        assert_eq!(B::untransl(&bits), beat);
    }

    fn registered() -> impl Module<I = TransferChannel<Bits<8>, Bits<1>, bool>, O = TransferChannel<Bits<8>, Bits<1>, bool>> {
        register_slice_fwd::<Beat<Bits<8>, Bits<1>, bool>>()
    }

    #[test]
    fn beat_moves_whole_through_a_register() {
        let beat = Beat::new(Bits::from(0x3Cu128), Bits::from(1u128), false);
        let mut slice = registered();
        assert!(slice.comb(Valid::valid(beat.clone()), Ready::new(false)).1.ready);
        slice.tick(Valid::valid(beat.clone()), Ready::new(false));
        let (out, ready) = slice.comb(Valid::invalid(), Ready::new(false));
        assert_eq!(out, Valid::valid(beat));
        assert!(!ready.ready);
    }
}
