//! Bit-representable values.

use std::fmt;

use itertools::Itertools;

/// Bit-representable values.
///
/// A signal is what travels on a wire in one cycle: a payload, a valid bit, a pointer. The bit
/// representation is what a capture flop sees, so the metastability model (see
/// [`Resolver`](crate::Resolver)) works on `transl()` / `untransl()` rather than on the typed
/// value.
pub trait Signal: 'static + fmt::Debug + Clone + Default + PartialEq {
    /// Signal's bit width.
    ///
    /// # Note
    ///
    /// `Self::WIDTH` and `self.transl().len()` should be equal.
    const WIDTH: usize;

    /// Returns the bits of the value, least significant first.
    fn transl(self) -> Vec<bool>;

    /// Reconstructs a value from its bits, least significant first.
    ///
    /// # Panics
    ///
    /// Panics if `bits.len() != Self::WIDTH`.
    fn untransl(bits: &[bool]) -> Self;
}

impl Signal for () {
    const WIDTH: usize = 0;

    fn transl(self) -> Vec<bool> { vec![] }

    fn untransl(bits: &[bool]) -> Self { assert!(bits.is_empty()) }
}

impl Signal for bool {
    const WIDTH: usize = 1;

    fn transl(self) -> Vec<bool> { vec![self] }

    fn untransl(bits: &[bool]) -> Self {
        assert_eq!(bits.len(), 1);
        bits[0]
    }
}

macro_rules! impl_signal {
    ($typ:ty) => {
        impl Signal for $typ {
            const WIDTH: usize = <$typ>::BITS as usize;

            fn transl(self) -> Vec<bool> { (0..Self::WIDTH).map(|i| (self >> i) & 1 != 0).collect::<Vec<_>>() }

            fn untransl(bits: &[bool]) -> Self {
                assert_eq!(bits.len(), Self::WIDTH);
                bits.iter().enumerate().fold(0, |acc, (i, bit)| acc | (<$typ>::from(*bit) << i))
            }
        }
    };
}

impl_signal!(u8);
impl_signal!(u16);
impl_signal!(u32);
impl_signal!(u64);
impl_signal!(u128);
impl_signal!(usize);

#[allow(missing_docs)]
#[macro_export]
macro_rules! impl_signal_tuple {
    ($($a:ident $i:tt)+) => {
        impl<$($a: Signal,)+> Signal for ($($a,)+) {
            const WIDTH: usize = 0 $(+ <$a as Signal>::WIDTH)+;

            fn transl(self) -> Vec<bool> {
                let mut bits = Vec::with_capacity(Self::WIDTH);
                $(bits.extend(self.$i.transl());)+
                bits
            }

            #[allow(unused_assignments)]
            fn untransl(bits: &[bool]) -> Self {
                assert_eq!(bits.len(), Self::WIDTH);
                let mut offset = 0;
                ($({
                    let width = <$a as Signal>::WIDTH;
                    let value = <$a as Signal>::untransl(&bits[offset..offset + width]);
                    offset += width;
                    value
                },)+)
            }
        }
    };
}

impl_signal_tuple! { V1 0 }
impl_signal_tuple! { V1 0 V2 1 }
impl_signal_tuple! { V1 0 V2 1 V3 2 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 V6 5 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 V6 5 V7 6 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 V6 5 V7 6 V8 7 }

/// Bits type of width `N`.
///
/// Used for payload, lane mask and sideband fields whose width is not a machine word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bits<const N: usize> {
    inner: [bool; N],
}

impl<const N: usize> Bits<N> {
    /// Creates new bits.
    pub fn new(inner: [bool; N]) -> Self { Self { inner } }

    /// Returns the bit at `index`.
    pub fn get(&self, index: usize) -> bool { self.inner[index] }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize { self.inner.iter().filter(|bit| **bit).count() }

    /// Returns the low 128 bits as an integer.
    pub fn to_u128(&self) -> u128 {
        self.inner.iter().take(128).enumerate().fold(0, |acc, (i, bit)| acc | (u128::from(*bit) << i))
    }
}

impl<const N: usize> Default for Bits<N> {
    fn default() -> Self { Self { inner: [false; N] } }
}

impl<const N: usize> From<[bool; N]> for Bits<N> {
    fn from(inner: [bool; N]) -> Self { Self::new(inner) }
}

impl<const N: usize> From<u128> for Bits<N> {
    fn from(value: u128) -> Self {
        let mut inner = [false; N];
        for (i, bit) in inner.iter_mut().enumerate().take(128) {
            *bit = (value >> i) & 1 != 0;
        }
        Self { inner }
    }
}

impl<const N: usize> fmt::Debug for Bits<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'b{}", N, self.inner.iter().rev().map(|bit| if *bit { '1' } else { '0' }).join(""))
    }
}

impl<const N: usize> Signal for Bits<N> {
    const WIDTH: usize = N;

    fn transl(self) -> Vec<bool> { self.inner.to_vec() }

    fn untransl(bits: &[bool]) -> Self {
        assert_eq!(bits.len(), N);
        let mut inner = [false; N];
        inner.copy_from_slice(bits);
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bits_are_lsb_first() {
        let bits = 0b1011u8.transl();
        assert_eq!(&bits[..4], &[true, true, false, true]);
        assert!(bits[4..].iter().all(|bit| !bit));
        assert_eq!(u8::untransl(&bits), 0b1011);
    }

    #[test]
    fn tuple_concatenates_fields() {
        let value = (true, 0x5au8, Bits::<3>::from(0b110));
        assert_eq!(<(bool, u8, Bits<3>)>::WIDTH, 12);

        let bits = value.clone().transl();
        assert!(bits[0]);
        assert_eq!(u8::untransl(&bits[1..9]), 0x5a);
        assert_eq!(<(bool, u8, Bits<3>)>::untransl(&bits), value);
    }

    #[test]
    fn bits_debug_is_msb_first() {
        assert_eq!(format!("{:?}", Bits::<4>::from(0b0011)), "4'b0011");
        assert_eq!(Bits::<70>::from(u128::MAX).count_ones(), 70);
        assert_eq!(Bits::<4>::new([true, false, true, true]).to_u128(), 0b1101);
        assert_eq!(Bits::<8>::from(0x1A5u128).to_u128(), 0xA5);
    }
}
