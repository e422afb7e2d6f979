//! Reflected binary (gray) code.
//!
//! The gray code of a power-of-two counter changes in exactly one bit per increment, including
//! the wrap-around.

/// Converts a binary number to reflected binary (gray) code.
pub const fn bin_to_gray(bin: usize) -> usize { bin ^ (bin >> 1) }

/// Converts a gray code back to binary.
pub const fn gray_to_bin(gray: usize) -> usize {
    let mut bin = gray;
    let mut shift = 1;
    while shift < usize::BITS {
        bin ^= bin >> shift;
        shift <<= 1;
    }
    bin
}

/// Pointer counting modulo `modulus`, with a gray-coded view for crossing clock domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayCounter {
    modulus: usize,
    bin: usize,
}

impl GrayCounter {
    /// Creates a counter at zero.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is not a power of two, since the wrap-around would change more than one
    /// bit of the gray code.
    pub fn new(modulus: usize) -> Self {
        assert!(modulus.is_power_of_two(), "gray counter modulus {modulus} is not a power of two");
        Self { modulus, bin: 0 }
    }

    /// Returns the modulus.
    pub fn modulus(&self) -> usize { self.modulus }

    /// Returns the binary value.
    pub fn value(&self) -> usize { self.bin }

    /// Returns the gray code of the value.
    pub fn gray(&self) -> usize { bin_to_gray(self.bin) }

    /// Increments the counter, wrapping at the modulus.
    pub fn incr(&mut self) { self.bin = (self.bin + 1) % self.modulus; }

    /// Clears the counter.
    pub fn clear(&mut self) { self.bin = 0; }
}
