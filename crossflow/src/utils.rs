//! Utilities.

/// Returns ceiling log2.
pub const fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

/// Returns the width of a FIFO pointer: enough bits to index `depth` entries, plus the wrap bit.
pub const fn ptr_width(depth: usize) -> usize { clog2(depth) + 1 }

/// Percentage in `0..=100`, used for stall probabilities.
pub fn percent_to_prob(percent: u32) -> f64 { f64::from(percent.min(100)) / 100.0 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_width_has_wrap_bit() {
        assert_eq!(clog2(1), 0);
        assert_eq!(clog2(4), 2);
        assert_eq!(clog2(5), 3);
        assert_eq!(ptr_width(1), 1);
        assert_eq!(ptr_width(16), 5);
    }
}
