//! Shift registers used to track recent branch outcomes.

use bitvec::prelude::*;
use crate::branch::Outcome;

/// A fixed-width history register.
///
/// Bit 0 holds the newest outcome. Shifting moves every bit towards the
/// most-significant end, and bits pushed beyond the width of the register
/// are discarded, so the value can never exceed `(1 << len) - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
}

// NOTE: This *reverses* all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0 && len <= usize::BITS as usize);
        Self {
            data: bitvec![usize, Lsb0; 0; len],
        }
    }

    /// Return the contents of the register as an integer.
    pub fn value(&self) -> usize { self.data.load::<usize>() }

    /// Shift the register by 'n' bits.
    /// The bottom 'n' bits become zero, and the top 'n' bits are discarded.
    pub fn shift_by(&mut self, n: usize) {
        self.data.shift_end(n);
    }

    /// Shift in the most recent outcome.
    pub fn push(&mut self, outcome: Outcome) {
        self.shift_by(1);
        self.data.set(0, outcome.into());
    }

    /// Clear every bit in the register.
    pub fn clear(&mut self) {
        self.data.fill(false);
    }
}
