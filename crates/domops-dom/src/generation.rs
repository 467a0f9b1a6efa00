//! Tree generation counter
//!
//! Incremented on every mutation that can change layout or style. Layout
//! results are valid for exactly one generation.

/// Generation counter - incremented on every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Initial generation (never mutated)
    pub const INITIAL: Self = Generation(0);

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next generation
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}
