use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier for an electrical mode within its cavity.
///
/// The wrapped index is the mode's position in the cavity's mode sequence,
/// which is also its summation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeId(NonZeroU32);

impl ModeId {
    /// Create an id from a 0-based index by storing index+1.
    ///
    /// Returns `None` for `u32::MAX`, which has no nonzero successor.
    pub fn from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModeId({})", self.index())
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
