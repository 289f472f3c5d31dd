use core::fmt;
use core::num::NonZeroU32;

/// Stable handle of a device in the graph arena.
///
/// Stored as arena index + 1 in a `NonZeroU32`, so the optional peer on
/// every slot costs no more than the id itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based arena index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Arena position as `usize`.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

pub type DeviceId = Id;

/// Position of a slot within a device's inlet or outlet list.
pub type SlotIndex = usize;
