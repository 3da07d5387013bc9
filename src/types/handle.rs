//! Entity and player identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation-tagged reference to a host entity.
///
/// The host reuses entity indices after an entity is destroyed and bumps the
/// serial when it does, so two handles with the same index but different
/// serials never name the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct EntityHandle {
    /// Slot in the host entity list
    pub index: u32,
    /// Reuse counter for the slot
    pub serial: u32,
}

impl EntityHandle {
    pub const fn new(index: u32, serial: u32) -> Self {
        Self { index, serial }
    }

    /// Returns true if both handles point at the same slot, regardless of serial.
    pub fn same_slot(&self, other: &EntityHandle) -> bool {
        self.index == other.index
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.index, self.serial)
    }
}

/// Connected player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PlayerSlot(pub u32);

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
