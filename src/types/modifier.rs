//! Flag set carried by movement modifier triggers

use serde::{Deserialize, Serialize};

use super::modifier_flags;

/// Bit set of modifier behaviours a trigger applies while touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ModifierFlags(pub u32);

impl ModifierFlags {
    /// Create a flag set from a raw value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Check if a specific flag is set using a bitmask.
    pub fn has_flag(&self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Set or clear a flag.
    pub fn set(&mut self, flag: u32, enabled: bool) {
        if enabled {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    /// Get the raw u32 value.
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn disables_pause(&self) -> bool {
        self.has_flag(modifier_flags::DISABLE_PAUSE)
    }

    pub fn disables_checkpoints(&self) -> bool {
        self.has_flag(modifier_flags::DISABLE_CHECKPOINTS)
    }
}
