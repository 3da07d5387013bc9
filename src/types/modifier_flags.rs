//! Constants for movement modifier trigger flags
//!
//! Each flag corresponds to a boolean keyvalue on a modifier trigger, read by
//! the mapping API when the trigger spawns.

pub const DISABLE_PAUSE: u32 = 0x0001; // timer_modifier_disable_pause
pub const DISABLE_CHECKPOINTS: u32 = 0x0002; // timer_modifier_disable_checkpoints
pub const DISABLE_TELEPORTS: u32 = 0x0004; // timer_modifier_disable_teleports
pub const DISABLE_JUMPSTATS: u32 = 0x0008; // timer_modifier_disable_jumpstats
pub const ENABLE_SLIDE: u32 = 0x0010; // timer_modifier_enable_slide

/// Keyvalue name paired with the flag it sets.
pub const KEYVALUES: &[(&str, u32)] = &[
    ("timer_modifier_disable_pause", DISABLE_PAUSE),
    ("timer_modifier_disable_checkpoints", DISABLE_CHECKPOINTS),
    ("timer_modifier_disable_teleports", DISABLE_TELEPORTS),
    ("timer_modifier_disable_jumpstats", DISABLE_JUMPSTATS),
    ("timer_modifier_enable_slide", ENABLE_SLIDE),
];
