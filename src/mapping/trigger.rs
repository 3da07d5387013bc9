//! Typed trigger descriptors

use serde::{Deserialize, Serialize};

use crate::course::CourseId;
use crate::types::{EntityHandle, ModifierFlags, TriggerKind, ZoneKind};

/// Registry record for one spawned trigger volume.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDescriptor {
    pub handle: EntityHandle,
    pub kind: TriggerKind,
    pub payload: TriggerPayload,
}

impl TriggerDescriptor {
    pub fn zone(&self) -> Option<&ZoneInfo> {
        match &self.payload {
            TriggerPayload::Zone(zone) => Some(zone),
            _ => None,
        }
    }

    pub fn modifier_flags(&self) -> Option<ModifierFlags> {
        match self.payload {
            TriggerPayload::Modifier { flags } => Some(flags),
            _ => None,
        }
    }

    pub fn anti_bhop_time(&self) -> Option<f32> {
        match self.payload {
            TriggerPayload::AntiBhop { time } => Some(time),
            _ => None,
        }
    }

    pub fn teleport(&self) -> Option<&TeleportInfo> {
        match &self.payload {
            TriggerPayload::Teleport(info) => Some(info),
            _ => None,
        }
    }
}

/// Kind-specific trigger data. The variant always matches the descriptor kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerPayload {
    None,
    Modifier { flags: ModifierFlags },
    AntiBhop { time: f32 },
    Zone(ZoneInfo),
    Teleport(TeleportInfo),
}

/// Course association of a timer zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInfo {
    pub course: CourseId,
    pub kind: ZoneKind,
    /// 1-based for split, checkpoint and stage zones; 0 for start and end
    pub number: u32,
}

/// Destination of a teleport or bhop trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportInfo {
    /// Target entity name
    pub destination: String,
    /// Seconds the player must stay inside before teleporting
    pub delay: f32,
    pub use_dest_angles: bool,
    pub reset_speed: bool,
    pub reorient_player: bool,
    pub relative: bool,
}
