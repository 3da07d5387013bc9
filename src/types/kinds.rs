//! Trigger and zone classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a mapping API trigger volume.
///
/// Discriminants match the `timer_trigger_type` keyvalue written by the map
/// editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Disabled = 0,
    Modifier = 1,
    ResetCheckpoints = 2,
    SingleBhopReset = 3,
    AntiBhop = 4,
    ZoneStart = 5,
    ZoneEnd = 6,
    ZoneSplit = 7,
    ZoneCheckpoint = 8,
    ZoneStage = 9,
    Teleport = 10,
    MultiBhop = 11,
    SingleBhop = 12,
    SequentialBhop = 13,
}

impl TriggerKind {
    /// Decode the raw `timer_trigger_type` value.
    pub fn from_raw(value: i64) -> Option<Self> {
        let kind = match value {
            0 => TriggerKind::Disabled,
            1 => TriggerKind::Modifier,
            2 => TriggerKind::ResetCheckpoints,
            3 => TriggerKind::SingleBhopReset,
            4 => TriggerKind::AntiBhop,
            5 => TriggerKind::ZoneStart,
            6 => TriggerKind::ZoneEnd,
            7 => TriggerKind::ZoneSplit,
            8 => TriggerKind::ZoneCheckpoint,
            9 => TriggerKind::ZoneStage,
            10 => TriggerKind::Teleport,
            11 => TriggerKind::MultiBhop,
            12 => TriggerKind::SingleBhop,
            13 => TriggerKind::SequentialBhop,
            _ => return None,
        };
        Some(kind)
    }

    /// Timer zone role, if this is one of the five zone kinds.
    pub fn zone_kind(self) -> Option<ZoneKind> {
        match self {
            TriggerKind::ZoneStart => Some(ZoneKind::Start),
            TriggerKind::ZoneEnd => Some(ZoneKind::End),
            TriggerKind::ZoneSplit => Some(ZoneKind::Split),
            TriggerKind::ZoneCheckpoint => Some(ZoneKind::Checkpoint),
            TriggerKind::ZoneStage => Some(ZoneKind::Stage),
            _ => None,
        }
    }

    pub fn is_zone(self) -> bool {
        self.zone_kind().is_some()
    }

    /// Kinds whose payload is a teleport destination.
    pub fn is_teleport(self) -> bool {
        matches!(
            self,
            TriggerKind::Teleport | TriggerKind::SingleBhop | TriggerKind::SequentialBhop
        )
    }
}

/// Timer zone role within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Start,
    End,
    Split,
    Checkpoint,
    Stage,
}

impl ZoneKind {
    /// Whether zones of this kind carry a 1-based number.
    pub fn is_numbered(self) -> bool {
        matches!(self, ZoneKind::Split | ZoneKind::Checkpoint | ZoneKind::Stage)
    }

    /// Keyvalue holding the zone number, for numbered kinds.
    pub fn number_key(self) -> Option<&'static str> {
        match self {
            ZoneKind::Split => Some("timer_zone_split_number"),
            ZoneKind::Checkpoint => Some("timer_zone_checkpoint_number"),
            ZoneKind::Stage => Some("timer_zone_stage_number"),
            ZoneKind::Start | ZoneKind::End => None,
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZoneKind::Start => "start",
            ZoneKind::End => "end",
            ZoneKind::Split => "split",
            ZoneKind::Checkpoint => "checkpoint",
            ZoneKind::Stage => "stage",
        };
        f.write_str(name)
    }
}
