//! Movement types and player movement snapshots

use serde::{Deserialize, Serialize};

/// Host movement type of a player pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    /// Frozen in place, used while paused
    None,
    Walk,
    Ladder,
    Noclip,
    Observer,
    Fly,
}

/// Simple 3-component vector used for velocities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Length of the horizontal (x, y) component.
    pub fn horizontal_speed(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Movement service fields saved on pause and restored on resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementSnapshot {
    pub duck_amount: f32,
    pub duck_speed: f32,
    pub stamina: f32,
}
