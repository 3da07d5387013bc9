//! Traits the host server implements for the timer
//!
//! The timer never reaches into engine state directly. Everything it reads or
//! changes about a player goes through [`Pawn`], everything it tells the
//! player goes through [`Feedback`], and entity liveness is checked through
//! [`EntityWorld`].

use crate::feedback::{Message, SoundCue};
use crate::types::{EntityHandle, MoveType, MovementSnapshot, PlayerSlot, TickStamp, Vec3};

/// Player pawn facade.
pub trait Pawn {
    fn is_alive(&self) -> bool;

    /// Bots never submit finished runs.
    fn is_bot(&self) -> bool;

    fn move_type(&self) -> MoveType;

    fn set_move_type(&mut self, move_type: MoveType);

    fn velocity(&self) -> Vec3;

    fn set_velocity(&mut self, velocity: Vec3);

    fn on_ground(&self) -> bool;

    /// Teleported by a checkpoint, trigger or command during this tick
    fn just_teleported(&self) -> bool;

    /// Left noclip recently enough that a start would be unfair
    fn just_left_noclip(&self) -> bool;

    /// Watching a replay or reviewing a performance
    fn in_perf_review(&self) -> bool;

    /// Landed during this tick
    fn just_landed(&self) -> bool;

    fn movement_snapshot(&self) -> MovementSnapshot;

    fn restore_movement(&mut self, snapshot: MovementSnapshot);

    /// Reapply the standard player collision group.
    fn reset_collision_group(&mut self);
}

/// Chat and sound output for one player.
pub trait Feedback {
    fn message(&mut self, player: PlayerSlot, message: Message);

    fn play_sound(&mut self, player: PlayerSlot, cue: SoundCue);
}

/// Host entity list.
pub trait EntityWorld {
    /// True if `handle` still names a live entity with the same serial.
    fn is_live(&self, handle: EntityHandle) -> bool;
}

/// Per-event host collaborators for one player.
pub struct Env<'a> {
    pub clock: TickStamp,
    pub pawn: &'a mut dyn Pawn,
    pub feedback: &'a mut dyn Feedback,
    /// Name of the movement mode the player is currently in
    pub mode_name: &'a str,
}

impl<'a> Env<'a> {
    pub fn new(
        clock: TickStamp,
        pawn: &'a mut dyn Pawn,
        feedback: &'a mut dyn Feedback,
        mode_name: &'a str,
    ) -> Self {
        Self { clock, pawn, feedback, mode_name }
    }
}

/// Feedback sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn message(&mut self, _player: PlayerSlot, _message: Message) {}

    fn play_sound(&mut self, _player: PlayerSlot, _cue: SoundCue) {}
}
