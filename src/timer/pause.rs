//! Pause and resume
//!
//! Pausing freezes the pawn (move type `None`, zero velocity) and stops the
//! run clock. Cooldowns on both directions keep a paused run from being used
//! to stall mid-jump or reset movement state for free.

use tracing::{debug, info};

use super::{PlayerTimer, TimerServices};
use crate::TimerConfig;
use crate::feedback::{Message, SoundCue};
use crate::host::Env;
use crate::types::{MoveType, MovementSnapshot, Vec3};

/// Pause sub-state of a [`PlayerTimer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct PauseState {
    pub(super) paused: bool,
    on_ladder: bool,
    saved: Option<MovementSnapshot>,
    has_paused_in_run: bool,
    has_resumed_in_run: bool,
    last_pause: Option<f64>,
    last_resume: Option<f64>,
    /// Active "disable pause" modifier volumes
    blockers: u32,
}

impl PauseState {
    /// Forget the previous run's pause history.
    pub(super) fn start_run(&mut self) {
        self.has_paused_in_run = false;
        self.has_resumed_in_run = false;
        self.last_pause = None;
        self.last_resume = None;
    }
}

impl PlayerTimer {
    pub fn pause_blockers(&self) -> u32 {
        self.pause.blockers
    }

    pub fn has_paused_in_run(&self) -> bool {
        self.pause.has_paused_in_run
    }

    pub fn has_resumed_in_run(&self) -> bool {
        self.pause.has_resumed_in_run
    }

    /// Player entered a volume that disables pausing.
    pub fn add_pause_blocker(&mut self) {
        self.pause.blockers += 1;
    }

    pub fn remove_pause_blocker(&mut self) {
        self.pause.blockers = self.pause.blockers.saturating_sub(1);
    }

    pub fn can_pause(&self, env: &mut Env<'_>, config: &TimerConfig, show_error: bool) -> bool {
        if self.pause.paused {
            return self.refuse(env, show_error, Message::AlreadyPaused);
        }
        if self.pause.blockers > 0 {
            if show_error {
                env.feedback.message(self.slot, Message::PauseDisabled);
            }
            return false;
        }

        if self.run.running {
            if self.pause.has_resumed_in_run && env.clock.within(self.pause.last_resume, config.pause_cooldown) {
                return self.refuse(env, show_error, Message::CantPauseJustResumed);
            }
            let velocity = env.pawn.velocity();
            if !env.pawn.on_ground() && (velocity.horizontal_speed() != 0.0 || velocity.z != 0.0) {
                return self.refuse(env, show_error, Message::CantPauseMidair);
            }
        }
        true
    }

    pub fn pause(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>) -> bool {
        if !self.can_pause(env, services.config, true) {
            return false;
        }
        if !services.listeners.allow_pause(self.slot) {
            debug!(player = %self.slot, "Pause vetoed");
            return self.refuse(env, true, Message::CantPause);
        }

        self.pause.paused = true;
        self.pause.on_ladder = env.pawn.move_type() == MoveType::Ladder;
        self.pause.saved = Some(env.pawn.movement_snapshot());
        env.pawn.set_velocity(Vec3::ZERO);
        env.pawn.set_move_type(MoveType::None);

        if self.run.running {
            self.pause.has_paused_in_run = true;
            self.pause.last_pause = Some(env.clock.time);
        }

        info!(player = %self.slot, running = self.run.running, time = self.run.time, "Timer paused");
        services.listeners.pause_post(self.slot);
        true
    }

    pub fn can_resume(&self, env: &mut Env<'_>, config: &TimerConfig, show_error: bool) -> bool {
        if self.run.running
            && self.pause.has_paused_in_run
            && env.clock.within(self.pause.last_pause, config.resume_cooldown)
        {
            return self.refuse(env, show_error, Message::CantResumeJustPaused);
        }
        true
    }

    /// Leave the paused state. `force` skips the resume cooldown; listeners
    /// are still asked.
    pub fn resume(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>, force: bool) -> bool {
        if !self.pause.paused {
            return false;
        }
        if !force && !self.can_resume(env, services.config, true) {
            return false;
        }
        if !services.listeners.allow_resume(self.slot) {
            debug!(player = %self.slot, force, "Resume vetoed");
            return self.refuse(env, true, Message::CantResume);
        }

        let move_type = if self.pause.on_ladder { MoveType::Ladder } else { MoveType::Walk };
        env.pawn.set_move_type(move_type);
        env.pawn.reset_collision_group();
        self.finish_resume(env, services);
        true
    }

    pub fn toggle_pause(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>) -> bool {
        if self.pause.paused {
            self.resume(env, services, false)
        } else {
            self.pause(env, services)
        }
    }

    /// Player respawned; a pause cannot survive it.
    pub fn on_respawn(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>) {
        if self.pause.paused {
            self.implicit_resume(env, services);
        }
    }

    /// Player moved to the spectator team.
    ///
    /// Spectating always pauses. Pause rules and listener vetoes do not
    /// apply and the pawn is left to the host.
    pub fn on_join_spectators(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>) {
        if self.pause.paused {
            return;
        }
        self.pause.paused = true;
        self.pause.on_ladder = false;
        self.pause.saved = Some(env.pawn.movement_snapshot());
        if self.run.running {
            self.pause.has_paused_in_run = true;
            self.pause.last_pause = Some(env.clock.time);
        }
        info!(player = %self.slot, running = self.run.running, time = self.run.time, "Timer paused for spectating");
        services.listeners.pause_post(self.slot);
    }

    /// Resume without touching the pawn's move type, for hosts that already
    /// moved the player out of the frozen state.
    pub(super) fn implicit_resume(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>) {
        debug!(player = %self.slot, move_type = ?env.pawn.move_type(), "Implicit resume");
        self.finish_resume(env, services);
    }

    fn finish_resume(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>) {
        self.pause.paused = false;
        if self.run.running {
            self.pause.has_resumed_in_run = true;
            self.pause.last_resume = Some(env.clock.time);
        }
        if let Some(saved) = self.pause.saved.take() {
            env.pawn.restore_movement(saved);
        }
        info!(player = %self.slot, running = self.run.running, time = self.run.time, "Timer resumed");
        services.listeners.resume_post(self.slot);
    }

    fn refuse(&self, env: &mut Env<'_>, show_error: bool, message: Message) -> bool {
        if show_error {
            env.feedback.message(self.slot, message);
            env.feedback.play_sound(self.slot, SoundCue::Error);
        }
        false
    }
}
