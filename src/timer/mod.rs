//! # Timer state machine
//!
//! One [`PlayerTimer`] per connected player tracks the active run: elapsed
//! time, progress through split, checkpoint and stage zones, pause state and
//! the cooldown timestamps that keep zone spam from turning into chat spam.
//!
//! ## State Machine
//!
//! ```text
//!            timer_start            timer_end
//!   Idle ─────────────────► Running ─────────► Finished
//!    ▲                       │   ▲
//!    │      timer_stop       │   │ resume
//!    └───────────────────────┤   │
//!                            ▼   │
//!                          Paused
//! ```
//!
//! Transitions are plain methods taking the host collaborators for the
//! current event ([`Env`]) and the shared services ([`TimerServices`]).
//! Refusals return `false` and tell the player why through
//! [`Feedback`](crate::host::Feedback); they are never errors.

mod pause;
mod zones;


pub use zones::{UNREACHED, ZoneTimes};

use pause::PauseState;

use tracing::{debug, info};

use crate::TimerConfig;
use crate::course::{Course, CourseId};
use crate::feedback::{Message, SoundCue, format_time};
use crate::host::{Env, Feedback, Pawn};
use crate::listener::ListenerRegistry;
use crate::recorder::{CompletedRun, RunSubmitter};
use crate::types::{MoveType, PlayerSlot, TickStamp};

/// Shared, read-only context every transition needs.
#[derive(Debug, Clone, Copy)]
pub struct TimerServices<'a> {
    pub config: &'a TimerConfig,
    pub listeners: &'a ListenerRegistry,
    /// Destination for finished runs, if persistence is enabled
    pub recorder: Option<&'a RunSubmitter>,
}

impl<'a> TimerServices<'a> {
    pub fn new(config: &'a TimerConfig, listeners: &'a ListenerRegistry, recorder: Option<&'a RunSubmitter>) -> Self {
        Self { config, listeners, recorder }
    }
}

/// Fields created at start and finalized at end or stop.
#[derive(Debug, Clone, Default, PartialEq)]
struct RunState {
    running: bool,
    valid: bool,
    time: f64,
    course: Option<CourseId>,
    mode_name: String,
    /// Number of stages reached, in order
    current_stage: u32,
    reached_checkpoints: u32,
    splits: ZoneTimes,
    checkpoints: ZoneTimes,
    stages: ZoneTimes,
    teleports: u32,
}

/// Timer of one connected player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTimer {
    slot: PlayerSlot,
    run: RunState,
    pause: PauseState,

    valid_jump: bool,
    touched_ground_since_start_enter: bool,

    last_start_tick: Option<u64>,
    last_jump_invalidation_tick: Option<u64>,

    last_start_sound: Option<f64>,
    last_end: Option<f64>,
    last_false_end: Option<f64>,
}

impl PlayerTimer {
    pub fn new(slot: PlayerSlot) -> Self {
        Self {
            slot,
            run: RunState::default(),
            pause: PauseState::default(),
            valid_jump: false,
            touched_ground_since_start_enter: false,
            last_start_tick: None,
            last_jump_invalidation_tick: None,
            last_start_sound: None,
            last_end: None,
            last_false_end: None,
        }
    }

    pub fn slot(&self) -> PlayerSlot {
        self.slot
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    pub fn is_paused(&self) -> bool {
        self.pause.paused
    }

    pub fn is_valid(&self) -> bool {
        self.run.valid
    }

    /// Elapsed run time in seconds. Frozen at the finish value after an end.
    pub fn time(&self) -> f64 {
        self.run.time
    }

    /// Course of the current or most recent run.
    pub fn course(&self) -> Option<CourseId> {
        self.run.course
    }

    pub fn mode_name(&self) -> &str {
        &self.run.mode_name
    }

    /// Number of stages reached so far.
    pub fn current_stage(&self) -> u32 {
        self.run.current_stage
    }

    pub fn reached_checkpoints(&self) -> u32 {
        self.run.reached_checkpoints
    }

    pub fn split_times(&self) -> &ZoneTimes {
        &self.run.splits
    }

    pub fn checkpoint_times(&self) -> &ZoneTimes {
        &self.run.checkpoints
    }

    pub fn stage_times(&self) -> &ZoneTimes {
        &self.run.stages
    }

    pub fn teleports(&self) -> u32 {
        self.run.teleports
    }

    pub fn has_valid_jump(&self) -> bool {
        self.valid_jump
    }

    pub fn last_end_time(&self) -> Option<f64> {
        self.last_end
    }

    /// Server time of the last end zone touch that found no matching run.
    pub fn last_false_end_time(&self) -> Option<f64> {
        self.last_false_end
    }

    /// Player touched a start zone.
    pub fn start_zone_enter(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>, _course: &Course) {
        self.touched_ground_since_start_enter = env.pawn.on_ground();
        self.timer_stop(env.feedback, services, false);
    }

    /// Player left a start zone; starts the run if they stood in it.
    pub fn start_zone_exit(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>, course: &Course) -> bool {
        if !self.touched_ground_since_start_enter {
            return false;
        }
        self.timer_start(env, services, course, true)
    }

    /// Start a run on `course`.
    pub fn timer_start(
        &mut self,
        env: &mut Env<'_>,
        services: &TimerServices<'_>,
        course: &Course,
        play_sound: bool,
    ) -> bool {
        let config = services.config;
        let now = env.clock;
        let pawn = &*env.pawn;

        if !pawn.is_alive()
            || self.last_start_tick == Some(now.tick)
            || pawn.just_teleported()
            || pawn.in_perf_review()
            || pawn.just_left_noclip()
            || !config.allows_start_in(pawn.move_type())
            || pawn.just_landed()
            || (self.run.running && self.run.course == Some(course.id))
            || (!pawn.on_ground() && !self.valid_jump)
        {
            return false;
        }
        if env.mode_name.len() > config.max_mode_name_len {
            debug!(player = %self.slot, len = env.mode_name.len(), "Timer start refused: mode name too long");
            return false;
        }

        if !services.listeners.allow_start(self.slot, course) {
            debug!(player = %self.slot, course = %course.name, "Timer start vetoed");
            return false;
        }

        self.run = RunState {
            running: true,
            valid: true,
            time: 0.0,
            course: Some(course.id),
            mode_name: env.mode_name.to_string(),
            ..RunState::default()
        };
        self.run.splits.reset(course.split_count);
        self.run.checkpoints.reset(course.checkpoint_count);
        self.run.stages.reset(course.stage_count);
        self.pause.start_run();
        self.last_end = None;
        self.last_false_end = None;
        self.last_start_tick = Some(now.tick);

        if play_sound && !now.within(self.last_start_sound, config.start_sound_cooldown) {
            env.feedback.play_sound(self.slot, SoundCue::TimerStart);
            self.last_start_sound = Some(now.time);
        }

        info!(player = %self.slot, course = %course.name, mode = %self.run.mode_name, "Timer started");
        services.listeners.start_post(self.slot, course);
        true
    }

    /// Finish the run on `course`.
    pub fn timer_end(&mut self, env: &mut Env<'_>, services: &TimerServices<'_>, course: &Course) -> bool {
        if !env.pawn.is_alive() {
            return false;
        }

        let config = services.config;
        let now = env.clock;

        if !self.run.running || self.run.course != Some(course.id) {
            if !now.within(self.last_false_end, config.false_end_cooldown) {
                env.feedback.play_sound(self.slot, SoundCue::FalseEnd);
                self.last_false_end = Some(now.time);
            }
            return false;
        }

        if self.run.current_stage < course.stage_count {
            env.feedback.play_sound(self.slot, SoundCue::MissedZone);
            env.feedback.message(self.slot, Message::MissedStage { stage: self.run.current_stage + 1 });
            return false;
        }

        if self.run.reached_checkpoints < course.checkpoint_count {
            let missed = course.checkpoint_count - self.run.reached_checkpoints;
            env.feedback.play_sound(self.slot, SoundCue::MissedZone);
            env.feedback.message(self.slot, Message::MissedCheckpoints { missed });
            return false;
        }

        // The end touch happens during a tick that has not been counted yet.
        let finish = self.run.time + config.tick_interval;

        if !services.listeners.allow_end(self.slot, course, finish) {
            debug!(player = %self.slot, course = %course.name, "Timer end vetoed");
            return false;
        }

        self.run.time = finish;
        self.run.running = false;
        self.last_end = Some(now.time);
        env.feedback.play_sound(self.slot, SoundCue::TimerEnd);

        info!(
            player = %self.slot,
            course = %course.name,
            time = %format_time(finish, true),
            teleports = self.run.teleports,
            valid = self.run.valid,
            "Timer ended"
        );

        if let Some(recorder) = services.recorder.filter(|_| !env.pawn.is_bot()) {
            recorder.submit(CompletedRun {
                player: self.slot,
                course: course.name.clone(),
                course_number: course.number,
                mode: self.run.mode_name.clone(),
                time: finish,
                teleports: self.run.teleports,
                valid: self.run.valid,
            });
        }

        services.listeners.end_post(self.slot, course, finish);
        true
    }

    /// Abort the active run. Time and zone times stay readable.
    pub fn timer_stop(&mut self, feedback: &mut dyn Feedback, services: &TimerServices<'_>, play_sound: bool) -> bool {
        if !self.run.running {
            return false;
        }
        self.run.running = false;
        if play_sound {
            feedback.play_sound(self.slot, SoundCue::TimerStop);
        }
        info!(player = %self.slot, time = self.run.time, "Timer stopped");
        services.listeners.stopped(self.slot, self.run.course);
        true
    }

    /// Mark the run as not eligible for records.
    pub fn invalidate_run(&mut self, services: &TimerServices<'_>) {
        if !self.run.valid {
            return;
        }
        self.run.valid = false;
        info!(player = %self.slot, "Run invalidated");
        services.listeners.invalidated(self.slot);
    }

    /// Advance the run by one simulation tick. Dead players do not accrue time.
    pub fn on_tick(&mut self, pawn: &dyn Pawn, config: &TimerConfig) {
        if pawn.is_alive() && self.run.running && !self.pause.paused {
            self.run.time += config.tick_interval;
        }
    }

    /// Player died; the run cannot continue.
    pub fn on_player_death(&mut self, feedback: &mut dyn Feedback, services: &TimerServices<'_>) {
        if self.timer_stop(feedback, services, true) {
            debug!(player = %self.slot, "Timer stopped by death");
        }
    }

    /// Player was teleported. `moved` is true when the position or velocity
    /// changed, which makes the current jump unusable for a start.
    pub fn on_teleport(&mut self, now: TickStamp, moved: bool) {
        if moved {
            self.invalidate_jump(now);
        }
    }

    /// Player used the teleport-to-start command.
    pub fn on_teleport_to_start(&mut self, feedback: &mut dyn Feedback, services: &TimerServices<'_>) {
        self.timer_stop(feedback, services, true);
    }

    /// Player left the ground.
    pub fn on_jump(&mut self, env: &Env<'_>, config: &TimerConfig) {
        if config.allows_start_in(env.pawn.move_type()) && !self.jump_invalidated_at(env.clock) {
            self.valid_jump = true;
        } else {
            self.invalidate_jump(env.clock);
        }
    }

    /// Clear the valid jump flag. Repeated calls in one tick collapse to one.
    pub fn invalidate_jump(&mut self, now: TickStamp) {
        if self.jump_invalidated_at(now) {
            return;
        }
        self.valid_jump = false;
        self.last_jump_invalidation_tick = Some(now.tick);
    }

    /// Player landed.
    pub fn on_landing(&mut self, now: TickStamp) {
        self.invalidate_jump(now);
        self.touched_ground_since_start_enter = true;
    }

    pub fn on_ground_touch(&mut self) {
        self.touched_ground_since_start_enter = true;
    }

    /// Host changed the player's move type from `old` to `new`.
    pub fn on_change_move_type(
        &mut self,
        env: &mut Env<'_>,
        services: &TimerServices<'_>,
        old: MoveType,
        new: MoveType,
    ) {
        if old == MoveType::Ladder && new == MoveType::Walk && !self.jump_invalidated_at(env.clock) {
            self.valid_jump = true;
        } else {
            self.invalidate_jump(env.clock);
        }

        if self.pause.paused && new != MoveType::None {
            self.implicit_resume(env, services);
        }
    }

    /// Player switched movement mode; a run in another mode cannot go on.
    pub fn on_mode_changed(&mut self, feedback: &mut dyn Feedback, services: &TimerServices<'_>, mode_name: &str) {
        if self.run.running && self.run.mode_name != mode_name {
            debug!(player = %self.slot, from = %self.run.mode_name, to = %mode_name, "Mode changed mid-run");
            self.timer_stop(feedback, services, true);
        }
    }

    /// Count a checkpoint teleport against the run.
    pub fn record_teleport(&mut self) {
        if self.run.running {
            self.run.teleports += 1;
        }
    }

    /// Restore the initial state, as for a freshly connected player.
    pub fn reset(&mut self) {
        *self = PlayerTimer::new(self.slot);
    }

    fn jump_invalidated_at(&self, now: TickStamp) -> bool {
        self.last_jump_invalidation_tick == Some(now.tick)
    }
}
