//! Top-level timer context owned by the host plugin
//!
//! [`TimerSystem`] ties the zone registry to the per-player timers. The host
//! forwards entity spawns to [`TimerSystem::zones_mut`] during map load and
//! zone touches, ticks and player lifecycle events afterwards.
//!
//! ```rust
//! use kztimer::{TimerConfig, TimerSystem};
//! use kztimer::types::PlayerSlot;
//!
//! let mut system = TimerSystem::new(TimerConfig::default());
//! system.zones_mut().register_course("Main", 0, 1, 0, false).unwrap();
//! system.zones_mut().finish_setup();
//!
//! assert!(system.on_player_connect(PlayerSlot(1)));
//! assert!(!system.player(PlayerSlot(1)).unwrap().is_running());
//! ```

use std::collections::BTreeMap;
use tracing::{debug, info, trace};

use crate::TimerConfig;
use crate::course::CourseId;
use crate::host::{EntityWorld, Env, Feedback, Pawn, SilentFeedback};
use crate::listener::ListenerRegistry;
use crate::mapping::{TriggerPayload, ZoneRegistry};
use crate::recorder::RunSubmitter;
use crate::timer::{PlayerTimer, TimerServices};
use crate::types::{EntityHandle, MoveType, PlayerSlot, TickStamp, TriggerKind, ZoneKind};

/// What a trigger touch resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// Unknown, stale or dead trigger, or an untracked player
    Ignored,
    /// Timer zone, handled here
    Zone(ZoneKind),
    /// Mapping trigger for another subsystem (modifiers, bhop, teleports)
    Other(TriggerKind),
}

/// State shared by every player's transitions.
#[derive(Debug)]
struct Shared {
    config: TimerConfig,
    listeners: ListenerRegistry,
    recorder: Option<RunSubmitter>,
}

impl Shared {
    fn services(&self) -> TimerServices<'_> {
        TimerServices::new(&self.config, &self.listeners, self.recorder.as_ref())
    }
}

/// Zone registry, listeners and one timer per connected player.
#[derive(Debug)]
pub struct TimerSystem {
    shared: Shared,
    zones: ZoneRegistry,
    players: BTreeMap<PlayerSlot, PlayerTimer>,
}

impl TimerSystem {
    pub fn new(config: TimerConfig) -> Self {
        let zones = ZoneRegistry::new(&config);
        Self {
            shared: Shared { config, listeners: ListenerRegistry::new(), recorder: None },
            zones,
            players: BTreeMap::new(),
        }
    }

    /// Create a system that hands finished runs to `recorder`.
    pub fn with_recorder(config: TimerConfig, recorder: RunSubmitter) -> Self {
        let mut system = Self::new(config);
        system.shared.recorder = Some(recorder);
        system
    }

    pub fn config(&self) -> &TimerConfig {
        &self.shared.config
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn zones_mut(&mut self) -> &mut ZoneRegistry {
        &mut self.zones
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.shared.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.shared.listeners
    }

    /// Prepare for a new map: stop every run silently and clear the registry.
    ///
    /// Course ids from the previous map are meaningless afterwards.
    pub fn begin_map_setup(&mut self) {
        self.stop_all(false, &mut SilentFeedback);
        self.zones.initialize();
    }

    /// Start tracking `slot`. Returns false if it was already tracked.
    pub fn on_player_connect(&mut self, slot: PlayerSlot) -> bool {
        if self.players.contains_key(&slot) {
            return false;
        }
        self.players.insert(slot, PlayerTimer::new(slot));
        debug!(player = %slot, "Player timer created");
        true
    }

    /// Stop the player's run and forget them.
    pub fn on_player_disconnect(&mut self, slot: PlayerSlot) {
        let services = self.shared.services();
        if let Some(mut timer) = self.players.remove(&slot) {
            timer.timer_stop(&mut SilentFeedback, &services, false);
            timer.reset();
            debug!(player = %slot, "Player timer removed");
        }
    }

    pub fn player(&self, slot: PlayerSlot) -> Option<&PlayerTimer> {
        self.players.get(&slot)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerTimer> {
        self.players.values()
    }

    /// Player started touching a trigger volume.
    pub fn on_trigger_start_touch(
        &mut self,
        slot: PlayerSlot,
        handle: EntityHandle,
        world: &dyn EntityWorld,
        env: &mut Env<'_>,
    ) -> TouchOutcome {
        let Some(trigger) = self.zones.resolve_trigger(handle, world) else {
            return TouchOutcome::Ignored;
        };
        let Some(timer) = self.players.get_mut(&slot) else {
            return TouchOutcome::Ignored;
        };
        let services = self.shared.services();

        match &trigger.payload {
            TriggerPayload::Zone(zone) => {
                let Some(course) = self.zones.course(zone.course) else {
                    return TouchOutcome::Ignored;
                };
                trace!(player = %slot, handle = %handle, zone = %zone.kind, course = %course.name, "Zone touched");
                match zone.kind {
                    ZoneKind::Start => timer.start_zone_enter(env, &services, course),
                    ZoneKind::End => {
                        timer.timer_end(env, &services, course);
                    }
                    ZoneKind::Split => timer.split_zone_enter(env, &services, course, zone.number),
                    ZoneKind::Checkpoint => timer.checkpoint_zone_enter(env, &services, course, zone.number),
                    ZoneKind::Stage => timer.stage_zone_enter(env, &services, course, zone.number),
                }
                TouchOutcome::Zone(zone.kind)
            }
            TriggerPayload::Modifier { flags } => {
                if flags.disables_pause() {
                    timer.add_pause_blocker();
                }
                TouchOutcome::Other(trigger.kind)
            }
            _ => TouchOutcome::Other(trigger.kind),
        }
    }

    /// Player stopped touching a trigger volume.
    pub fn on_trigger_end_touch(
        &mut self,
        slot: PlayerSlot,
        handle: EntityHandle,
        world: &dyn EntityWorld,
        env: &mut Env<'_>,
    ) -> TouchOutcome {
        let Some(trigger) = self.zones.resolve_trigger(handle, world) else {
            return TouchOutcome::Ignored;
        };
        let Some(timer) = self.players.get_mut(&slot) else {
            return TouchOutcome::Ignored;
        };
        let services = self.shared.services();

        match &trigger.payload {
            TriggerPayload::Zone(zone) => {
                if zone.kind == ZoneKind::Start {
                    if let Some(course) = self.zones.course(zone.course) {
                        timer.start_zone_exit(env, &services, course);
                    }
                }
                TouchOutcome::Zone(zone.kind)
            }
            TriggerPayload::Modifier { flags } => {
                if flags.disables_pause() {
                    timer.remove_pause_blocker();
                }
                TouchOutcome::Other(trigger.kind)
            }
            _ => TouchOutcome::Other(trigger.kind),
        }
    }

    /// Physics tick for one player; `pawn` decides whether time accrues.
    pub fn on_tick(&mut self, slot: PlayerSlot, pawn: &dyn Pawn) {
        let config = &self.shared.config;
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_tick(pawn, config);
        }
    }

    /// Start a run on `course` outside of a start zone, e.g. from a command.
    pub fn timer_start(&mut self, slot: PlayerSlot, course: CourseId, env: &mut Env<'_>, play_sound: bool) -> bool {
        let Some(course) = self.zones.course(course) else {
            return false;
        };
        let services = self.shared.services();
        self.players
            .get_mut(&slot)
            .is_some_and(|timer| timer.timer_start(env, &services, course, play_sound))
    }

    pub fn timer_end(&mut self, slot: PlayerSlot, course: CourseId, env: &mut Env<'_>) -> bool {
        let Some(course) = self.zones.course(course) else {
            return false;
        };
        let services = self.shared.services();
        self.players.get_mut(&slot).is_some_and(|timer| timer.timer_end(env, &services, course))
    }

    pub fn timer_stop(&mut self, slot: PlayerSlot, feedback: &mut dyn Feedback, play_sound: bool) -> bool {
        let services = self.shared.services();
        self.players
            .get_mut(&slot)
            .is_some_and(|timer| timer.timer_stop(feedback, &services, play_sound))
    }

    /// Stop every running timer. Returns how many were stopped.
    pub fn stop_all(&mut self, play_sound: bool, feedback: &mut dyn Feedback) -> usize {
        let services = self.shared.services();
        let stopped = self
            .players
            .values_mut()
            .map(|timer| timer.timer_stop(feedback, &services, play_sound))
            .filter(|&stopped| stopped)
            .count();
        if stopped > 0 {
            info!(stopped, "Stopped all timers");
        }
        stopped
    }

    pub fn invalidate_run(&mut self, slot: PlayerSlot) {
        let services = self.shared.services();
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.invalidate_run(&services);
        }
    }

    pub fn pause(&mut self, slot: PlayerSlot, env: &mut Env<'_>) -> bool {
        let services = self.shared.services();
        self.players.get_mut(&slot).is_some_and(|timer| timer.pause(env, &services))
    }

    pub fn resume(&mut self, slot: PlayerSlot, env: &mut Env<'_>, force: bool) -> bool {
        let services = self.shared.services();
        self.players.get_mut(&slot).is_some_and(|timer| timer.resume(env, &services, force))
    }

    pub fn toggle_pause(&mut self, slot: PlayerSlot, env: &mut Env<'_>) -> bool {
        let services = self.shared.services();
        self.players.get_mut(&slot).is_some_and(|timer| timer.toggle_pause(env, &services))
    }

    pub fn on_respawn(&mut self, slot: PlayerSlot, env: &mut Env<'_>) {
        let services = self.shared.services();
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_respawn(env, &services);
        }
    }

    pub fn on_join_spectators(&mut self, slot: PlayerSlot, env: &mut Env<'_>) {
        let services = self.shared.services();
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_join_spectators(env, &services);
        }
    }

    pub fn on_jump(&mut self, slot: PlayerSlot, env: &Env<'_>) {
        let config = &self.shared.config;
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_jump(env, config);
        }
    }

    pub fn on_landing(&mut self, slot: PlayerSlot, env: &Env<'_>) {
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_landing(env.clock);
        }
    }

    pub fn on_ground_touch(&mut self, slot: PlayerSlot) {
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_ground_touch();
        }
    }

    pub fn on_change_move_type(&mut self, slot: PlayerSlot, env: &mut Env<'_>, old: MoveType, new: MoveType) {
        let services = self.shared.services();
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_change_move_type(env, &services, old, new);
        }
    }

    pub fn on_mode_changed(&mut self, slot: PlayerSlot, feedback: &mut dyn Feedback, mode_name: &str) {
        let services = self.shared.services();
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_mode_changed(feedback, &services, mode_name);
        }
    }

    pub fn record_teleport(&mut self, slot: PlayerSlot) {
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.record_teleport();
        }
    }

    pub fn on_player_death(&mut self, slot: PlayerSlot, feedback: &mut dyn Feedback) {
        let services = self.shared.services();
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_player_death(feedback, &services);
        }
    }

    /// Host teleported the player. `moved` is false for angle-only teleports.
    pub fn on_teleport(&mut self, slot: PlayerSlot, now: TickStamp, moved: bool) {
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_teleport(now, moved);
        }
    }

    pub fn on_teleport_to_start(&mut self, slot: PlayerSlot, feedback: &mut dyn Feedback) {
        let services = self.shared.services();
        if let Some(timer) = self.players.get_mut(&slot) {
            timer.on_teleport_to_start(feedback, &services);
        }
    }

    /// Plugin unload: drop every listener and player timer.
    pub fn shutdown(&mut self) {
        self.shared.listeners.clear();
        self.players.clear();
        info!("Timer system shut down");
    }
}
