//! Test doubles for the host facades and listener hooks
//!
//! These fakes are shared by unit tests and benchmarks. Every field of
//! [`FakePawn`] is public so a test can script exactly the engine state a
//! transition should observe.

#![cfg(any(test, feature = "benchmark"))]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Once};

use crate::course::{Course, CourseId};
use crate::feedback::{Message, SoundCue};
use crate::host::{EntityWorld, Feedback, Pawn};
use crate::listener::TimerListener;
use crate::mapping::{COURSE_DESCRIPTOR_CLASSNAME, EntitySpawn, KeyValues, TRIGGER_CLASSNAME};
use crate::types::{EntityHandle, MoveType, MovementSnapshot, PlayerSlot, TriggerKind, Vec3};

/// Install a `tracing` subscriber honouring `RUST_LOG`, once per process.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Scriptable player pawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FakePawn {
    pub alive: bool,
    pub bot: bool,
    pub move_type: MoveType,
    pub velocity: Vec3,
    pub on_ground: bool,
    pub just_teleported: bool,
    pub just_left_noclip: bool,
    pub in_perf_review: bool,
    pub just_landed: bool,
    pub movement: MovementSnapshot,
    pub collision_resets: u32,
}

impl Default for FakePawn {
    fn default() -> Self {
        Self {
            alive: true,
            bot: false,
            move_type: MoveType::Walk,
            velocity: Vec3::ZERO,
            on_ground: true,
            just_teleported: false,
            just_left_noclip: false,
            in_perf_review: false,
            just_landed: false,
            movement: MovementSnapshot { duck_amount: 0.0, duck_speed: 8.0, stamina: 0.0 },
            collision_resets: 0,
        }
    }
}

impl FakePawn {
    /// Put the pawn in the air with the given velocity.
    pub fn set_airborne(&mut self, velocity: Vec3) {
        self.on_ground = false;
        self.velocity = velocity;
    }

    pub fn land(&mut self) {
        self.on_ground = true;
        self.velocity = Vec3::ZERO;
    }
}

impl Pawn for FakePawn {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_bot(&self) -> bool {
        self.bot
    }

    fn move_type(&self) -> MoveType {
        self.move_type
    }

    fn set_move_type(&mut self, move_type: MoveType) {
        self.move_type = move_type;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn on_ground(&self) -> bool {
        self.on_ground
    }

    fn just_teleported(&self) -> bool {
        self.just_teleported
    }

    fn just_left_noclip(&self) -> bool {
        self.just_left_noclip
    }

    fn in_perf_review(&self) -> bool {
        self.in_perf_review
    }

    fn just_landed(&self) -> bool {
        self.just_landed
    }

    fn movement_snapshot(&self) -> MovementSnapshot {
        self.movement
    }

    fn restore_movement(&mut self, snapshot: MovementSnapshot) {
        self.movement = snapshot;
    }

    fn reset_collision_group(&mut self) {
        self.collision_resets += 1;
    }
}

/// Feedback sink that records everything it is sent.
#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    pub messages: Vec<(PlayerSlot, Message)>,
    pub sounds: Vec<(PlayerSlot, SoundCue)>,
}

impl RecordingFeedback {
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last().map(|(_, m)| m)
    }

    pub fn last_sound(&self) -> Option<SoundCue> {
        self.sounds.last().map(|(_, s)| *s)
    }

    /// Number of times `cue` was played.
    pub fn played(&self, cue: SoundCue) -> usize {
        self.sounds.iter().filter(|(_, s)| *s == cue).count()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.sounds.clear();
    }
}

impl Feedback for RecordingFeedback {
    fn message(&mut self, player: PlayerSlot, message: Message) {
        self.messages.push((player, message));
    }

    fn play_sound(&mut self, player: PlayerSlot, cue: SoundCue) {
        self.sounds.push((player, cue));
    }
}

/// Entity list where every handle is live until killed.
#[derive(Debug, Default, Clone)]
pub struct FakeWorld {
    dead: HashSet<EntityHandle>,
}

impl FakeWorld {
    pub fn kill(&mut self, handle: EntityHandle) {
        self.dead.insert(handle);
    }

    pub fn revive(&mut self, handle: EntityHandle) {
        self.dead.remove(&handle);
    }
}

impl EntityWorld for FakeWorld {
    fn is_live(&self, handle: EntityHandle) -> bool {
        !self.dead.contains(&handle)
    }
}

/// Listener that counts every hook and vetoes on demand.
#[derive(Debug, Default)]
pub struct CountingListener {
    pub veto_start: AtomicBool,
    pub veto_end: AtomicBool,
    pub veto_pause: AtomicBool,
    pub veto_resume: AtomicBool,
    start_attempts: AtomicU32,
    starts: AtomicU32,
    end_attempts: AtomicU32,
    ends: AtomicU32,
    stops: AtomicU32,
    pause_attempts: AtomicU32,
    pauses: AtomicU32,
    resume_attempts: AtomicU32,
    resumes: AtomicU32,
    invalidations: AtomicU32,
}

fn bump(counter: &AtomicU32) {
    counter.fetch_add(1, Ordering::SeqCst);
}

fn read(counter: &AtomicU32) -> u32 {
    counter.load(Ordering::SeqCst)
}

impl CountingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Listener that refuses every start, end, pause and resume.
    pub fn vetoing() -> Arc<Self> {
        let listener = Self::default();
        listener.veto_start.store(true, Ordering::SeqCst);
        listener.veto_end.store(true, Ordering::SeqCst);
        listener.veto_pause.store(true, Ordering::SeqCst);
        listener.veto_resume.store(true, Ordering::SeqCst);
        Arc::new(listener)
    }

    pub fn set_veto_start(&self, veto: bool) {
        self.veto_start.store(veto, Ordering::SeqCst);
    }

    pub fn set_veto_resume(&self, veto: bool) {
        self.veto_resume.store(veto, Ordering::SeqCst);
    }

    pub fn start_attempts(&self) -> u32 {
        read(&self.start_attempts)
    }

    pub fn starts(&self) -> u32 {
        read(&self.starts)
    }

    pub fn end_attempts(&self) -> u32 {
        read(&self.end_attempts)
    }

    pub fn ends(&self) -> u32 {
        read(&self.ends)
    }

    pub fn stops(&self) -> u32 {
        read(&self.stops)
    }

    pub fn pause_attempts(&self) -> u32 {
        read(&self.pause_attempts)
    }

    pub fn pauses(&self) -> u32 {
        read(&self.pauses)
    }

    pub fn resume_attempts(&self) -> u32 {
        read(&self.resume_attempts)
    }

    pub fn resumes(&self) -> u32 {
        read(&self.resumes)
    }

    pub fn invalidations(&self) -> u32 {
        read(&self.invalidations)
    }
}

impl TimerListener for CountingListener {
    fn on_timer_start(&self, _player: PlayerSlot, _course: &Course) -> bool {
        bump(&self.start_attempts);
        !self.veto_start.load(Ordering::SeqCst)
    }

    fn on_timer_start_post(&self, _player: PlayerSlot, _course: &Course) {
        bump(&self.starts);
    }

    fn on_timer_end(&self, _player: PlayerSlot, _course: &Course, _time: f64) -> bool {
        bump(&self.end_attempts);
        !self.veto_end.load(Ordering::SeqCst)
    }

    fn on_timer_end_post(&self, _player: PlayerSlot, _course: &Course, _time: f64) {
        bump(&self.ends);
    }

    fn on_timer_stopped(&self, _player: PlayerSlot, _course: Option<CourseId>) {
        bump(&self.stops);
    }

    fn on_pause(&self, _player: PlayerSlot) -> bool {
        bump(&self.pause_attempts);
        !self.veto_pause.load(Ordering::SeqCst)
    }

    fn on_pause_post(&self, _player: PlayerSlot) {
        bump(&self.pauses);
    }

    fn on_resume(&self, _player: PlayerSlot) -> bool {
        bump(&self.resume_attempts);
        !self.veto_resume.load(Ordering::SeqCst)
    }

    fn on_resume_post(&self, _player: PlayerSlot) {
        bump(&self.resumes);
    }

    fn on_timer_invalidated(&self, _player: PlayerSlot) {
        bump(&self.invalidations);
    }
}

/// Spawn record of a course descriptor entity named `name`.
pub fn course_descriptor(handle: EntityHandle, name: &str) -> EntitySpawn {
    let keyvalues: KeyValues = [("timer_course_descriptor", "1"), ("timer_course_name", name)].into_iter().collect();
    EntitySpawn::new(handle, COURSE_DESCRIPTOR_CLASSNAME, keyvalues)
}

/// Spawn record of a zone trigger on `course`.
///
/// `number` is written to the zone kind's number key when given.
pub fn zone_spawn(handle: EntityHandle, kind: TriggerKind, course: &str, number: Option<u32>) -> EntitySpawn {
    let mut keyvalues = KeyValues::new();
    keyvalues.insert("timer_trigger_type", (kind as i64).to_string());
    keyvalues.insert("timer_zone_course_descriptor", course);
    if let (Some(number), Some(key)) = (number, kind.zone_kind().and_then(|z| z.number_key())) {
        keyvalues.insert(key, number.to_string());
    }
    EntitySpawn::new(handle, TRIGGER_CLASSNAME, keyvalues)
}
