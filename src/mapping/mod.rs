//! # Mapping API
//!
//! Discovers timer triggers and course descriptors from the entities a map
//! spawns, and resolves entity handles back to typed descriptors while players
//! touch them.
//!
//! ## Lifecycle
//!
//! ```text
//! initialize() ──► on_entity_spawned() × N ──► finish_setup() ──► resolve_trigger() per touch
//!      ▲                                              │
//!      └──────────────────── next map ◄───────────────┘
//! ```
//!
//! Entities arrive in map file order, so a zone can spawn before the course
//! descriptor it names. Such zones are parked until [`ZoneRegistry::finish_setup`]
//! resolves them; zones that still name no course are then dropped with a
//! diagnostic. Each course's split, checkpoint and stage counts grow to the
//! highest zone number seen, and are fixed once setup is finished.
//!
//! ## Handle Validation
//!
//! Descriptors are stored in a bounded arena indexed by entity slot. Every
//! lookup compares the full handle (slot and serial) and asks the host whether
//! the entity is still alive, so a destroyed or reused entity never resolves to
//! a stale descriptor.

mod keyvalues;
mod trigger;

pub use keyvalues::{EntitySpawn, KeyValues};
pub use trigger::{TeleportInfo, TriggerDescriptor, TriggerPayload, ZoneInfo};

use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

use crate::TimerConfig;
use crate::course::{Course, CourseId, CourseRegistry};
use crate::host::EntityWorld;
use crate::types::{EntityHandle, ModifierFlags, TriggerKind, ZoneKind, modifier_flags};
use crate::{MappingError, Result};

/// Class name of timer trigger volumes.
pub const TRIGGER_CLASSNAME: &str = "trigger_multiple";
/// Class name of course descriptor entities.
pub const COURSE_DESCRIPTOR_CLASSNAME: &str = "info_target_server_only";

const KEY_TRIGGER_TYPE: &str = "timer_trigger_type";
const KEY_ZONE_COURSE: &str = "timer_zone_course_descriptor";
const KEY_COURSE_DESCRIPTOR: &str = "timer_course_descriptor";
const KEY_COURSE_NAME: &str = "timer_course_name";
const KEY_COURSE_NUMBER: &str = "timer_course_number";
const KEY_COURSE_DISABLE_CHECKPOINT: &str = "timer_course_disable_checkpoint";

const DEFAULT_ANTI_BHOP_TIME: f32 = 0.2;
const DEFAULT_BHOP_TELEPORT_DELAY: f32 = 0.1;

/// What a spawned entity was registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Trigger(TriggerKind),
    /// Zone whose course is not registered yet
    PendingZone(ZoneKind),
    Course(CourseId),
}

/// Zone waiting for its course descriptor.
#[derive(Debug, Clone)]
struct PendingZone {
    handle: EntityHandle,
    kind: TriggerKind,
    zone: ZoneKind,
    number: u32,
    course_name: String,
}

/// Registry of timer triggers and courses for the current map.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    courses: CourseRegistry,
    /// Arena of descriptors; `None` marks a free slot
    triggers: Vec<Option<TriggerDescriptor>>,
    free: Vec<usize>,
    /// Entity index to arena slot
    by_index: HashMap<u32, usize>,
    pending: Vec<PendingZone>,
    capacity: usize,
    max_zone_number: u32,
    sealed: bool,
}

impl ZoneRegistry {
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            courses: CourseRegistry::with_capacity(config.max_courses, config.max_course_name_len),
            triggers: Vec::new(),
            free: Vec::new(),
            by_index: HashMap::new(),
            pending: Vec::new(),
            capacity: config.max_triggers,
            max_zone_number: config.max_zone_number,
            sealed: false,
        }
    }

    /// Forget every trigger and course. Called once per map load.
    pub fn initialize(&mut self) {
        self.courses.clear();
        self.triggers.clear();
        self.free.clear();
        self.by_index.clear();
        self.pending.clear();
        self.sealed = false;
        debug!("Zone registry initialized");
    }

    pub fn courses(&self) -> &CourseRegistry {
        &self.courses
    }

    /// Register a course directly, without a descriptor entity.
    pub fn register_course(
        &mut self,
        name: &str,
        split_count: u32,
        checkpoint_count: u32,
        stage_count: u32,
        disable_checkpoints: bool,
    ) -> Result<CourseId> {
        self.courses.register(name, split_count, checkpoint_count, stage_count, disable_checkpoints)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Number of registered triggers.
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Classify a spawned entity and register it.
    ///
    /// Returns `Ok(None)` for entities the timer does not care about. Errors
    /// leave the entity unregistered and are logged here as well.
    pub fn on_entity_spawned(&mut self, spawn: &EntitySpawn) -> Result<Option<SpawnOutcome>> {
        let classname = spawn.classname.as_str();
        let result = if classname.eq_ignore_ascii_case(TRIGGER_CLASSNAME) {
            if spawn.keyvalues.contains(KEY_TRIGGER_TYPE) {
                self.register_trigger(spawn).map(Some)
            } else {
                Ok(None)
            }
        } else if classname.eq_ignore_ascii_case(COURSE_DESCRIPTOR_CLASSNAME) {
            self.register_course_descriptor(spawn)
        } else {
            Ok(None)
        };

        if let Err(e) = &result {
            warn!(handle = %spawn.handle, classname = %spawn.classname, "Entity not registered: {}", e);
        }
        result
    }

    /// Resolve parked zones and fix course zone counts.
    ///
    /// Returns one error per zone that had to be dropped.
    pub fn finish_setup(&mut self) -> Vec<MappingError> {
        let mut errors = Vec::new();

        for zone in std::mem::take(&mut self.pending) {
            let Some(course) = self.courses.find(&zone.course_name).map(|c| c.id) else {
                let err = MappingError::unknown_course(zone.course_name.clone()).with_handle(zone.handle);
                warn!(handle = %zone.handle, "Zone dropped: {}", err);
                errors.push(err);
                continue;
            };
            let info = ZoneInfo { course, kind: zone.zone, number: zone.number };
            if let Err(e) = self.insert_zone(zone.handle, zone.kind, info) {
                warn!(handle = %zone.handle, "Zone dropped: {}", e);
                errors.push(e);
            }
        }

        for course in self.courses.iter() {
            let has = |kind: ZoneKind| {
                self.triggers.iter().flatten().any(|t| {
                    t.zone().is_some_and(|z| z.course == course.id && z.kind == kind)
                })
            };
            if !has(ZoneKind::Start) || !has(ZoneKind::End) {
                warn!(course = %course.name, "Course has no start or no end zone");
            }
        }

        self.sealed = true;
        info!(
            triggers = self.len(),
            courses = self.courses.len(),
            dropped = errors.len(),
            "Map setup finished"
        );
        errors
    }

    /// Forget a destroyed entity. Ignored if the serial does not match.
    pub fn on_entity_removed(&mut self, handle: EntityHandle) {
        self.pending.retain(|zone| zone.handle != handle);

        let Some(&slot) = self.by_index.get(&handle.index) else {
            return;
        };
        let matches = self.triggers.get(slot).and_then(|t| t.as_ref()).is_some_and(|t| t.handle == handle);
        if matches {
            self.release_slot(handle.index, slot);
            trace!(handle = %handle, "Trigger removed");
        }
    }

    /// Look up a live trigger.
    ///
    /// Validates the serial and asks `world` whether the entity still exists
    /// on every call.
    pub fn resolve_trigger(&self, handle: EntityHandle, world: &dyn EntityWorld) -> Option<&TriggerDescriptor> {
        let slot = *self.by_index.get(&handle.index)?;
        let descriptor = self.triggers.get(slot)?.as_ref()?;
        if descriptor.handle != handle {
            trace!(handle = %handle, stored = %descriptor.handle, "Stale trigger handle");
            return None;
        }
        if !world.is_live(handle) {
            trace!(handle = %handle, "Trigger entity no longer live");
            return None;
        }
        Some(descriptor)
    }

    /// True if `handle` resolves to a live start, end, split, checkpoint or stage zone.
    pub fn is_timer_zone(&self, handle: EntityHandle, world: &dyn EntityWorld) -> bool {
        self.resolve_trigger(handle, world).is_some_and(|t| t.kind.is_zone())
    }

    /// Resolve a zone trigger together with its course.
    pub fn resolve_zone(&self, handle: EntityHandle, world: &dyn EntityWorld) -> Option<(ZoneInfo, &Course)> {
        let zone = *self.resolve_trigger(handle, world)?.zone()?;
        let course = self.courses.get(zone.course)?;
        Some((zone, course))
    }

    fn register_course_descriptor(&mut self, spawn: &EntitySpawn) -> Result<Option<SpawnOutcome>> {
        let kv = &spawn.keyvalues;
        if !kv.bool_or(KEY_COURSE_DESCRIPTOR, false)? {
            return Ok(None);
        }

        let number = kv.int_or(KEY_COURSE_NUMBER, 0)?.max(0) as u32;
        let mut name = kv.string_or(KEY_COURSE_NAME, "");
        if name.is_empty() && number > 0 {
            name = format!("Course {}", number);
        }
        let disable_checkpoints = kv.bool_or(KEY_COURSE_DISABLE_CHECKPOINT, false)?;

        let id = self.courses.register_numbered(&name, number, 0, 0, 0, disable_checkpoints)?;

        // Zones already waiting for this course can be placed now.
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|zone| zone.course_name.trim().eq_ignore_ascii_case(&name));
        self.pending = waiting;
        for zone in ready {
            let info = ZoneInfo { course: id, kind: zone.zone, number: zone.number };
            if let Err(e) = self.insert_zone(zone.handle, zone.kind, info) {
                warn!(handle = %zone.handle, "Zone dropped: {}", e);
            }
        }

        Ok(Some(SpawnOutcome::Course(id)))
    }

    fn register_trigger(&mut self, spawn: &EntitySpawn) -> Result<SpawnOutcome> {
        let kv = &spawn.keyvalues;
        let handle = spawn.handle;
        let raw = kv.int_or(KEY_TRIGGER_TYPE, 0)?;
        let kind = TriggerKind::from_raw(raw)
            .ok_or(MappingError::UnknownTriggerKind { handle, value: raw })?;

        // A new entity in an occupied slot means the old one is gone.
        if let Some(&slot) = self.by_index.get(&handle.index) {
            self.release_slot(handle.index, slot);
        }
        self.pending.retain(|zone| !zone.handle.same_slot(&handle));

        let payload = match kind {
            TriggerKind::Modifier => {
                let mut flags = ModifierFlags::default();
                for &(key, flag) in modifier_flags::KEYVALUES {
                    flags.set(flag, kv.bool_or(key, false)?);
                }
                TriggerPayload::Modifier { flags }
            }
            TriggerKind::AntiBhop => TriggerPayload::AntiBhop {
                time: kv.float_or("timer_anti_bhop_time", DEFAULT_ANTI_BHOP_TIME)?.max(0.0),
            },
            kind if kind.is_teleport() => {
                let default_delay = if kind == TriggerKind::Teleport { 0.0 } else { DEFAULT_BHOP_TELEPORT_DELAY };
                TriggerPayload::Teleport(TeleportInfo {
                    destination: kv.string_or("timer_teleport_destination", ""),
                    delay: kv.float_or("timer_teleport_delay", default_delay)?.max(0.0),
                    use_dest_angles: kv.bool_or("timer_teleport_use_dest_angles", true)?,
                    reset_speed: kv.bool_or("timer_teleport_reset_speed", true)?,
                    reorient_player: kv.bool_or("timer_teleport_reorient_player", false)?,
                    relative: kv.bool_or("timer_teleport_relative", false)?,
                })
            }
            kind => match kind.zone_kind() {
                Some(zone) => return self.register_zone(spawn, kind, zone),
                None => TriggerPayload::None,
            },
        };

        self.check_capacity(handle)?;
        self.insert(TriggerDescriptor { handle, kind, payload });
        trace!(handle = %handle, ?kind, "Registered trigger");
        Ok(SpawnOutcome::Trigger(kind))
    }

    fn register_zone(&mut self, spawn: &EntitySpawn, kind: TriggerKind, zone: ZoneKind) -> Result<SpawnOutcome> {
        let kv = &spawn.keyvalues;
        let handle = spawn.handle;

        let number = match zone.number_key() {
            Some(key) => {
                let raw = kv.int_or(key, 0)?;
                if raw < 1 || raw > self.max_zone_number as i64 {
                    return Err(MappingError::InvalidZoneNumber {
                        handle,
                        kind: zone,
                        number: raw,
                        max: self.max_zone_number,
                    });
                }
                raw as u32
            }
            None => 0,
        };

        let course_name = kv.string_or(KEY_ZONE_COURSE, "");
        match self.courses.find(&course_name).map(|c| c.id) {
            Some(course) => {
                self.check_capacity(handle)?;
                self.insert_zone(handle, kind, ZoneInfo { course, kind: zone, number })?;
                Ok(SpawnOutcome::Trigger(kind))
            }
            None if self.sealed => Err(MappingError::unknown_course(course_name).with_handle(handle)),
            None => {
                self.check_capacity(handle)?;
                self.pending.push(PendingZone { handle, kind, zone, number, course_name });
                debug!(handle = %handle, zone = %zone, "Zone waiting for its course descriptor");
                Ok(SpawnOutcome::PendingZone(zone))
            }
        }
    }

    /// Store a zone whose course is known, growing the course's counts.
    fn insert_zone(&mut self, handle: EntityHandle, kind: TriggerKind, info: ZoneInfo) -> Result<()> {
        if info.kind.is_numbered() {
            if self.sealed {
                let course = self.courses.get(info.course).ok_or_else(|| MappingError::unknown_course("<unknown>"))?;
                if info.number > course.zone_count(info.kind) {
                    return Err(MappingError::SealedCourse {
                        course: course.name.clone(),
                        kind: info.kind,
                        number: info.number,
                    });
                }
            } else {
                self.courses.raise_count(info.course, info.kind, info.number);
            }
        }
        self.insert(TriggerDescriptor { handle, kind, payload: TriggerPayload::Zone(info) });
        trace!(handle = %handle, zone = %info.kind, number = info.number, "Registered zone");
        Ok(())
    }

    fn check_capacity(&self, handle: EntityHandle) -> Result<()> {
        if self.by_index.len() + self.pending.len() >= self.capacity {
            return Err(MappingError::TriggerCapacity { handle, capacity: self.capacity });
        }
        Ok(())
    }

    fn insert(&mut self, descriptor: TriggerDescriptor) {
        let index = descriptor.handle.index;
        let slot = match self.free.pop() {
            Some(slot) => {
                self.triggers[slot] = Some(descriptor);
                slot
            }
            None => {
                self.triggers.push(Some(descriptor));
                self.triggers.len() - 1
            }
        };
        self.by_index.insert(index, slot);
    }

    fn release_slot(&mut self, index: u32, slot: usize) {
        if let Some(entry) = self.triggers.get_mut(slot) {
            *entry = None;
            self.free.push(slot);
        }
        self.by_index.remove(&index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeWorld, course_descriptor, zone_spawn};
    use proptest::prelude::*;

    fn registry() -> ZoneRegistry {
        ZoneRegistry::new(&TimerConfig::default())
    }

    fn small_registry(max_triggers: usize) -> ZoneRegistry {
        ZoneRegistry::new(&TimerConfig { max_triggers, ..TimerConfig::default() })
    }

    #[test]
    fn zones_after_course_register_immediately() {
        let mut zones = registry();
        let world = FakeWorld::default();
        let course = course_descriptor(EntityHandle::new(1, 0), "main");
        let start = zone_spawn(EntityHandle::new(2, 0), TriggerKind::ZoneStart, "main", None);
        let cp = zone_spawn(EntityHandle::new(3, 0), TriggerKind::ZoneCheckpoint, "MAIN", Some(2));

        assert!(matches!(zones.on_entity_spawned(&course), Ok(Some(SpawnOutcome::Course(_)))));
        assert_eq!(zones.on_entity_spawned(&start).unwrap(), Some(SpawnOutcome::Trigger(TriggerKind::ZoneStart)));
        zones.on_entity_spawned(&cp).unwrap();

        assert!(zones.is_timer_zone(start.handle, &world));
        let (info, course) = zones.resolve_zone(cp.handle, &world).unwrap();
        assert_eq!(info.kind, ZoneKind::Checkpoint);
        assert_eq!(info.number, 2);
        assert_eq!(course.checkpoint_count, 2);
    }

    #[test]
    fn zones_before_course_wait_for_it() {
        let mut zones = registry();
        let world = FakeWorld::default();
        let stage = zone_spawn(EntityHandle::new(5, 0), TriggerKind::ZoneStage, "bonus", Some(3));

        assert_eq!(zones.on_entity_spawned(&stage).unwrap(), Some(SpawnOutcome::PendingZone(ZoneKind::Stage)));
        assert!(zones.resolve_trigger(stage.handle, &world).is_none());
        assert_eq!(zones.pending_len(), 1);

        zones.on_entity_spawned(&course_descriptor(EntityHandle::new(6, 0), "Bonus")).unwrap();
        assert_eq!(zones.pending_len(), 0);
        assert!(zones.finish_setup().is_empty());

        let (_, course) = zones.resolve_zone(stage.handle, &world).unwrap();
        assert_eq!(course.stage_count, 3);
    }

    #[test]
    fn unresolved_zones_are_reported_and_dropped() {
        let mut zones = registry();
        let world = FakeWorld::default();
        let orphan = zone_spawn(EntityHandle::new(9, 1), TriggerKind::ZoneEnd, "nowhere", None);
        zones.on_entity_spawned(&orphan).unwrap();

        let errors = zones.finish_setup();
        assert_eq!(errors, vec![MappingError::UnknownCourse { name: "nowhere".into(), handle: Some(orphan.handle) }]);
        assert!(zones.resolve_trigger(orphan.handle, &world).is_none());
        assert!(zones.is_sealed());

        // After sealing, unknown courses are rejected on the spot.
        let late = zone_spawn(EntityHandle::new(10, 0), TriggerKind::ZoneStart, "nowhere", None);
        assert!(matches!(zones.on_entity_spawned(&late), Err(MappingError::UnknownCourse { .. })));
    }

    #[test]
    fn sealed_counts_do_not_grow() {
        let mut zones = registry();
        zones.on_entity_spawned(&course_descriptor(EntityHandle::new(1, 0), "main")).unwrap();
        zones.on_entity_spawned(&zone_spawn(EntityHandle::new(2, 0), TriggerKind::ZoneSplit, "main", Some(1))).unwrap();
        zones.finish_setup();

        let late = zone_spawn(EntityHandle::new(3, 0), TriggerKind::ZoneSplit, "main", Some(2));
        assert!(matches!(zones.on_entity_spawned(&late), Err(MappingError::SealedCourse { number: 2, .. })));
        assert_eq!(zones.courses().find("main").unwrap().split_count, 1);
    }

    #[test]
    fn capacity_overflow_is_an_error() {
        let mut zones = small_registry(2);
        let kv: KeyValues = [("timer_trigger_type", "11")].into_iter().collect();
        for index in 0..2 {
            let spawn = EntitySpawn::new(EntityHandle::new(index, 0), TRIGGER_CLASSNAME, kv.clone());
            zones.on_entity_spawned(&spawn).unwrap();
        }
        let overflow = EntitySpawn::new(EntityHandle::new(2, 0), TRIGGER_CLASSNAME, kv);
        assert_eq!(
            zones.on_entity_spawned(&overflow),
            Err(MappingError::TriggerCapacity { handle: overflow.handle, capacity: 2 })
        );
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn zone_numbers_are_bounds_checked() {
        let mut zones = registry();
        zones.on_entity_spawned(&course_descriptor(EntityHandle::new(1, 0), "main")).unwrap();
        for number in [0, 101] {
            let spawn = zone_spawn(EntityHandle::new(2, 0), TriggerKind::ZoneCheckpoint, "main", Some(number));
            assert!(matches!(zones.on_entity_spawned(&spawn), Err(MappingError::InvalidZoneNumber { .. })));
        }
        let missing = zone_spawn(EntityHandle::new(3, 0), TriggerKind::ZoneStage, "main", None);
        assert!(matches!(zones.on_entity_spawned(&missing), Err(MappingError::InvalidZoneNumber { number: 0, .. })));
    }

    #[test]
    fn payloads_follow_kind() {
        let mut zones = registry();
        let world = FakeWorld::default();

        let modifier: KeyValues = [
            ("timer_trigger_type", "1"),
            ("timer_modifier_disable_pause", "1"),
            ("timer_modifier_enable_slide", "true"),
        ]
        .into_iter()
        .collect();
        let anti_bhop: KeyValues = [("timer_trigger_type", "4")].into_iter().collect();
        let bhop: KeyValues = [("timer_trigger_type", "12"), ("timer_teleport_destination", "dest_1")]
            .into_iter()
            .collect();

        let handles = [EntityHandle::new(1, 0), EntityHandle::new(2, 0), EntityHandle::new(3, 0)];
        for (handle, kv) in handles.iter().zip([modifier, anti_bhop, bhop]) {
            zones.on_entity_spawned(&EntitySpawn::new(*handle, TRIGGER_CLASSNAME, kv)).unwrap();
        }

        let flags = zones.resolve_trigger(handles[0], &world).unwrap().modifier_flags().unwrap();
        assert!(flags.disables_pause());
        assert!(flags.has_flag(modifier_flags::ENABLE_SLIDE));
        assert!(!flags.disables_checkpoints());

        let anti = zones.resolve_trigger(handles[1], &world).unwrap();
        assert_eq!(anti.anti_bhop_time(), Some(DEFAULT_ANTI_BHOP_TIME));
        assert!(!zones.is_timer_zone(handles[1], &world));

        let teleport = zones.resolve_trigger(handles[2], &world).unwrap().teleport().unwrap();
        assert_eq!(teleport.destination, "dest_1");
        assert_eq!(teleport.delay, DEFAULT_BHOP_TELEPORT_DELAY);
        assert!(teleport.use_dest_angles && teleport.reset_speed);
    }

    #[test]
    fn unknown_kinds_and_plain_entities() {
        let mut zones = registry();
        let bad: KeyValues = [("timer_trigger_type", "42")].into_iter().collect();
        let spawn = EntitySpawn::new(EntityHandle::new(1, 0), TRIGGER_CLASSNAME, bad);
        assert!(matches!(zones.on_entity_spawned(&spawn), Err(MappingError::UnknownTriggerKind { value: 42, .. })));

        let plain = EntitySpawn::new(EntityHandle::new(2, 0), TRIGGER_CLASSNAME, KeyValues::new());
        assert_eq!(zones.on_entity_spawned(&plain), Ok(None));

        let light = EntitySpawn::new(EntityHandle::new(3, 0), "light", KeyValues::new());
        assert_eq!(zones.on_entity_spawned(&light), Ok(None));

        let target = EntitySpawn::new(EntityHandle::new(4, 0), COURSE_DESCRIPTOR_CLASSNAME, KeyValues::new());
        assert_eq!(zones.on_entity_spawned(&target), Ok(None));
    }

    #[test]
    fn classnames_match_ignoring_case() {
        let mut zones = registry();
        let course: KeyValues = [("timer_course_descriptor", "1"), ("timer_course_name", "Main")].into_iter().collect();
        let outcome = zones
            .on_entity_spawned(&EntitySpawn::new(EntityHandle::new(1, 0), "Info_Target_Server_Only", course))
            .unwrap();
        assert!(matches!(outcome, Some(SpawnOutcome::Course(_))));

        let start: KeyValues = [("timer_trigger_type", "5"), ("timer_zone_course_descriptor", "Main")].into_iter().collect();
        let outcome = zones.on_entity_spawned(&EntitySpawn::new(EntityHandle::new(2, 0), "TRIGGER_MULTIPLE", start)).unwrap();
        assert_eq!(outcome, Some(SpawnOutcome::Trigger(TriggerKind::ZoneStart)));
    }

    #[test]
    fn numbered_descriptor_gets_default_name() {
        let mut zones = registry();
        let kv: KeyValues = [("timer_course_descriptor", "1"), ("timer_course_number", "2")].into_iter().collect();
        zones
            .on_entity_spawned(&EntitySpawn::new(EntityHandle::new(1, 0), COURSE_DESCRIPTOR_CLASSNAME, kv))
            .unwrap();
        let course = zones.courses().find("course 2").unwrap();
        assert_eq!(course.number, 2);
    }

    #[test]
    fn dead_and_removed_entities_do_not_resolve() {
        let mut zones = registry();
        let mut world = FakeWorld::default();
        zones.on_entity_spawned(&course_descriptor(EntityHandle::new(1, 0), "main")).unwrap();
        let start = zone_spawn(EntityHandle::new(2, 0), TriggerKind::ZoneStart, "main", None);
        zones.on_entity_spawned(&start).unwrap();

        world.kill(start.handle);
        assert!(zones.resolve_trigger(start.handle, &world).is_none());
        world.revive(start.handle);
        assert!(zones.resolve_trigger(start.handle, &world).is_some());

        zones.on_entity_removed(EntityHandle::new(2, 7));
        assert!(zones.resolve_trigger(start.handle, &world).is_some());
        zones.on_entity_removed(start.handle);
        assert!(zones.resolve_trigger(start.handle, &world).is_none());
        assert!(zones.is_empty());
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut zones = registry();
        zones.on_entity_spawned(&course_descriptor(EntityHandle::new(1, 0), "main")).unwrap();
        zones.finish_setup();
        zones.initialize();
        zones.initialize();
        assert!(zones.courses().is_empty());
        assert!(zones.is_empty());
        assert!(!zones.is_sealed());
    }

    proptest! {
        #[test]
        fn prop_reused_slots_never_resolve_old_serials(index in 0u32..512, old in 0u32..100, bump in 1u32..100) {
            let mut zones = registry();
            let world = FakeWorld::default();
            let kv: KeyValues = [("timer_trigger_type", "11")].into_iter().collect();

            let first = EntityHandle::new(index, old);
            let second = EntityHandle::new(index, old + bump);
            zones.on_entity_spawned(&EntitySpawn::new(first, TRIGGER_CLASSNAME, kv.clone())).unwrap();
            zones.on_entity_spawned(&EntitySpawn::new(second, TRIGGER_CLASSNAME, kv)).unwrap();

            prop_assert!(zones.resolve_trigger(first, &world).is_none());
            prop_assert_eq!(zones.resolve_trigger(second, &world).map(|t| t.handle), Some(second));
            prop_assert_eq!(zones.len(), 1);
        }
    }
}
