//! Speedrun timer state machine and zone registry for KZ game servers.
//!
//! kztimer discovers timer trigger volumes and course descriptors from the
//! entities a map spawns, then drives one run timer per player from the zone
//! touches, ticks and movement events the host server reports.
//!
//! # Features
//!
//! - **Mapping API**: start, end, split, checkpoint and stage zones plus
//!   modifier, anti-bhop and teleport triggers, read from entity keyvalues
//! - **Run validation**: stage order, checkpoint coverage and anti-exploit
//!   start conditions
//! - **Pause/resume** with cooldowns in both directions
//! - **Listeners**: records, HUD and replay plugins observe and veto runs
//! - **Async handoff** of finished runs to storage through a tokio task
//!
//! The host implements three small traits ([`Pawn`], [`Feedback`],
//! [`EntityWorld`]) and forwards its events to a [`TimerSystem`].
//!
//! ## Example
//!
//! ```rust
//! use kztimer::{EntitySpawn, KeyValues, TimerConfig, TimerSystem};
//! use kztimer::types::{EntityHandle, PlayerSlot};
//!
//! let mut system = TimerSystem::new(TimerConfig::default());
//! let zones = system.zones_mut();
//!
//! let start: KeyValues = [("timer_trigger_type", "5"), ("timer_zone_course_descriptor", "Main")]
//!     .into_iter()
//!     .collect();
//! let course: KeyValues = [("timer_course_descriptor", "1"), ("timer_course_name", "Main")]
//!     .into_iter()
//!     .collect();
//!
//! // Zones may spawn before the course they belong to.
//! zones.on_entity_spawned(&EntitySpawn::new(EntityHandle::new(2, 0), "trigger_multiple", start)).unwrap();
//! zones.on_entity_spawned(&EntitySpawn::new(EntityHandle::new(1, 0), "info_target_server_only", course)).unwrap();
//! assert!(zones.finish_setup().is_empty());
//! assert!(zones.courses().find("main").is_some());
//!
//! system.on_player_connect(PlayerSlot(1));
//! assert!(!system.player(PlayerSlot(1)).unwrap().is_running());
//! ```

// Core types and error handling
pub mod config;
pub mod course;
mod error;
pub mod feedback;
pub mod host;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Map data
pub mod mapping;

// Run state machine and its observers
pub mod listener;
pub mod recorder;
pub mod system;
pub mod timer;

// Core exports
pub use config::TimerConfig;
pub use error::*;
pub use types::*;

pub use course::{Course, CourseId, CourseRegistry};
pub use feedback::{Message, SoundCue, format_time};
pub use host::{EntityWorld, Env, Feedback, Pawn, SilentFeedback};
pub use listener::{ListenerRegistry, TimerListener};
pub use mapping::{EntitySpawn, KeyValues, SpawnOutcome, TriggerDescriptor, ZoneRegistry};
pub use recorder::{CompletedRun, RecorderChannels, RunRecorder, RunSink, RunSubmitter};
pub use system::{TimerSystem, TouchOutcome};
pub use timer::{PlayerTimer, TimerServices, UNREACHED, ZoneTimes};
