//! Core types shared by the zone registry and the timer.
//!
//! ## Architecture
//!
//! - [`EntityHandle`] identifies a host entity by index and reuse serial
//! - [`PlayerSlot`] identifies a connected player
//! - [`TickStamp`] carries the simulation tick and server time of an event
//! - [`TriggerKind`] and [`ZoneKind`] classify mapping API trigger volumes
//! - [`ModifierFlags`] holds the flags of a movement modifier trigger
//! - [`MoveType`], [`Vec3`] and [`MovementSnapshot`] describe pawn movement state
//!
//! ## Usage Example
//!
//! ```rust
//! use kztimer::types::{TickStamp, TriggerKind, ZoneKind};
//!
//! let kind = TriggerKind::from_raw(8).unwrap();
//! assert_eq!(kind.zone_kind(), Some(ZoneKind::Checkpoint));
//!
//! let now = TickStamp::at_tick(128, 1.0 / 64.0);
//! assert!(now.within(Some(1.5), 1.0));
//! assert!(!now.within(None, 1.0));
//! ```

mod clock;
mod handle;
mod kinds;
mod modifier;
pub mod modifier_flags;
mod movement;

// Re-export all public types
pub use clock::TickStamp;
pub use handle::{EntityHandle, PlayerSlot};
pub use kinds::{TriggerKind, ZoneKind};
pub use modifier::ModifierFlags;
pub use movement::{MoveType, MovementSnapshot, Vec3};

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_trigger_kind_decoding_is_total(raw in -100i64..100) {
            match TriggerKind::from_raw(raw) {
                Some(kind) => {
                    prop_assert!((0..=13).contains(&raw));
                    prop_assert_eq!(kind as i64, raw);
                }
                None => prop_assert!(!(0..=13).contains(&raw)),
            }
        }

        #[test]
        fn prop_cooldown_window(
            start in 0.0f64..1000.0,
            elapsed in 0.0f64..10.0,
            cooldown in 0.01f64..5.0
        ) {
            let now = TickStamp::new(0, start + elapsed);
            prop_assert_eq!(now.within(Some(start), cooldown), elapsed < cooldown);
            prop_assert!(!now.within(None, cooldown));
        }

        #[test]
        fn prop_modifier_flag_operations(value in any::<u32>(), bit in 0..32u32) {
            let flags = ModifierFlags::new(value);
            prop_assert_eq!(flags.has_flag(1 << bit), (value & (1 << bit)) != 0);

            let mut toggled = flags;
            toggled.set(1 << bit, true);
            prop_assert!(toggled.has_flag(1 << bit));
            toggled.set(1 << bit, false);
            prop_assert!(!toggled.has_flag(1 << bit));
        }
    }

    #[test]
    fn zone_kinds_map_from_trigger_kinds() {
        assert_eq!(TriggerKind::ZoneStart.zone_kind(), Some(ZoneKind::Start));
        assert_eq!(TriggerKind::ZoneEnd.zone_kind(), Some(ZoneKind::End));
        assert_eq!(TriggerKind::ZoneSplit.zone_kind(), Some(ZoneKind::Split));
        assert_eq!(TriggerKind::ZoneStage.zone_kind(), Some(ZoneKind::Stage));
        assert!(!TriggerKind::Modifier.is_zone());
        assert!(!TriggerKind::Teleport.is_zone());
        assert!(TriggerKind::SequentialBhop.is_teleport());
    }

    #[test]
    fn numbered_zone_keys() {
        assert_eq!(ZoneKind::Stage.number_key(), Some("timer_zone_stage_number"));
        assert_eq!(ZoneKind::Start.number_key(), None);
        assert!(!ZoneKind::End.is_numbered());
    }

    #[test]
    fn modifier_helpers() {
        let flags = ModifierFlags::new(modifier_flags::DISABLE_PAUSE);
        assert!(flags.disables_pause());
        assert!(!flags.disables_checkpoints());
    }

    #[test]
    fn handles_compare_by_serial() {
        let a = EntityHandle::new(7, 1);
        let b = EntityHandle::new(7, 2);
        assert_ne!(a, b);
        assert!(a.same_slot(&b));
        assert_eq!(a.to_string(), "#7:1");
    }

    #[test]
    fn horizontal_speed_ignores_vertical() {
        let v = Vec3::new(3.0, 4.0, 100.0);
        assert!((v.horizontal_speed() - 5.0).abs() < f32::EPSILON);
    }
}
