//! Timer configuration
//!
//! Server operators ship a YAML file; every field is optional and falls back
//! to the values KZ servers commonly run with.
//!
//! ```rust
//! use kztimer::TimerConfig;
//!
//! let config = TimerConfig::from_yaml("tick_interval: 0.0078125\npause_cooldown: 2.0\n").unwrap();
//! assert_eq!(config.pause_cooldown, 2.0);
//! assert_eq!(config.max_courses, 128);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::course::MAX_COURSES;
use crate::types::MoveType;
use crate::{MappingError, Result};

/// Tunables for the timer state machine and the zone registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
#[serde(default)]
pub struct TimerConfig {
    /// Seconds added to the run time per simulation tick
    pub tick_interval: f64,
    /// Minimum gap between two start sounds
    pub start_sound_cooldown: f64,
    /// Minimum time after a resume before the run can be paused again
    pub pause_cooldown: f64,
    /// Minimum time after a pause before the run can be resumed
    pub resume_cooldown: f64,
    /// Minimum gap between two false-end notifications
    pub false_end_cooldown: f64,
    /// Longest mode name a run may be tagged with
    pub max_mode_name_len: usize,
    /// Movement types a run may start in
    pub allowed_start_move_types: Vec<MoveType>,
    /// Trigger arena capacity
    pub max_triggers: usize,
    /// Course arena capacity
    pub max_courses: usize,
    /// Highest split, checkpoint or stage number per course
    pub max_zone_number: u32,
    /// Longest course name
    pub max_course_name_len: usize,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval: 1.0 / 64.0,
            start_sound_cooldown: 0.15,
            pause_cooldown: 1.0,
            resume_cooldown: 1.0,
            false_end_cooldown: 1.0,
            max_mode_name_len: 64,
            allowed_start_move_types: vec![MoveType::Walk, MoveType::Ladder],
            max_triggers: 2048,
            max_courses: 128,
            max_zone_number: 100,
            max_course_name_len: 64,
        }
    }
}

impl TimerConfig {
    /// Parse and validate a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: TimerConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        debug!(tick_interval = config.tick_interval, "Timer configuration loaded");
        Ok(config)
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("tick_interval", self.tick_interval),
            ("start_sound_cooldown", self.start_sound_cooldown),
            ("pause_cooldown", self.pause_cooldown),
            ("resume_cooldown", self.resume_cooldown),
            ("false_end_cooldown", self.false_end_cooldown),
        ];
        for (name, value) in intervals {
            if !value.is_finite() || value < 0.0 {
                return Err(MappingError::config(format!("{} must be a finite, non-negative number", name)));
            }
        }
        if self.tick_interval == 0.0 {
            return Err(MappingError::config("tick_interval must be positive"));
        }

        let capacities = [
            ("max_mode_name_len", self.max_mode_name_len),
            ("max_triggers", self.max_triggers),
            ("max_courses", self.max_courses),
            ("max_zone_number", self.max_zone_number as usize),
            ("max_course_name_len", self.max_course_name_len),
        ];
        for (name, value) in capacities {
            if value == 0 {
                return Err(MappingError::config(format!("{} must be at least 1", name)));
            }
        }

        if self.max_courses > MAX_COURSES {
            return Err(MappingError::config(format!("max_courses must be at most {}", MAX_COURSES)));
        }

        if self.allowed_start_move_types.is_empty() {
            return Err(MappingError::config("allowed_start_move_types must not be empty"));
        }

        Ok(())
    }

    pub fn allows_start_in(&self, move_type: MoveType) -> bool {
        self.allowed_start_move_types.contains(&move_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TimerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.allows_start_in(MoveType::Walk));
        assert!(config.allows_start_in(MoveType::Ladder));
        assert!(!config.allows_start_in(MoveType::Noclip));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = TimerConfig::from_yaml("max_triggers: 16\nallowed_start_move_types: [walk]\n")
            .expect("config should parse");
        assert_eq!(config.max_triggers, 16);
        assert_eq!(config.allowed_start_move_types, vec![MoveType::Walk]);
        assert_eq!(config.tick_interval, 1.0 / 64.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for yaml in [
            "tick_interval: 0.0\n",
            "pause_cooldown: -1.0\n",
            "max_courses: 0\n",
            "max_courses: 65537\n",
            "allowed_start_move_types: []\n",
        ] {
            let err = TimerConfig::from_yaml(yaml).unwrap_err();
            assert!(matches!(err, MappingError::Config { .. }), "{yaml} -> {err}");
        }
    }

    #[test]
    fn max_courses_accepts_full_id_range() {
        let config = TimerConfig::from_yaml("max_courses: 65536\n").expect("config should parse");
        assert_eq!(config.max_courses, MAX_COURSES);
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = TimerConfig::from_yaml("tick_interval: [").unwrap_err();
        assert!(!err.is_entity_local());
    }
}
