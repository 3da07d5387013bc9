//! Error types for map setup and configuration.
//!
//! Timer rule refusals (a start outside the start zone, an end with missed
//! checkpoints, a pause in mid-air) are not errors: they come back as `false`
//! and are reported to the player through [`Feedback`](crate::Feedback).
//! [`MappingError`] is reserved for problems in the data a map ships with, or in
//! the server configuration, which a map author or operator has to fix.
//!
//! ## Error Categories
//!
//! - **Capacity Errors**: the trigger or course arena is full
//! - **Reference Errors**: a zone names a course that does not exist
//! - **Attribute Errors**: a keyvalue is missing, malformed or out of range
//! - **Config Errors**: the timer configuration failed to parse or validate
//!
//! ## Mapper Hints
//!
//! ```rust
//! use kztimer::MappingError;
//!
//! let error = MappingError::unknown_course("bonus 1");
//! if error.is_entity_local() {
//!     for hint in error.mapper_hints() {
//!         println!("  - {}", hint);
//!     }
//! }
//! ```

use thiserror::Error;

use crate::types::{EntityHandle, ZoneKind};

/// Result type alias for mapping and configuration operations.
pub type Result<T, E = MappingError> = std::result::Result<T, E>;

/// Main error type for map setup and configuration.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MappingError {
    #[error("Trigger capacity of {capacity} exceeded by entity {handle}")]
    TriggerCapacity { handle: EntityHandle, capacity: usize },

    #[error("Course capacity of {capacity} exceeded registering '{name}'")]
    CourseCapacity { name: String, capacity: usize },

    #[error("Course '{name}' is already registered")]
    DuplicateCourse { name: String },

    #[error("Invalid course name '{name}': {reason}")]
    InvalidCourseName { name: String, reason: String },

    #[error("Zone references unknown course '{name}'")]
    UnknownCourse { name: String, handle: Option<EntityHandle> },

    #[error("Unknown trigger type {value} on entity {handle}")]
    UnknownTriggerKind { handle: EntityHandle, value: i64 },

    #[error("{kind} zone number {number} on entity {handle} is outside 1..={max}")]
    InvalidZoneNumber { handle: EntityHandle, kind: ZoneKind, number: i64, max: u32 },

    #[error("Keyvalue '{key}' has invalid value '{value}'")]
    InvalidAttribute { key: String, value: String },

    #[error("Zone number {number} exceeds the sealed {kind} count of course '{course}'")]
    SealedCourse { course: String, kind: ZoneKind, number: u32 },

    #[error("Timer configuration error: {details}")]
    Config { details: String },
}

impl MappingError {
    /// Returns whether the error only affects the entity being registered.
    ///
    /// Entity-local errors drop that one trigger or course and let map setup
    /// carry on. Configuration errors affect every run on the server.
    pub fn is_entity_local(&self) -> bool {
        match self {
            MappingError::TriggerCapacity { .. } => true,
            MappingError::CourseCapacity { .. } => true,
            MappingError::DuplicateCourse { .. } => true,
            MappingError::InvalidCourseName { .. } => true,
            MappingError::UnknownCourse { .. } => true,
            MappingError::UnknownTriggerKind { .. } => true,
            MappingError::InvalidZoneNumber { .. } => true,
            MappingError::InvalidAttribute { .. } => true,
            MappingError::SealedCourse { .. } => true,
            MappingError::Config { .. } => false,
        }
    }

    /// Returns hints a map author can act on.
    pub fn mapper_hints(&self) -> Vec<&'static str> {
        match self {
            MappingError::TriggerCapacity { .. } => vec![
                "Merge adjacent trigger volumes of the same type",
                "Remove disabled timer triggers from the map",
            ],
            MappingError::CourseCapacity { .. } => vec![
                "Reduce the number of course descriptors in the map",
                "Check for course descriptors duplicated by prefabs",
            ],
            MappingError::DuplicateCourse { .. } => vec![
                "Give every course descriptor a unique timer_course_name",
                "Course names are compared case-insensitively",
            ],
            MappingError::InvalidCourseName { .. } => vec![
                "Set timer_course_name on the course descriptor",
                "Keep course names short",
            ],
            MappingError::UnknownCourse { .. } => vec![
                "Check timer_zone_course_descriptor spelling",
                "Add an info_target_server_only course descriptor for the course",
            ],
            MappingError::UnknownTriggerKind { .. } => vec![
                "Use a timer_trigger_type value from the mapping API",
                "Update the mapping API FGD",
            ],
            MappingError::InvalidZoneNumber { .. } => vec![
                "Number split, checkpoint and stage zones starting at 1",
                "Keep zone numbers within the server limit",
            ],
            MappingError::InvalidAttribute { .. } => vec![
                "Check the keyvalue type in the mapping API FGD",
                "Booleans accept 0, 1, true or false",
            ],
            MappingError::SealedCourse { .. } => vec![
                "Place every timer zone in the map file rather than spawning it later",
            ],
            MappingError::Config { .. } => vec![
                "Check the timer configuration file syntax",
                "Remove fields to fall back to their defaults",
            ],
        }
    }

    /// Helper constructor for unknown course references.
    pub fn unknown_course(name: impl Into<String>) -> Self {
        MappingError::UnknownCourse { name: name.into(), handle: None }
    }

    /// Helper constructor for malformed keyvalues.
    pub fn invalid_attribute(key: impl Into<String>, value: impl Into<String>) -> Self {
        MappingError::InvalidAttribute { key: key.into(), value: value.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        MappingError::Config { details: details.into() }
    }

    /// Attach the entity that raised a course reference error.
    pub fn with_handle(self, handle: EntityHandle) -> Self {
        match self {
            MappingError::UnknownCourse { name, .. } => {
                MappingError::UnknownCourse { name, handle: Some(handle) }
            }
            other => other,
        }
    }
}

impl From<serde_yaml_ng::Error> for MappingError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        MappingError::Config { details: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn error_messages_carry_their_context(
            name in "[a-zA-Z0-9 _]{1,32}",
            index in 0u32..4096,
            serial in 0u32..64,
            number in -10i64..1000,
            capacity in 1usize..4096,
        ) {
            let handle = EntityHandle::new(index, serial);

            let unknown = MappingError::unknown_course(name.clone()).with_handle(handle);
            prop_assert!(unknown.to_string().contains(&name));

            let full = MappingError::TriggerCapacity { handle, capacity };
            prop_assert!(full.to_string().contains(&capacity.to_string()));
            prop_assert!(full.to_string().contains(&index.to_string()));

            let bad_number = MappingError::InvalidZoneNumber {
                handle,
                kind: ZoneKind::Checkpoint,
                number,
                max: 100,
            };
            prop_assert!(bad_number.to_string().contains(&number.to_string()));
        }
    }

    #[test]
    fn with_handle_only_touches_course_references() {
        let handle = EntityHandle::new(12, 3);
        let err = MappingError::unknown_course("main").with_handle(handle);
        assert_eq!(err, MappingError::UnknownCourse { name: "main".into(), handle: Some(handle) });

        let other = MappingError::config("bad").with_handle(handle);
        assert!(matches!(other, MappingError::Config { .. }));
    }

    #[test]
    fn classification_and_hints() {
        assert!(MappingError::unknown_course("x").is_entity_local());
        assert!(!MappingError::config("x").is_entity_local());

        for err in [
            MappingError::unknown_course("x"),
            MappingError::invalid_attribute("timer_anti_bhop_time", "fast"),
            MappingError::config("x"),
        ] {
            let hints = err.mapper_hints();
            assert!(!hints.is_empty());
            assert!(hints.iter().all(|hint| hint.len() > 5));
        }
    }

    #[test]
    fn yaml_errors_become_config_errors() {
        let yaml_err = serde_yaml_ng::from_str::<u32>("[not a number").unwrap_err();
        let err: MappingError = yaml_err.into();
        assert!(matches!(err, MappingError::Config { .. }));
    }

    #[test]
    fn error_is_send_sync_static() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<MappingError>();
    }
}
