//! Course definitions discovered from map data.
//!
//! Courses live in a bounded, index-based arena. A [`CourseId`] is only
//! meaningful for the map it was issued on; [`CourseRegistry::clear`] runs on
//! every map load and invalidates every id.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::ZoneKind;
use crate::{MappingError, Result};

/// Index of a course in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CourseId(pub u16);

/// A named run definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Course {
    pub id: CourseId,
    /// Unique name, compared case-insensitively
    pub name: String,
    /// Number set by the course descriptor, 0 when absent
    pub number: u32,
    pub split_count: u32,
    pub checkpoint_count: u32,
    pub stage_count: u32,
    /// Whether teleport checkpoints are disabled on this course
    pub disable_checkpoints: bool,
}

impl Course {
    /// Declared zone count for a numbered zone kind.
    pub fn zone_count(&self, kind: ZoneKind) -> u32 {
        match kind {
            ZoneKind::Split => self.split_count,
            ZoneKind::Checkpoint => self.checkpoint_count,
            ZoneKind::Stage => self.stage_count,
            ZoneKind::Start | ZoneKind::End => 0,
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Set of courses registered for the current map.
#[derive(Debug, Clone)]
pub struct CourseRegistry {
    courses: Vec<Course>,
    capacity: usize,
    max_name_len: usize,
}

/// Most courses a registry can hold; every id fits a [`CourseId`].
pub const MAX_COURSES: usize = u16::MAX as usize + 1;

impl CourseRegistry {
    /// `capacity` is clamped to [`MAX_COURSES`].
    pub fn with_capacity(capacity: usize, max_name_len: usize) -> Self {
        let capacity = capacity.min(MAX_COURSES);
        Self { courses: Vec::with_capacity(capacity.min(16)), capacity, max_name_len }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Register a course.
    ///
    /// Fails when the arena is full, the name is empty or too long, or a course
    /// with the same name (ignoring ASCII case) already exists.
    pub fn register(
        &mut self,
        name: &str,
        split_count: u32,
        checkpoint_count: u32,
        stage_count: u32,
        disable_checkpoints: bool,
    ) -> Result<CourseId> {
        self.register_numbered(name, 0, split_count, checkpoint_count, stage_count, disable_checkpoints)
    }

    pub(crate) fn register_numbered(
        &mut self,
        name: &str,
        number: u32,
        split_count: u32,
        checkpoint_count: u32,
        stage_count: u32,
        disable_checkpoints: bool,
    ) -> Result<CourseId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MappingError::InvalidCourseName {
                name: name.to_string(),
                reason: "name is empty".to_string(),
            });
        }
        if name.len() > self.max_name_len {
            return Err(MappingError::InvalidCourseName {
                name: name.to_string(),
                reason: format!("longer than {} bytes", self.max_name_len),
            });
        }
        if self.find(name).is_some() {
            return Err(MappingError::DuplicateCourse { name: name.to_string() });
        }
        if self.courses.len() >= self.capacity {
            return Err(MappingError::CourseCapacity {
                name: name.to_string(),
                capacity: self.capacity,
            });
        }

        let id = u16::try_from(self.courses.len()).map(CourseId).map_err(|_| MappingError::CourseCapacity {
            name: name.to_string(),
            capacity: self.capacity,
        })?;
        self.courses.push(Course {
            id,
            name: name.to_string(),
            number,
            split_count,
            checkpoint_count,
            stage_count,
            disable_checkpoints,
        });
        debug!(course = name, id = id.0, "Registered course");
        Ok(id)
    }

    /// Case-insensitive exact lookup.
    pub fn find(&self, name: &str) -> Option<&Course> {
        let name = name.trim();
        self.courses.iter().find(|course| course.matches_name(name))
    }

    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn clear(&mut self) {
        self.courses.clear();
    }

    /// Grow a course's declared count so that zone `number` fits.
    pub(crate) fn raise_count(&mut self, id: CourseId, kind: ZoneKind, number: u32) {
        let Some(course) = self.courses.get_mut(id.0 as usize) else {
            return;
        };
        let count = match kind {
            ZoneKind::Split => &mut course.split_count,
            ZoneKind::Checkpoint => &mut course.checkpoint_count,
            ZoneKind::Stage => &mut course.stage_count,
            ZoneKind::Start | ZoneKind::End => return,
        };
        *count = (*count).max(number);
    }
}
