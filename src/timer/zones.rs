//! Per-run zone time slots and zone entry transitions

use tracing::{error, trace};

use super::{PlayerTimer, TimerServices};
use crate::course::Course;
use crate::feedback::{Message, SoundCue};
use crate::host::Env;
use crate::types::ZoneKind;

/// Marker for a zone slot not reached in the current run.
pub const UNREACHED: f64 = -1.0;

/// Run times for one zone kind. Slot `n - 1` holds zone number `n`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneTimes(Vec<f64>);

impl ZoneTimes {
    /// Resize to `count` slots, all unreached.
    pub fn reset(&mut self, count: u32) {
        self.0.clear();
        self.0.resize(count as usize, UNREACHED);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Time recorded for zone `number`, if it was reached.
    pub fn get(&self, number: u32) -> Option<f64> {
        let index = (number as usize).checked_sub(1)?;
        self.0.get(index).copied().filter(|&t| t != UNREACHED)
    }

    pub fn is_reached(&self, number: u32) -> bool {
        self.get(number).is_some()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn contains(&self, number: u32) -> bool {
        number >= 1 && (number as usize) <= self.0.len()
    }

    /// Record `time` for zone `number` unless it already holds a time.
    ///
    /// Returns true if this call recorded the time.
    fn record_first(&mut self, number: u32, time: f64) -> bool {
        match self.0.get_mut(number as usize - 1) {
            Some(slot) if *slot == UNREACHED => {
                *slot = time;
                true
            }
            _ => false,
        }
    }
}

/// Zone number outside the course's declared count: the mapping data and the
/// run arrays disagree.
fn out_of_bounds(kind: ZoneKind, number: u32, course: &Course, len: usize) {
    error!(course = %course.name, zone = %kind, number, slots = len, "Zone number out of bounds");
    debug_assert!(false, "{kind} zone {number} outside {len} slots of course '{}'", course.name);
}

impl PlayerTimer {
    fn is_timing(&self, course: &Course) -> bool {
        self.run.running && self.run.course == Some(course.id)
    }

    pub fn split_zone_enter(&mut self, env: &mut Env<'_>, _services: &TimerServices<'_>, course: &Course, number: u32) {
        if !self.is_timing(course) {
            return;
        }
        if !self.run.splits.contains(number) {
            out_of_bounds(ZoneKind::Split, number, course, self.run.splits.len());
            return;
        }
        if self.run.splits.record_first(number, self.run.time) {
            trace!(player = %self.slot, split = number, time = self.run.time, "Split reached");
            env.feedback.play_sound(self.slot, SoundCue::Split);
        }
    }

    pub fn checkpoint_zone_enter(&mut self, env: &mut Env<'_>, _services: &TimerServices<'_>, course: &Course, number: u32) {
        if !self.is_timing(course) {
            return;
        }
        if !self.run.checkpoints.contains(number) {
            out_of_bounds(ZoneKind::Checkpoint, number, course, self.run.checkpoints.len());
            return;
        }
        if self.run.checkpoints.record_first(number, self.run.time) {
            self.run.reached_checkpoints += 1;
            trace!(player = %self.slot, checkpoint = number, time = self.run.time, "Checkpoint reached");
            env.feedback.play_sound(self.slot, SoundCue::Checkpoint);
        }
    }

    pub fn stage_zone_enter(&mut self, env: &mut Env<'_>, _services: &TimerServices<'_>, course: &Course, number: u32) {
        if !self.is_timing(course) {
            return;
        }
        let expected = self.run.current_stage + 1;
        if number > expected {
            env.feedback.play_sound(self.slot, SoundCue::MissedZone);
            env.feedback.message(self.slot, Message::StageSkipped { stage: expected });
            return;
        }
        if number < expected {
            return;
        }
        if !self.run.stages.contains(number) {
            out_of_bounds(ZoneKind::Stage, number, course, self.run.stages.len());
            return;
        }
        self.run.stages.record_first(number, self.run.time);
        self.run.current_stage = number;
        trace!(player = %self.slot, stage = number, time = self.run.time, "Stage reached");
        env.feedback.play_sound(self.slot, SoundCue::Stage);
    }
}
