//! Timer lifecycle observers
//!
//! Other subsystems (records, HUD, replays, anticheat) watch runs by
//! registering a [`TimerListener`] with the [`ListenerRegistry`] owned by
//! [`TimerSystem`](crate::TimerSystem). Pre-hooks return `false` to veto a
//! transition; every listener is asked and the results are ANDed, so each one
//! sees every attempt even after an earlier listener has refused it.
//! Post-hooks are notifications only.
//!
//! The list is changed only while plugins load or unload, never while a tick
//! is being processed.

use std::sync::Arc;
use tracing::debug;

use crate::course::{Course, CourseId};
use crate::types::PlayerSlot;

/// Observer of timer lifecycle events. Every method has a permissive default.
#[allow(unused_variables)]
pub trait TimerListener: Send + Sync {
    fn on_timer_start(&self, player: PlayerSlot, course: &Course) -> bool {
        true
    }

    fn on_timer_start_post(&self, player: PlayerSlot, course: &Course) {}

    fn on_timer_end(&self, player: PlayerSlot, course: &Course, time: f64) -> bool {
        true
    }

    fn on_timer_end_post(&self, player: PlayerSlot, course: &Course, time: f64) {}

    fn on_timer_stopped(&self, player: PlayerSlot, course: Option<CourseId>) {}

    fn on_pause(&self, player: PlayerSlot) -> bool {
        true
    }

    fn on_pause_post(&self, player: PlayerSlot) {}

    fn on_resume(&self, player: PlayerSlot) -> bool {
        true
    }

    fn on_resume_post(&self, player: PlayerSlot) {}

    fn on_timer_invalidated(&self, player: PlayerSlot) {}
}

/// Registered listeners, in registration order.
#[derive(Default, Clone)]
pub struct ListenerRegistry {
    listeners: Vec<Arc<dyn TimerListener>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry").field("len", &self.listeners.len()).finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Returns false if this exact listener is already registered.
    pub fn register(&mut self, listener: Arc<dyn TimerListener>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        debug!(count = self.listeners.len(), "Timer listener registered");
        true
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unregister(&mut self, listener: &Arc<dyn TimerListener>) -> bool {
        match self.listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(index) => {
                self.listeners.remove(index);
                debug!(count = self.listeners.len(), "Timer listener unregistered");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &Arc<dyn TimerListener>) -> bool {
        self.listeners.iter().any(|l| Arc::ptr_eq(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    fn all(&self, mut allow: impl FnMut(&dyn TimerListener) -> bool) -> bool {
        self.listeners.iter().fold(true, |allowed, l| allow(l.as_ref()) && allowed)
    }

    pub(crate) fn allow_start(&self, player: PlayerSlot, course: &Course) -> bool {
        self.all(|l| l.on_timer_start(player, course))
    }

    pub(crate) fn start_post(&self, player: PlayerSlot, course: &Course) {
        self.listeners.iter().for_each(|l| l.on_timer_start_post(player, course));
    }

    pub(crate) fn allow_end(&self, player: PlayerSlot, course: &Course, time: f64) -> bool {
        self.all(|l| l.on_timer_end(player, course, time))
    }

    pub(crate) fn end_post(&self, player: PlayerSlot, course: &Course, time: f64) {
        self.listeners.iter().for_each(|l| l.on_timer_end_post(player, course, time));
    }

    pub(crate) fn stopped(&self, player: PlayerSlot, course: Option<CourseId>) {
        self.listeners.iter().for_each(|l| l.on_timer_stopped(player, course));
    }

    pub(crate) fn allow_pause(&self, player: PlayerSlot) -> bool {
        self.all(|l| l.on_pause(player))
    }

    pub(crate) fn pause_post(&self, player: PlayerSlot) {
        self.listeners.iter().for_each(|l| l.on_pause_post(player));
    }

    pub(crate) fn allow_resume(&self, player: PlayerSlot) -> bool {
        self.all(|l| l.on_resume(player))
    }

    pub(crate) fn resume_post(&self, player: PlayerSlot) {
        self.listeners.iter().for_each(|l| l.on_resume_post(player));
    }

    pub(crate) fn invalidated(&self, player: PlayerSlot) {
        self.listeners.iter().for_each(|l| l.on_timer_invalidated(player));
    }
}
