//! Simulation clock stamp passed into every timer transition

/// Tick number and server time at which an event is processed.
///
/// Same-tick guards compare `tick`; cooldowns compare `time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStamp {
    /// Monotonic simulation tick counter
    pub tick: u64,
    /// Server time in seconds
    pub time: f64,
}

impl TickStamp {
    pub fn new(tick: u64, time: f64) -> Self {
        Self { tick, time }
    }

    /// Stamp for `tick` on a server running at a fixed `interval`.
    pub fn at_tick(tick: u64, interval: f64) -> Self {
        Self { tick, time: tick as f64 * interval }
    }

    /// Seconds elapsed since `earlier`, or `None` if `earlier` never happened.
    pub fn since(&self, earlier: Option<f64>) -> Option<f64> {
        earlier.map(|t| self.time - t)
    }

    /// True if `earlier` happened less than `cooldown` seconds ago.
    pub fn within(&self, earlier: Option<f64>, cooldown: f64) -> bool {
        self.since(earlier).is_some_and(|elapsed| elapsed < cooldown)
    }
}
