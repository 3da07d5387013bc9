//! Typed chat messages and sound cues sent to players
//!
//! The host localizes messages by [`Message::key`]; the `Display` impl gives
//! the default English text with arguments filled in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat message raised by a timer transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// End zone touched before reaching the given stage
    MissedStage { stage: u32 },
    /// End zone touched with checkpoint zones still missing
    MissedCheckpoints { missed: u32 },
    /// Stage zone touched out of order; `stage` is the one expected next
    StageSkipped { stage: u32 },
    AlreadyPaused,
    PauseDisabled,
    CantPauseJustResumed,
    CantPauseMidair,
    CantResumeJustPaused,
    /// A listener refused the pause
    CantPause,
    /// A listener refused the resume
    CantResume,
}

impl Message {
    /// Localization key for the phrase file.
    pub fn key(&self) -> &'static str {
        match self {
            Message::MissedStage { .. } => "Can't Finish Run (Missed Stage)",
            Message::MissedCheckpoints { missed: 1 } => "Can't Finish Run (Missed a Checkpoint Zone)",
            Message::MissedCheckpoints { .. } => "Can't Finish Run (Missed Checkpoint Zones)",
            Message::StageSkipped { .. } => "Can't Reach Stage (Missed Previous Stage)",
            Message::AlreadyPaused => "Can't Pause (Already Paused)",
            Message::PauseDisabled => "Can't Pause (Disabled)",
            Message::CantPauseJustResumed => "Can't Pause (Just Resumed)",
            Message::CantPauseMidair => "Can't Pause (Midair)",
            Message::CantResumeJustPaused => "Can't Resume (Just Paused)",
            Message::CantPause => "Can't Pause (Generic)",
            Message::CantResume => "Can't Resume (Generic)",
        }
    }

    /// Numeric arguments substituted into the localized phrase.
    pub fn args(&self) -> Vec<u32> {
        match self {
            Message::MissedStage { stage } | Message::StageSkipped { stage } => vec![*stage],
            Message::MissedCheckpoints { missed } => vec![*missed],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::MissedStage { stage } => {
                write!(f, "Can't finish run, you missed stage {}.", stage)
            }
            Message::MissedCheckpoints { missed: 1 } => {
                f.write_str("Can't finish run, you missed a checkpoint zone.")
            }
            Message::MissedCheckpoints { missed } => {
                write!(f, "Can't finish run, you missed {} checkpoint zones.", missed)
            }
            Message::StageSkipped { stage } => {
                write!(f, "You must reach stage {} first.", stage)
            }
            Message::AlreadyPaused => f.write_str("You are already paused."),
            Message::PauseDisabled => f.write_str("Pausing is disabled here."),
            Message::CantPauseJustResumed => f.write_str("You can't pause so soon after resuming."),
            Message::CantPauseMidair => f.write_str("You can't pause in mid-air."),
            Message::CantResumeJustPaused => f.write_str("You can't resume so soon after pausing."),
            Message::CantPause => f.write_str("You can't pause right now."),
            Message::CantResume => f.write_str("You can't resume right now."),
        }
    }
}

/// Sound cue played for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    TimerStart,
    TimerEnd,
    TimerStop,
    /// End zone touched without a matching run
    FalseEnd,
    Split,
    Checkpoint,
    Stage,
    MissedZone,
    Error,
}

impl SoundCue {
    /// Sound event name in the host sound manifest.
    pub fn key(&self) -> &'static str {
        match self {
            SoundCue::TimerStart => "kz.timer.start",
            SoundCue::TimerEnd => "kz.timer.end",
            SoundCue::TimerStop => "kz.timer.stop",
            SoundCue::FalseEnd => "kz.timer.false_end",
            SoundCue::Split => "kz.zone.split",
            SoundCue::Checkpoint => "kz.zone.checkpoint",
            SoundCue::Stage => "kz.zone.stage",
            SoundCue::MissedZone => "kz.zone.missed",
            SoundCue::Error => "kz.error",
        }
    }
}

/// Format a run time for chat and logs.
///
/// Precise output is `MM:SS.mmm`, otherwise `M:SS`. Hours are prefixed once
/// the time reaches an hour. Times are rounded to the millisecond first.
pub fn format_time(time: f64, precise: bool) -> String {
    let total_ms = (time.max(0.0) * 1000.0).round() as u64;
    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    match (hours, precise) {
        (0, true) => format!("{:02}:{:02}.{:03}", minutes, seconds, millis),
        (0, false) => format!("{}:{:02}", minutes, seconds),
        (_, true) => format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis),
        (_, false) => format!("{}:{:02}:{:02}", hours, minutes, seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missed_checkpoints_pluralizes() {
        let one = Message::MissedCheckpoints { missed: 1 };
        let many = Message::MissedCheckpoints { missed: 3 };
        assert!(one.to_string().contains("missed a checkpoint zone"));
        assert!(many.to_string().contains("missed 3 checkpoint zones"));
        assert_ne!(one.key(), many.key());
        assert_eq!(many.args(), vec![3]);
    }

    #[test]
    fn format_time_under_an_hour() {
        assert_eq!(format_time(0.0, true), "00:00.000");
        assert_eq!(format_time(65.4321, true), "01:05.432");
        assert_eq!(format_time(65.4321, false), "1:05");
        assert_eq!(format_time(9.9996, true), "00:10.000");
    }

    #[test]
    fn format_time_with_hours() {
        assert_eq!(format_time(3600.0, true), "1:00:00.000");
        assert_eq!(format_time(3725.5, false), "1:02:05");
        assert_eq!(format_time(36_000.25, true), "10:00:00.250");
    }

    #[test]
    fn format_time_clamps_negative_input() {
        assert_eq!(format_time(-3.0, true), "00:00.000");
    }

    #[test]
    fn every_cue_has_a_key() {
        for cue in [
            SoundCue::TimerStart,
            SoundCue::TimerEnd,
            SoundCue::TimerStop,
            SoundCue::FalseEnd,
            SoundCue::Split,
            SoundCue::Checkpoint,
            SoundCue::Stage,
            SoundCue::MissedZone,
            SoundCue::Error,
        ] {
            assert!(cue.key().starts_with("kz."));
        }
    }
}
