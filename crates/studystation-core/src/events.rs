//! Observable state changes.
//!
//! Every transition worth surfacing produces an [`Event`] value returned
//! from the operation that caused it. There is no bus and no background
//! thread: the caller (CLI, a GUI shell) forwards events to whatever wants
//! them -- notification sink, stdout, analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero. `break_earned_secs` is set when a focus
    /// interval finished and carries the configured duration of the break
    /// that was earned.
    ModeCompleted {
        mode: TimerMode,
        next_mode: TimerMode,
        completed_focus_sessions: u64,
        break_earned_secs: Option<u64>,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        from: TimerMode,
        to: TimerMode,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        at: DateTime<Utc>,
    },
    /// Break duration credited to the study accumulator.
    BreakEarned {
        duration_secs: u64,
        long: bool,
        at: DateTime<Utc>,
    },
    FocusModeEntered {
        at: DateTime<Utc>,
    },
    FocusModeExited {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// A study session was appended to the accumulator.
    SessionRecorded {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The active selection changed by explicit play or queue advance.
    TrackChanged {
        id: String,
        at: DateTime<Utc>,
    },
    /// The queue supplied the next item after the previous one ended.
    QueueAdvanced {
        id: String,
        remaining: usize,
        at: DateTime<Utc>,
    },
    /// Playback ended with nothing left to play.
    PlaybackStopped {
        at: DateTime<Utc>,
    },
    TaskCompleted {
        completed_tasks: u64,
        at: DateTime<Utc>,
    },
}
