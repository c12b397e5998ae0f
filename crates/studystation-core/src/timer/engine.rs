//! Pomodoro countdown engine.
//!
//! A wall-clock-based state machine: no internal threads, the caller
//! invokes `tick()` periodically. Remaining time is always recomputed from
//! the timestamp and time-left snapshot taken when the countdown was last
//! (re)started, never decremented per tick, so throttled or late ticks
//! cannot accumulate drift. A late tick clamps to zero and completes the
//! interval exactly once.
//!
//! ## State transitions
//!
//! ```text
//! {Focus, ShortBreak, LongBreak} x {Running, Paused}
//! start/pause flip the running axis; completion and skip advance the mode.
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::{SettingsUpdate, TimerSettings};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_break(self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

/// Reference point for the running countdown.
///
/// `time_left = snapshot_secs - elapsed_since(started_epoch_ms)`, clamped
/// at zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RunningClock {
    started_epoch_ms: u64,
    snapshot_secs: u64,
}

/// Pomodoro timer state machine.
///
/// Owns mode, remaining time, the running clock, and the completed-focus
/// counter. Mutated only through the methods below; every observable
/// transition returns an [`Event`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroEngine {
    mode: TimerMode,
    settings: TimerSettings,
    time_left_secs: u64,
    /// `Some` while running; `None` while paused.
    running: Option<RunningClock>,
    completed_focus_sessions: u64,
}

impl PomodoroEngine {
    /// Paused focus mode with a full countdown -- the post-reload state.
    ///
    /// `completed_focus_sessions` is restored from persistence; running
    /// state deliberately is not.
    pub fn new(settings: TimerSettings, completed_focus_sessions: u64) -> Self {
        Self {
            mode: TimerMode::Focus,
            time_left_secs: settings.duration_secs(TimerMode::Focus),
            settings,
            running: None,
            completed_focus_sessions,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn completed_focus_sessions(&self) -> u64 {
        self.completed_focus_sessions
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.settings.duration_secs(self.mode);
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.time_left_secs as f64 / total as f64)
    }

    /// Focus sessions remaining until the next long break.
    pub fn sessions_until_long_break(&self) -> u64 {
        let interval = u64::from(self.settings.long_break_interval);
        interval - (self.completed_focus_sessions % interval)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Paused -> Running. Records the wall-clock reference for drift-free
    /// recomputation. No-op while already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.running.is_some() {
            return None;
        }
        self.running = Some(RunningClock {
            started_epoch_ms: now_ms(),
            snapshot_secs: self.time_left_secs,
        });
        Some(Event::TimerStarted {
            mode: self.mode,
            duration_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Running -> Paused, freezing `time_left` at its recomputed value.
    /// No-op while paused.
    pub fn pause(&mut self) -> Option<Event> {
        let clock = self.running.take()?;
        self.time_left_secs = remaining(clock, now_ms());
        Some(Event::TimerPaused {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.running.is_some() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Recompute remaining time; returns `Some(Event::ModeCompleted)` when
    /// the countdown reaches zero. Call periodically while running.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        let clock = self.running?;
        self.time_left_secs = remaining(clock, now_ms);
        if self.time_left_secs == 0 {
            return Some(self.complete_at(now_ms));
        }
        None
    }

    /// Advance past the current mode without completing it: no counter
    /// increment, no break credit, always lands paused.
    pub fn skip(&mut self) -> Event {
        let from = self.mode;
        let to = match self.mode {
            TimerMode::Focus => self.break_kind_after(self.completed_focus_sessions + 1),
            _ => TimerMode::Focus,
        };
        self.enter_mode(to);
        Event::TimerSkipped {
            from,
            to,
            at: Utc::now(),
        }
    }

    /// Explicit mode override: full countdown for `mode`, paused.
    pub fn change_mode(&mut self, mode: TimerMode) -> Event {
        self.enter_mode(mode);
        Event::ModeChanged {
            mode,
            duration_secs: self.time_left_secs,
            at: Utc::now(),
        }
    }

    /// Apply a partial settings update (invalid fields dropped, see
    /// [`TimerSettings::apply`]). A paused countdown whose mode duration
    /// changed is reset to the new duration; a running countdown is left
    /// untouched.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> Option<Event> {
        let old_duration = self.settings.duration_secs(self.mode);
        if !self.settings.apply(update) {
            return None;
        }
        let new_duration = self.settings.duration_secs(self.mode);
        if self.running.is_none() && new_duration != old_duration {
            self.time_left_secs = new_duration;
        }
        Some(Event::SettingsUpdated { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_at(&mut self, now_ms: u64) -> Event {
        let finished = self.mode;
        let (next, break_earned_secs) = match finished {
            TimerMode::Focus => {
                self.completed_focus_sessions += 1;
                let next = self.break_kind_after(self.completed_focus_sessions);
                (next, Some(self.settings.duration_secs(next)))
            }
            _ => (TimerMode::Focus, None),
        };

        let auto_started = match finished {
            TimerMode::Focus => self.settings.auto_start_breaks,
            _ => self.settings.auto_start_focus,
        };

        self.enter_mode(next);
        if auto_started {
            self.running = Some(RunningClock {
                started_epoch_ms: now_ms,
                snapshot_secs: self.time_left_secs,
            });
        }

        Event::ModeCompleted {
            mode: finished,
            next_mode: next,
            completed_focus_sessions: self.completed_focus_sessions,
            break_earned_secs,
            auto_started,
            at: Utc::now(),
        }
    }

    fn break_kind_after(&self, completed: u64) -> TimerMode {
        if completed % u64::from(self.settings.long_break_interval) == 0 {
            TimerMode::LongBreak
        } else {
            TimerMode::ShortBreak
        }
    }

    fn enter_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.time_left_secs = self.settings.duration_secs(mode);
        self.running = None;
    }
}

fn remaining(clock: RunningClock, now_ms: u64) -> u64 {
    let elapsed_secs = now_ms.saturating_sub(clock.started_epoch_ms) / 1000;
    clock.snapshot_secs.saturating_sub(elapsed_secs)
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PomodoroEngine {
        PomodoroEngine::new(TimerSettings::default(), 0)
    }

    fn started_at(e: &PomodoroEngine) -> u64 {
        e.running.expect("engine should be running").started_epoch_ms
    }

    #[test]
    fn initial_state_is_paused_focus() {
        let e = engine();
        assert_eq!(e.mode(), TimerMode::Focus);
        assert!(!e.is_running());
        assert_eq!(e.time_left_secs(), 25 * 60);
    }

    #[test]
    fn start_pause_toggle() {
        let mut e = engine();
        assert!(matches!(e.start(), Some(Event::TimerStarted { .. })));
        assert!(e.is_running());
        assert!(e.start().is_none());

        assert!(matches!(e.pause(), Some(Event::TimerPaused { .. })));
        assert!(!e.is_running());
        assert!(e.pause().is_none());

        assert!(e.toggle().is_some());
        assert!(e.is_running());
    }

    #[test]
    fn tick_recomputes_from_wall_clock() {
        let mut e = engine();
        e.start();
        let t0 = started_at(&e);

        assert!(e.tick_at(t0 + 10_000).is_none());
        assert_eq!(e.time_left_secs(), 25 * 60 - 10);

        // A repeated tick at the same instant must not decrement again.
        assert!(e.tick_at(t0 + 10_000).is_none());
        assert_eq!(e.time_left_secs(), 25 * 60 - 10);
    }

    #[test]
    fn late_tick_clamps_to_zero_and_completes_once() {
        let mut e = engine();
        e.start();
        let t0 = started_at(&e);

        // Run down to 5 seconds left.
        e.tick_at(t0 + (25 * 60 - 5) * 1000);
        assert_eq!(e.time_left_secs(), 5);

        // One tick arriving 6 wall-clock seconds later: clamp, complete.
        let event = e.tick_at(t0 + (25 * 60 + 1) * 1000);
        match event {
            Some(Event::ModeCompleted {
                mode,
                next_mode,
                break_earned_secs,
                ..
            }) => {
                assert_eq!(mode, TimerMode::Focus);
                assert_eq!(next_mode, TimerMode::ShortBreak);
                assert_eq!(break_earned_secs, Some(5 * 60));
            }
            other => panic!("expected ModeCompleted, got {other:?}"),
        }
        assert_eq!(e.completed_focus_sessions(), 1);

        // auto_start_breaks is on by default: break is running with a fresh
        // clock, so an immediate tick must not re-complete.
        assert!(e.is_running());
        let t1 = started_at(&e);
        assert!(e.tick_at(t1).is_none());
        assert_eq!(e.time_left_secs(), 5 * 60);
    }

    #[test]
    fn long_break_every_fourth_focus_completion() {
        let mut e = engine();

        for round in 1..=4u64 {
            // Finish any auto-started break first.
            if e.mode().is_break() {
                if !e.is_running() {
                    e.start();
                }
                let t = started_at(&e);
                e.tick_at(t + e.time_left_secs() * 1000);
            }
            assert_eq!(e.mode(), TimerMode::Focus);
            e.start();
            let t = started_at(&e);
            let event = e.tick_at(t + 25 * 60 * 1000).unwrap();
            match event {
                Event::ModeCompleted { next_mode, .. } => {
                    if round == 4 {
                        assert_eq!(next_mode, TimerMode::LongBreak);
                    } else {
                        assert_eq!(next_mode, TimerMode::ShortBreak);
                    }
                }
                other => panic!("expected ModeCompleted, got {other:?}"),
            }
            assert_eq!(e.completed_focus_sessions(), round);
        }
    }

    #[test]
    fn break_completion_returns_to_focus_without_credit() {
        let mut e = engine();
        e.change_mode(TimerMode::ShortBreak);
        e.start();
        let t = started_at(&e);
        let event = e.tick_at(t + 5 * 60 * 1000).unwrap();
        match event {
            Event::ModeCompleted {
                mode,
                next_mode,
                break_earned_secs,
                auto_started,
                ..
            } => {
                assert_eq!(mode, TimerMode::ShortBreak);
                assert_eq!(next_mode, TimerMode::Focus);
                assert_eq!(break_earned_secs, None);
                // auto_start_focus defaults to off.
                assert!(!auto_started);
            }
            other => panic!("expected ModeCompleted, got {other:?}"),
        }
        assert_eq!(e.completed_focus_sessions(), 0);
        assert!(!e.is_running());
    }

    #[test]
    fn skip_advances_without_counting() {
        let mut e = engine();
        let event = e.skip();
        match event {
            Event::TimerSkipped { from, to, .. } => {
                assert_eq!(from, TimerMode::Focus);
                assert_eq!(to, TimerMode::ShortBreak);
            }
            other => panic!("expected TimerSkipped, got {other:?}"),
        }
        assert_eq!(e.completed_focus_sessions(), 0);
        assert!(!e.is_running());
        assert_eq!(e.time_left_secs(), 5 * 60);

        // Skipping the break lands back in focus.
        e.skip();
        assert_eq!(e.mode(), TimerMode::Focus);
    }

    #[test]
    fn skip_from_focus_respects_long_break_cadence() {
        let mut e = PomodoroEngine::new(TimerSettings::default(), 3);
        // The 4th focus session would earn the long break.
        let event = e.skip();
        match event {
            Event::TimerSkipped { to, .. } => assert_eq!(to, TimerMode::LongBreak),
            other => panic!("expected TimerSkipped, got {other:?}"),
        }
        assert_eq!(e.completed_focus_sessions(), 3);
    }

    #[test]
    fn change_mode_resets_and_pauses() {
        let mut e = engine();
        e.start();
        let event = e.change_mode(TimerMode::LongBreak);
        assert!(matches!(event, Event::ModeChanged { .. }));
        assert_eq!(e.mode(), TimerMode::LongBreak);
        assert_eq!(e.time_left_secs(), 15 * 60);
        assert!(!e.is_running());
    }

    #[test]
    fn settings_change_resizes_paused_countdown_only() {
        let mut e = engine();
        let update = SettingsUpdate {
            focus_minutes: Some(50),
            ..Default::default()
        };
        assert!(e.update_settings(&update).is_some());
        assert_eq!(e.time_left_secs(), 50 * 60);

        // While running the countdown keeps its clock.
        e.start();
        let t0 = started_at(&e);
        e.tick_at(t0 + 60_000);
        let update = SettingsUpdate {
            focus_minutes: Some(10),
            ..Default::default()
        };
        e.update_settings(&update);
        assert_eq!(e.time_left_secs(), 50 * 60 - 60);
        assert_eq!(e.settings().focus_minutes, 10);
    }

    #[test]
    fn settings_change_for_other_mode_keeps_countdown() {
        let mut e = engine();
        let update = SettingsUpdate {
            short_break_minutes: Some(10),
            ..Default::default()
        };
        e.update_settings(&update);
        assert_eq!(e.time_left_secs(), 25 * 60);
    }

    #[test]
    fn invalid_settings_fields_are_dropped() {
        let mut e = engine();
        let update = SettingsUpdate {
            focus_minutes: Some(-5),
            short_break_minutes: Some(10),
            ..Default::default()
        };
        e.update_settings(&update);
        assert_eq!(e.settings().focus_minutes, 25);
        assert_eq!(e.settings().short_break_minutes, 10);
    }

    #[test]
    fn sessions_until_long_break_counts_down() {
        let mut e = engine();
        assert_eq!(e.sessions_until_long_break(), 4);
        e.start();
        let t = started_at(&e);
        e.tick_at(t + 25 * 60 * 1000);
        assert_eq!(e.sessions_until_long_break(), 3);
    }
}
