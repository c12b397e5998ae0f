//! Pomodoro timer settings with per-field validation.

use serde::{Deserialize, Serialize};

use super::TimerMode;

/// User-configurable timer durations and behavior flags.
///
/// Durations are minutes; all numeric fields are positive integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Every Nth completed focus session earns a long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_focus: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
            auto_start_breaks: true,
            auto_start_focus: false,
            sound_enabled: true,
        }
    }
}

impl TimerSettings {
    /// Configured duration of a full countdown for `mode`, in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        let minutes = match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        };
        u64::from(minutes).saturating_mul(60)
    }

    /// Apply `update`, field by field. Numeric fields below 1 (or beyond
    /// `u32`) are dropped; the remaining fields still apply. Returns
    /// whether anything changed.
    pub fn apply(&mut self, update: &SettingsUpdate) -> bool {
        let before = *self;

        apply_minutes(&mut self.focus_minutes, update.focus_minutes);
        apply_minutes(&mut self.short_break_minutes, update.short_break_minutes);
        apply_minutes(&mut self.long_break_minutes, update.long_break_minutes);
        apply_minutes(&mut self.long_break_interval, update.long_break_interval);

        if let Some(v) = update.auto_start_breaks {
            self.auto_start_breaks = v;
        }
        if let Some(v) = update.auto_start_focus {
            self.auto_start_focus = v;
        }
        if let Some(v) = update.sound_enabled {
            self.sound_enabled = v;
        }

        *self != before
    }
}

fn apply_minutes(field: &mut u32, value: Option<i64>) {
    if let Some(v) = value {
        if v >= 1 {
            if let Ok(v) = u32::try_from(v) {
                *field = v;
            }
        }
    }
}

/// Partial settings update. Absent fields are left untouched; present
/// numeric fields are validated individually.
///
/// Numeric fields are `i64` so out-of-range input (zero, negative) is
/// representable and can be rejected instead of failing to parse.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub focus_minutes: Option<i64>,
    #[serde(default)]
    pub short_break_minutes: Option<i64>,
    #[serde(default)]
    pub long_break_minutes: Option<i64>,
    #[serde(default)]
    pub long_break_interval: Option<i64>,
    #[serde(default)]
    pub auto_start_breaks: Option<bool>,
    #[serde(default)]
    pub auto_start_focus: Option<bool>,
    #[serde(default)]
    pub sound_enabled: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.focus_minutes.is_none()
            && self.short_break_minutes.is_none()
            && self.long_break_minutes.is_none()
            && self.long_break_interval.is_none()
            && self.auto_start_breaks.is_none()
            && self.auto_start_focus.is_none()
            && self.sound_enabled.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = TimerSettings::default();
        assert_eq!(s.focus_minutes, 25);
        assert_eq!(s.short_break_minutes, 5);
        assert_eq!(s.long_break_minutes, 15);
        assert_eq!(s.long_break_interval, 4);
        assert!(s.auto_start_breaks);
        assert!(!s.auto_start_focus);
    }

    #[test]
    fn invalid_field_is_dropped_valid_field_applies() {
        let mut s = TimerSettings::default();
        let changed = s.apply(&SettingsUpdate {
            focus_minutes: Some(-5),
            short_break_minutes: Some(10),
            ..Default::default()
        });
        assert!(changed);
        assert_eq!(s.focus_minutes, 25);
        assert_eq!(s.short_break_minutes, 10);
    }

    #[test]
    fn zero_and_overflow_are_rejected() {
        let mut s = TimerSettings::default();
        s.apply(&SettingsUpdate {
            long_break_interval: Some(0),
            long_break_minutes: Some(i64::from(u32::MAX) + 1),
            ..Default::default()
        });
        assert_eq!(s.long_break_interval, 4);
        assert_eq!(s.long_break_minutes, 15);
    }

    #[test]
    fn bool_flags_apply() {
        let mut s = TimerSettings::default();
        let changed = s.apply(&SettingsUpdate {
            auto_start_focus: Some(true),
            sound_enabled: Some(false),
            ..Default::default()
        });
        assert!(changed);
        assert!(s.auto_start_focus);
        assert!(!s.sound_enabled);
    }

    #[test]
    fn empty_update_changes_nothing() {
        let mut s = TimerSettings::default();
        assert!(!s.apply(&SettingsUpdate::default()));
    }

    #[test]
    fn duration_per_mode() {
        let s = TimerSettings::default();
        assert_eq!(s.duration_secs(TimerMode::Focus), 25 * 60);
        assert_eq!(s.duration_secs(TimerMode::ShortBreak), 5 * 60);
        assert_eq!(s.duration_secs(TimerMode::LongBreak), 15 * 60);
    }
}
