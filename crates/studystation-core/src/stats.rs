//! Study metrics accumulation and analytics summaries.
//!
//! [`StudyAccumulator`] is the append-only record the session coordinator
//! writes into: focus/break seconds, completed tasks, and the per-session
//! history. Counters only increase. [`AnalyticsSummary`] is a derived view
//! over a time frame, mirroring the analytics widget: daily average, most
//! productive day, streak.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One recorded focus-mode session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub date: DateTime<Utc>,
    pub duration_secs: u64,
}

/// Cumulative study metrics, persisted under the `study_data` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyAccumulator {
    #[serde(default)]
    pub focus_time_secs: u64,
    #[serde(default)]
    pub break_time_secs: u64,
    #[serde(default)]
    pub completed_tasks: u64,
    #[serde(default)]
    pub study_sessions: Vec<StudySession>,
}

impl StudyAccumulator {
    pub fn add_focus_secs(&mut self, secs: u64) {
        self.focus_time_secs = self.focus_time_secs.saturating_add(secs);
    }

    pub fn add_break_secs(&mut self, secs: u64) {
        self.break_time_secs = self.break_time_secs.saturating_add(secs);
    }

    /// Returns the new completed-task count.
    pub fn task_completed(&mut self) -> u64 {
        self.completed_tasks = self.completed_tasks.saturating_add(1);
        self.completed_tasks
    }

    pub fn record_session(&mut self, date: DateTime<Utc>, duration_secs: u64) {
        self.study_sessions.push(StudySession {
            date,
            duration_secs,
        });
    }

    /// Derived analytics over `frame`, evaluated against the current time.
    pub fn summary(&self, frame: TimeFrame) -> AnalyticsSummary {
        self.summary_at(frame, Utc::now())
    }

    /// Derived analytics over `frame` as of `now`.
    pub fn summary_at(&self, frame: TimeFrame, now: DateTime<Utc>) -> AnalyticsSummary {
        let cutoff = frame.cutoff(now);
        let filtered: Vec<&StudySession> = self
            .study_sessions
            .iter()
            .filter(|s| cutoff.map_or(true, |c| s.date >= c))
            .collect();

        let mut by_day: HashMap<NaiveDate, u64> = HashMap::new();
        for session in &filtered {
            *by_day.entry(session.date.date_naive()).or_insert(0) += session.duration_secs;
        }

        let most_productive_day = by_day
            .iter()
            .max_by_key(|(_, secs)| **secs)
            .map(|(day, _)| *day);

        let filtered_total: u64 = filtered.iter().map(|s| s.duration_secs).sum();
        let daily_average_secs = if by_day.is_empty() {
            0
        } else {
            filtered_total / by_day.len() as u64
        };

        // Consecutive days with at least one session, counting back from a
        // session today. No session today means no streak.
        let mut streak = 0u32;
        let mut day = now.date_naive();
        while by_day.contains_key(&day) {
            streak += 1;
            match day.checked_sub_days(Days::new(1)) {
                Some(prev) => day = prev,
                None => break,
            }
        }

        let focus_to_break_ratio = if self.break_time_secs > 0 {
            self.focus_time_secs as f64 / self.break_time_secs as f64
        } else if self.focus_time_secs > 0 {
            self.focus_time_secs as f64
        } else {
            0.0
        };

        AnalyticsSummary {
            total_focus_secs: self.focus_time_secs,
            total_break_secs: self.break_time_secs,
            completed_tasks: self.completed_tasks,
            focus_to_break_ratio,
            daily_average_secs,
            most_productive_day,
            streak_days: streak,
            sessions_in_frame: filtered.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFrame {
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
    All,
}

impl TimeFrame {
    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeFrame::Week => now.checked_sub_days(Days::new(7)),
            TimeFrame::Month => now.checked_sub_days(Days::new(30)),
            TimeFrame::All => None,
        }
    }
}

/// Snapshot of derived analytics for one time frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_focus_secs: u64,
    pub total_break_secs: u64,
    pub completed_tasks: u64,
    pub focus_to_break_ratio: f64,
    pub daily_average_secs: u64,
    pub most_productive_day: Option<NaiveDate>,
    pub streak_days: u32,
    pub sessions_in_frame: usize,
}

/// "2h 5m" / "34m" / "12s" -- display formatting for durations.
pub fn format_duration_secs(secs: u64) -> String {
    if secs < 60 {
        return format!("{secs}s");
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours == 0 {
        format!("{minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}
