//! Session coordinator.
//!
//! Bridges the queue manager and the pomodoro engine to the shared
//! accumulators and cross-widget signals. Owns the active selection, the
//! focus-mode flag, and the study accumulator; everything else is reached
//! only through the owning component's operations (single writer per
//! entity).
//!
//! Two clocks run here on purpose. The pomodoro engine counts *down*
//! against wall-clock time; the coordinator's one-second ticker counts
//! *up* while focus mode is active, feeding presence time into analytics.
//! Focus mode can outlive a countdown (user keeps studying after the
//! interval), so the signals stay separate.
//!
//! Persistence is write-through: a failed save is logged and the in-memory
//! state stays authoritative.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::media::{Library, MediaItem};
use crate::notify::{NotificationSink, NotifyKind};
use crate::queue::QueueManager;
use crate::stats::{AnalyticsSummary, StudyAccumulator, TimeFrame};
use crate::storage::{keys, Store};
use crate::timer::{PomodoroEngine, SettingsUpdate, TimerMode, TimerSettings};

pub struct SessionCoordinator {
    store: Store,
    notifier: Box<dyn NotificationSink>,
    library: Library,
    shorts: Library,
    queue: QueueManager,
    timer: PomodoroEngine,
    accumulator: StudyAccumulator,
    active: Option<MediaItem>,
    focus_mode: bool,
    elapsed_focus_secs: u64,
}

/// Transient session snapshot for drivers that span process restarts
/// (the CLI persists one between invocations). The browser-equivalent
/// reload path simply starts fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub queue: QueueManager,
    pub active: Option<MediaItem>,
    pub focus_mode: bool,
    pub elapsed_focus_secs: u64,
    pub timer: PomodoroEngine,
}

impl SessionCoordinator {
    /// Load persisted state from `store`. Corrupt or missing values fall
    /// back to defaults; the timer always reinitializes paused in focus
    /// mode with only settings and the session counter restored.
    pub fn open(store: Store, notifier: Box<dyn NotificationSink>) -> Self {
        let library = load_or_default(&store, keys::SAVED_VIDEOS);
        let shorts = load_or_default(&store, keys::SAVED_SHORTS);
        let accumulator = load_or_default(&store, keys::STUDY_DATA);
        let settings: TimerSettings = load_or_default(&store, keys::POMODORO_SETTINGS);
        let completed: u64 = load_or_default(&store, keys::COMPLETED_POMODOROS);

        Self {
            store,
            notifier,
            library,
            shorts,
            queue: QueueManager::new(),
            timer: PomodoroEngine::new(settings, completed),
            accumulator,
            active: None,
            focus_mode: false,
            elapsed_focus_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn shorts(&self) -> &Library {
        &self.shorts
    }

    pub fn queue(&self) -> &QueueManager {
        &self.queue
    }

    pub fn timer(&self) -> &PomodoroEngine {
        &self.timer
    }

    pub fn accumulator(&self) -> &StudyAccumulator {
        &self.accumulator
    }

    pub fn active(&self) -> Option<&MediaItem> {
        self.active.as_ref()
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn elapsed_focus_secs(&self) -> u64 {
        self.elapsed_focus_secs
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn analytics(&self, frame: TimeFrame) -> AnalyticsSummary {
        self.accumulator.summary(frame)
    }

    // ── Library / playback ───────────────────────────────────────────

    /// Save an item into the video (or shorts) library and make it the
    /// active selection. Duplicate saves still switch playback.
    pub fn save_media(&mut self, item: MediaItem, short: bool) -> Option<Event> {
        if !item.is_valid() {
            return None;
        }
        if short {
            if self.shorts.add(item.clone()) {
                self.persist(keys::SAVED_SHORTS, &self.shorts);
            }
        } else if self.library.add(item.clone()) {
            self.persist(keys::SAVED_VIDEOS, &self.library);
        }
        self.set_active(item)
    }

    /// Explicit play action.
    pub fn play(&mut self, item: MediaItem) -> Option<Event> {
        if !item.is_valid() {
            return None;
        }
        self.set_active(item)
    }

    /// Remove an item everywhere: both libraries, the queue, and the
    /// active selection if it matches.
    pub fn remove_media(&mut self, id: &str) -> bool {
        let mut removed = false;
        if self.library.remove(id) {
            self.persist(keys::SAVED_VIDEOS, &self.library);
            removed = true;
        }
        if self.shorts.remove(id) {
            self.persist(keys::SAVED_SHORTS, &self.shorts);
            removed = true;
        }
        self.queue.remove(id);
        if self.active.as_ref().is_some_and(|v| v.id == id) {
            self.active = None;
        }
        removed
    }

    // ── Queue ────────────────────────────────────────────────────────

    pub fn add_to_queue(&mut self, item: MediaItem) -> bool {
        self.queue.add(item)
    }

    /// Remove from the queue; a removed item that was playing clears the
    /// active selection.
    pub fn remove_from_queue(&mut self, id: &str) -> bool {
        let removed = self.queue.remove(id);
        if removed && self.active.as_ref().is_some_and(|v| v.id == id) {
            self.active = None;
        }
        removed
    }

    pub fn reorder_queue(&mut self, new_order: Vec<MediaItem>) {
        self.queue.reorder(new_order);
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    pub fn toggle_queue_repeat(&mut self) -> bool {
        self.queue.toggle_repeat()
    }

    pub fn toggle_queue_shuffle(&mut self) -> bool {
        self.queue.toggle_shuffle()
    }

    /// Advance playback from the queue head.
    pub fn play_next(&mut self) -> Option<Event> {
        let item = self.queue.play_next(&self.library)?;
        let remaining = self.queue.len();
        self.active = Some(item.clone());
        Some(Event::QueueAdvanced {
            id: item.id,
            remaining,
            at: Utc::now(),
        })
    }

    /// The player reported end-of-playback for the active item.
    pub fn handle_item_ended(&mut self) -> Event {
        let ended_id = self.active.as_ref().map(|v| v.id.clone());
        match self.queue.on_item_ended(ended_id.as_deref(), &self.library) {
            Some(item) => {
                let remaining = self.queue.len();
                self.notifier.notify(
                    NotifyKind::QueueAdvanced,
                    &format!("Now playing: {}", item.title_or_untitled()),
                );
                self.active = Some(item.clone());
                Event::QueueAdvanced {
                    id: item.id,
                    remaining,
                    at: Utc::now(),
                }
            }
            None => Event::PlaybackStopped { at: Utc::now() },
        }
    }

    // ── Focus mode / accumulators ────────────────────────────────────

    /// Manual focus-mode toggle. Leaving focus mode records the elapsed
    /// presence time as a study session.
    pub fn toggle_focus_mode(&mut self) -> Vec<Event> {
        if self.focus_mode {
            self.exit_focus_mode()
        } else {
            self.focus_mode = true;
            vec![Event::FocusModeEntered { at: Utc::now() }]
        }
    }

    fn exit_focus_mode(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let elapsed = self.elapsed_focus_secs;
        self.focus_mode = false;
        self.elapsed_focus_secs = 0;
        events.push(Event::FocusModeExited {
            elapsed_secs: elapsed,
            at: Utc::now(),
        });
        if elapsed > 0 {
            self.accumulator.record_session(Utc::now(), elapsed);
            self.persist(keys::STUDY_DATA, &self.accumulator);
            events.push(Event::SessionRecorded {
                duration_secs: elapsed,
                at: Utc::now(),
            });
        }
        events
    }

    fn enter_focus_mode(&mut self, events: &mut Vec<Event>) {
        if !self.focus_mode {
            self.focus_mode = true;
            events.push(Event::FocusModeEntered { at: Utc::now() });
        }
    }

    /// External task-completion signal; monotonic.
    pub fn task_completed(&mut self) -> Event {
        let completed_tasks = self.accumulator.task_completed();
        self.persist(keys::STUDY_DATA, &self.accumulator);
        Event::TaskCompleted {
            completed_tasks,
            at: Utc::now(),
        }
    }

    /// One-second driver tick: accrues focus presence time and advances
    /// the countdown.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.focus_mode {
            self.elapsed_focus_secs += 1;
            self.accumulator.add_focus_secs(1);
            self.persist(keys::STUDY_DATA, &self.accumulator);
        }
        if let Some(event) = self.timer.tick() {
            self.handle_timer_event(event, &mut events);
        }
        events
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Start the countdown; starting a focus interval also switches the
    /// app into focus mode.
    pub fn start_timer(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(event) = self.timer.start() {
            events.push(event);
            if self.timer.mode() == TimerMode::Focus {
                self.enter_focus_mode(&mut events);
            }
        }
        events
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        self.timer.pause()
    }

    pub fn toggle_timer(&mut self) -> Vec<Event> {
        if self.timer.is_running() {
            self.timer.pause().into_iter().collect()
        } else {
            self.start_timer()
        }
    }

    /// Skip never counts a session and never credits break time.
    pub fn skip_timer(&mut self) -> Event {
        self.timer.skip()
    }

    pub fn change_timer_mode(&mut self, mode: TimerMode) -> Event {
        self.timer.change_mode(mode)
    }

    pub fn update_timer_settings(&mut self, update: &SettingsUpdate) -> Option<Event> {
        let event = self.timer.update_settings(update)?;
        self.persist(keys::POMODORO_SETTINGS, self.timer.settings());
        Some(event)
    }

    fn handle_timer_event(&mut self, event: Event, out: &mut Vec<Event>) {
        if let Event::ModeCompleted {
            mode,
            next_mode,
            break_earned_secs,
            auto_started,
            completed_focus_sessions,
            ..
        } = &event
        {
            let sound = self.timer.settings().sound_enabled;
            match mode {
                TimerMode::Focus => {
                    if sound {
                        self.notifier.notify(
                            NotifyKind::FocusComplete,
                            "Focus session complete -- time for a break",
                        );
                    }
                    self.persist(keys::COMPLETED_POMODOROS, completed_focus_sessions);
                    if let Some(secs) = break_earned_secs {
                        self.accumulator.add_break_secs(*secs);
                        self.persist(keys::STUDY_DATA, &self.accumulator);
                        out.push(Event::BreakEarned {
                            duration_secs: *secs,
                            long: *next_mode == TimerMode::LongBreak,
                            at: Utc::now(),
                        });
                    }
                }
                _ => {
                    if sound {
                        self.notifier
                            .notify(NotifyKind::BreakComplete, "Break over -- back to focus");
                    }
                }
            }
            let focus_resumed = *auto_started && *next_mode == TimerMode::Focus;
            out.insert(0, event);
            if focus_resumed {
                self.enter_focus_mode(out);
            }
            return;
        }
        out.push(event);
    }

    // ── Session snapshot (driver persistence) ────────────────────────

    pub fn snapshot(&self) -> SessionState {
        SessionState {
            queue: self.queue.clone(),
            active: self.active.clone(),
            focus_mode: self.focus_mode,
            elapsed_focus_secs: self.elapsed_focus_secs,
            timer: self.timer.clone(),
        }
    }

    pub fn restore(&mut self, state: SessionState) {
        self.queue = state.queue;
        self.active = state.active;
        self.focus_mode = state.focus_mode;
        self.elapsed_focus_secs = state.elapsed_focus_secs;
        self.timer = state.timer;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_active(&mut self, item: MediaItem) -> Option<Event> {
        let id = item.id.clone();
        self.active = Some(item);
        Some(Event::TrackChanged {
            id,
            at: Utc::now(),
        })
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(error) = self.store.set_json(key, value) {
            tracing::warn!(key, %error, "failed to persist state; keeping in-memory value");
        }
    }
}

fn load_or_default<T: Default + serde::de::DeserializeOwned>(store: &Store, key: &str) -> T {
    match store.get_json(key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(error) => {
            tracing::warn!(key, %error, "failed to load persisted state; using defaults");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::test_support::RecordingSink;
    use crate::notify::NullSink;
    use std::sync::Arc;

    fn coordinator() -> SessionCoordinator {
        SessionCoordinator::open(Store::open_memory().unwrap(), Box::new(NullSink))
    }

    fn item(id: &str) -> MediaItem {
        MediaItem::new(id).with_title(id.to_uppercase())
    }

    #[test]
    fn save_media_adds_once_and_sets_active() {
        let mut c = coordinator();
        assert!(c.save_media(item("a"), false).is_some());
        assert!(c.save_media(item("a"), false).is_some());
        assert_eq!(c.library().len(), 1);
        assert_eq!(c.active().unwrap().id, "a");
        assert!(c.save_media(MediaItem::new(""), false).is_none());
    }

    #[test]
    fn remove_media_clears_active_and_queue() {
        let mut c = coordinator();
        c.save_media(item("a"), false);
        c.add_to_queue(item("a"));
        assert!(c.remove_media("a"));
        assert!(c.active().is_none());
        assert!(c.queue().is_empty());
        assert!(c.library().is_empty());
        assert!(!c.remove_media("a"));
    }

    #[test]
    fn remove_from_queue_clears_matching_active() {
        let mut c = coordinator();
        c.play(item("a"));
        c.add_to_queue(item("a"));
        c.add_to_queue(item("b"));

        assert!(c.remove_from_queue("a"));
        assert!(c.active().is_none());

        c.play(item("x"));
        assert!(c.remove_from_queue("b"));
        assert_eq!(c.active().unwrap().id, "x");
    }

    #[test]
    fn play_next_sets_active_from_queue_head() {
        let mut c = coordinator();
        c.add_to_queue(item("a"));
        c.add_to_queue(item("b"));

        match c.play_next() {
            Some(Event::QueueAdvanced { id, remaining, .. }) => {
                assert_eq!(id, "a");
                assert_eq!(remaining, 1);
            }
            other => panic!("expected QueueAdvanced, got {other:?}"),
        }
        assert_eq!(c.active().unwrap().id, "a");
        assert!(c.play_next().is_some());
        assert!(c.play_next().is_none());
    }

    #[test]
    fn item_ended_with_empty_queue_stops_without_clearing_active() {
        let mut c = coordinator();
        c.play(item("a"));
        let event = c.handle_item_ended();
        assert!(matches!(event, Event::PlaybackStopped { .. }));
        assert_eq!(c.active().unwrap().id, "a");
    }

    #[test]
    fn item_ended_repeat_loops_library() {
        let mut c = coordinator();
        c.save_media(item("a"), false);
        c.save_media(item("b"), false);
        c.play(item("a"));
        c.toggle_queue_repeat();

        let event = c.handle_item_ended();
        match event {
            Event::QueueAdvanced { id, .. } => assert_eq!(id, "b"),
            other => panic!("expected QueueAdvanced, got {other:?}"),
        }
        assert_eq!(c.active().unwrap().id, "b");
    }

    #[test]
    fn focus_ticker_accrues_and_records_session_on_exit() {
        let mut c = coordinator();
        c.toggle_focus_mode();
        for _ in 0..3 {
            c.tick();
        }
        assert_eq!(c.elapsed_focus_secs(), 3);
        assert_eq!(c.accumulator().focus_time_secs, 3);

        let events = c.toggle_focus_mode();
        assert!(matches!(
            events[0],
            Event::FocusModeExited { elapsed_secs: 3, .. }
        ));
        assert!(matches!(
            events[1],
            Event::SessionRecorded { duration_secs: 3, .. }
        ));
        assert_eq!(c.accumulator().study_sessions.len(), 1);
        assert_eq!(c.elapsed_focus_secs(), 0);

        // Exiting without elapsed time records nothing.
        c.toggle_focus_mode();
        let events = c.toggle_focus_mode();
        assert_eq!(events.len(), 1);
        assert_eq!(c.accumulator().study_sessions.len(), 1);
    }

    #[test]
    fn ticker_is_idle_outside_focus_mode() {
        let mut c = coordinator();
        c.tick();
        c.tick();
        assert_eq!(c.accumulator().focus_time_secs, 0);
    }

    #[test]
    fn starting_focus_timer_enters_focus_mode() {
        let mut c = coordinator();
        let events = c.start_timer();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::TimerStarted { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::FocusModeEntered { .. })));
        assert!(c.focus_mode());

        // Starting again while running changes nothing.
        assert!(c.start_timer().is_empty());
    }

    #[test]
    fn starting_break_timer_does_not_enter_focus_mode() {
        let mut c = coordinator();
        c.change_timer_mode(TimerMode::ShortBreak);
        let events = c.start_timer();
        assert_eq!(events.len(), 1);
        assert!(!c.focus_mode());
    }

    #[test]
    fn focus_completion_credits_break_and_notifies() {
        let sink = Arc::new(RecordingSink::default());
        let mut c = SessionCoordinator::open(
            Store::open_memory().unwrap(),
            Box::new(Arc::clone(&sink)),
        );

        let completion = Event::ModeCompleted {
            mode: TimerMode::Focus,
            next_mode: TimerMode::ShortBreak,
            completed_focus_sessions: 1,
            break_earned_secs: Some(300),
            auto_started: true,
            at: Utc::now(),
        };
        let mut out = Vec::new();
        c.handle_timer_event(completion, &mut out);

        assert_eq!(c.accumulator().break_time_secs, 300);
        assert!(matches!(out[0], Event::ModeCompleted { .. }));
        assert!(matches!(
            out[1],
            Event::BreakEarned { duration_secs: 300, long: false, .. }
        ));
        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, NotifyKind::FocusComplete);
    }

    #[test]
    fn muted_completion_skips_notification() {
        let sink = Arc::new(RecordingSink::default());
        let mut c = SessionCoordinator::open(
            Store::open_memory().unwrap(),
            Box::new(Arc::clone(&sink)),
        );
        c.update_timer_settings(&SettingsUpdate {
            sound_enabled: Some(false),
            ..Default::default()
        });

        let completion = Event::ModeCompleted {
            mode: TimerMode::ShortBreak,
            next_mode: TimerMode::Focus,
            completed_focus_sessions: 1,
            break_earned_secs: None,
            auto_started: false,
            at: Utc::now(),
        };
        let mut out = Vec::new();
        c.handle_timer_event(completion, &mut out);
        assert!(sink.seen.lock().unwrap().is_empty());
        assert_eq!(c.accumulator().break_time_secs, 0);
    }

    #[test]
    fn auto_started_focus_after_break_reenters_focus_mode() {
        let mut c = coordinator();
        let completion = Event::ModeCompleted {
            mode: TimerMode::ShortBreak,
            next_mode: TimerMode::Focus,
            completed_focus_sessions: 2,
            break_earned_secs: None,
            auto_started: true,
            at: Utc::now(),
        };
        let mut out = Vec::new();
        c.handle_timer_event(completion, &mut out);
        assert!(c.focus_mode());
        assert!(out
            .iter()
            .any(|e| matches!(e, Event::FocusModeEntered { .. })));
    }

    #[test]
    fn task_completed_is_monotonic() {
        let mut c = coordinator();
        c.task_completed();
        c.task_completed();
        assert_eq!(c.accumulator().completed_tasks, 2);
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studystation.db");

        {
            let store = Store::open_at(&path).unwrap();
            let mut c = SessionCoordinator::open(store, Box::new(NullSink));
            c.save_media(item("a"), false);
            c.save_media(item("s"), true);
            c.task_completed();
            c.update_timer_settings(&SettingsUpdate {
                focus_minutes: Some(50),
                ..Default::default()
            });
        }

        let store = Store::open_at(&path).unwrap();
        let c = SessionCoordinator::open(store, Box::new(NullSink));
        assert!(c.library().contains("a"));
        assert!(c.shorts().contains("s"));
        assert_eq!(c.accumulator().completed_tasks, 1);
        assert_eq!(c.timer().settings().focus_minutes, 50);
        // Runtime state deliberately does not survive.
        assert!(c.queue().is_empty());
        assert!(c.active().is_none());
        assert!(!c.timer().is_running());
        assert_eq!(c.timer().mode(), TimerMode::Focus);
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut c = coordinator();
        c.add_to_queue(item("a"));
        c.play(item("x"));
        c.toggle_focus_mode();

        let state = c.snapshot();
        let mut fresh = coordinator();
        fresh.restore(state);
        assert_eq!(fresh.queue().len(), 1);
        assert_eq!(fresh.active().unwrap().id, "x");
        assert!(fresh.focus_mode());
    }
}
