//! # Studystation Core Library
//!
//! Core logic for Studystation, a study-productivity dashboard: a playback
//! queue, a pomodoro timer, and the session coordinator that feeds both
//! into study analytics. The CLI binary drives the same library the way a
//! GUI shell would.
//!
//! ## Architecture
//!
//! - **Queue Manager**: ordered playable items with repeat/shuffle
//!   policies and library-backed refill
//! - **Pomodoro Engine**: a wall-clock state machine that requires the
//!   caller to periodically invoke `tick()` -- remaining time is
//!   recomputed from a start timestamp, never decremented
//! - **Session Coordinator**: owns the active selection, the focus-mode
//!   presence clock, and the study accumulator; wires the two state
//!   machines to persistence and notifications
//! - **Storage**: SQLite flat key/JSON-value store plus TOML configuration
//! - **Search**: YouTube Data API client, normalized at the boundary
//!
//! ## Key Components
//!
//! - [`QueueManager`]: playback queue state machine
//! - [`PomodoroEngine`]: countdown state machine
//! - [`SessionCoordinator`]: cross-widget glue and accumulators
//! - [`Store`]: persisted key/value state
//! - [`YoutubeSearch`]: search collaborator

pub mod error;
pub mod events;
pub mod media;
pub mod notes;
pub mod notify;
pub mod player;
pub mod playlist;
pub mod queue;
pub mod search;
pub mod session;
pub mod stats;
pub mod storage;
pub mod tasks;
pub mod timer;

pub use error::{ConfigError, CoreError, SearchError, StorageError, ValidationError};
pub use events::Event;
pub use media::{Library, MediaItem};
pub use notify::{NotificationSink, NotifyKind, NullSink, StderrSink};
pub use player::{PlayerCommand, PlayerEvent, PlayerState};
pub use playlist::{Playlist, Playlists};
pub use queue::QueueManager;
pub use search::{SearchResults, SearchType, YoutubeSearch};
pub use session::{SessionCoordinator, SessionState};
pub use stats::{AnalyticsSummary, StudyAccumulator, StudySession, TimeFrame};
pub use storage::{Config, Store};
pub use tasks::{StudyTask, TaskList, TaskPriority};
pub use timer::{PomodoroEngine, SettingsUpdate, TimerMode, TimerSettings};
