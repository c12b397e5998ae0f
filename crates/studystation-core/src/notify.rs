//! Notification sink boundary.
//!
//! Notifications are fire-and-forget: a sink that cannot deliver (no
//! permission, no display) drops the message, it never errors. The session
//! coordinator calls the sink on mode completions and queue advances; what
//! "delivering" means is up to the embedding surface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyKind {
    FocusComplete,
    BreakComplete,
    QueueAdvanced,
}

/// Every notification surface implements this trait.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotifyKind, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn notify(&self, kind: NotifyKind, message: &str) {
        (**self).notify(kind, message);
    }
}

/// Discards everything. The default when no surface is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _kind: NotifyKind, _message: &str) {}
}

/// Writes notifications to stderr -- the CLI surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, kind: NotifyKind, message: &str) {
        eprintln!("[{kind:?}] {message}");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records notifications for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub seen: Mutex<Vec<(NotifyKind, String)>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, kind: NotifyKind, message: &str) {
            self.seen
                .lock()
                .expect("sink lock poisoned")
                .push((kind, message.to_string()));
        }
    }
}
