//! Notification sinks for user-facing notices.

use std::sync::{Mutex, MutexGuard, PoisonError};

use training_core::{Notice, NoticeKind};

/// Fire-and-forget sink for notices ("toasts").
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the tracing subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success | NoticeKind::Info => {
                tracing::info!(kind = %notice.kind, title = %notice.title, "{}", notice.message);
            }
            NoticeKind::Warning => {
                tracing::warn!(title = %notice.title, "{}", notice.message);
            }
            NoticeKind::Error => {
                tracing::error!(title = %notice.title, "{}", notice.message);
            }
        }
    }
}

/// Keeps every notice in memory, for tests and prototyping.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices seen so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    /// Drain and return the notices seen so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.lock().push(notice.clone());
    }
}
