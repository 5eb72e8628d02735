//! Transient user notifications ("toasts").
//!
//! Failures that must not propagate (list refreshes, profile reloads) are
//! reported here so the UI can show them; the caller still gets a fallback.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);
}

/// Default notifier: writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info | Level::Success => tracing::info!(toast = true, "{message}"),
            Level::Warning => tracing::warn!(toast = true, "{message}"),
            Level::Error => tracing::error!(toast = true, "{message}"),
        }
    }
}

/// Keeps every notification in memory (tests, headless callers).
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}
