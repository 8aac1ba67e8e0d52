// ── Diagnostic trace ──
//
// A bounded, timestamped log of what discovery and control did, kept for
// user-visible troubleshooting. Every entry is mirrored to `tracing`.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;
use tokio::sync::broadcast;

const LIVE_CHANNEL_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TraceLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub at: DateTime<Utc>,
    pub level: TraceLevel,
    pub message: String,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.at.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.message
        )
    }
}

pub struct DiagnosticTrace {
    entries: Mutex<VecDeque<TraceEntry>>,
    capacity: usize,
    live: broadcast::Sender<TraceEntry>,
}

impl DiagnosticTrace {
    pub fn new(capacity: usize) -> Self {
        let (live, _) = broadcast::channel(LIVE_CHANNEL_SIZE);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
            live,
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.push(TraceLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.push(TraceLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{message}");
        self.push(TraceLevel::Error, message);
    }

    fn push(&self, level: TraceLevel, message: String) {
        let entry = TraceEntry {
            at: Utc::now(),
            level,
            message,
        };
        {
            let mut entries = self.entries.lock().expect("trace lock poisoned");
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(entry.clone());
        }
        let _ = self.live.send(entry);
    }

    /// Copy of all retained entries, oldest first.
    pub fn snapshot(&self) -> Vec<TraceEntry> {
        self.entries
            .lock()
            .expect("trace lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Entries recorded from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TraceEntry> {
        self.live.subscribe()
    }
}

impl fmt::Debug for DiagnosticTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticTrace")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn oldest_entries_are_evicted() {
        let trace = DiagnosticTrace::new(2);
        trace.info("one");
        trace.warn("two");
        trace.error("three");

        let messages: Vec<_> = trace.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn display_includes_timestamp() {
        let trace = DiagnosticTrace::new(4);
        trace.info("AP check");
        let line = trace.snapshot()[0].to_string();
        assert!(line.starts_with('['), "{line}");
        assert!(line.ends_with("] AP check"), "{line}");
    }

    #[test]
    fn live_subscribers_see_new_entries() {
        let trace = DiagnosticTrace::new(4);
        let mut rx = trace.subscribe();
        trace.warn("mDNS probe failed");
        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, TraceLevel::Warn);
    }
}
