// ── Discovery sequencing ──
//
// At most one discovery sequence is live. Starting a new one cancels the
// previous token and bumps a monotonic generation; results are applied
// only while their generation is still current, so a late answer from a
// superseded probe can never overwrite newer state.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Handle held by one running discovery sequence.
#[derive(Debug, Clone)]
pub struct SequenceGuard {
    generation: u64,
    cancel: CancellationToken,
}

impl SequenceGuard {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolves once this sequence is superseded or cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug)]
pub(crate) struct Sequencer {
    root: CancellationToken,
    generation: AtomicU64,
    current: Mutex<CancellationToken>,
}

impl Sequencer {
    pub(crate) fn new() -> Self {
        let root = CancellationToken::new();
        let current = root.child_token();
        Self {
            root,
            generation: AtomicU64::new(0),
            current: Mutex::new(current),
        }
    }

    /// Supersede whatever is running and hand out a fresh guard.
    pub(crate) fn begin(&self) -> SequenceGuard {
        let mut current = self.current.lock().expect("sequencer lock poisoned");
        current.cancel();
        let token = self.root.child_token();
        *current = token.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SequenceGuard {
            generation,
            cancel: token,
        }
    }

    pub(crate) fn is_current(&self, guard: &SequenceGuard) -> bool {
        !guard.is_cancelled() && self.generation.load(Ordering::SeqCst) == guard.generation
    }

    /// Cancel the running sequence without starting another.
    pub(crate) fn cancel_current(&self) {
        let current = self.current.lock().expect("sequencer lock poisoned");
        current.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Cancel sequence `generation` only if nothing newer has begun.
    pub(crate) fn cancel_if_current(&self, generation: u64) -> bool {
        let current = self.current.lock().expect("sequencer lock poisoned");
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        current.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// Cancel everything, permanently.
    pub(crate) fn shutdown(&self) {
        self.root.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
