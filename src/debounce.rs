//! Debounced scheduling on an injected millisecond clock.
//!
//! Callers pass `now_ms` explicitly, so tests drive the scheduler with a
//! virtual clock instead of sleeping.

/// Quiet period before an edited preview is recomposed.
pub const PREVIEW_DEBOUNCE_MS: u64 = 300;

/// Holds at most one pending action, replaced by every new trigger.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Supersede any pending action and restart the quiet window at `now_ms`.
    pub fn trigger(&mut self, value: T, now_ms: u64) {
        let superseded = self.pending.replace((value, now_ms)).is_some();
        tracing::trace!(now_ms, superseded, "debounce trigger");
    }

    /// Take the pending action once its quiet window has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let queued_at = self.pending.as_ref()?.1;
        if now_ms.saturating_sub(queued_at) < self.delay_ms {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    /// Milliseconds until the pending action becomes ready.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        let (_, queued_at) = self.pending.as_ref()?;
        Some(self.delay_ms.saturating_sub(now_ms.saturating_sub(*queued_at)))
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}
