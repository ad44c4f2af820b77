//! Debounced autosave, modeled as an explicit finite-state machine.
//!
//! States: Idle, PendingSave, Saving, Saved, Error. Events: Edit,
//! DebounceFired, SaveCompleted, SaveFailed. The transition function is
//! pure; `DebouncedSaver` adds payload coalescing and the debounce clock
//! on top, with time injected so every race is testable.
//!
//! The known overlap race is represented directly: an edit arriving while
//! a save is in flight moves the machine back to PendingSave, and the
//! in-flight save's completion is then treated as stale — the machine
//! waits for the newer save instead of reporting Saved.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    PendingSave,
    Saving,
    Saved,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEvent {
    Edit,
    DebounceFired,
    SaveCompleted,
    SaveFailed,
}

/// The full transition table. Events that make no sense in the current
/// state (a stale timer, a superseded save's outcome) leave it unchanged.
pub fn transition(state: SaveState, event: SaveEvent) -> SaveState {
    use SaveEvent::*;
    use SaveState::*;
    match (state, event) {
        (_, Edit) => PendingSave,
        (PendingSave, DebounceFired) => Saving,
        (Saving, SaveCompleted) => Saved,
        (Saving, SaveFailed) => Error,
        // Stale timer or stale save outcome: no change.
        (state, DebounceFired | SaveCompleted | SaveFailed) => state,
    }
}

/// Debounced saver over an arbitrary payload type.
///
/// Rapid edits coalesce: only the latest payload is handed out when the
/// debounce window elapses, and each edit replaces the deadline rather
/// than stacking a second timer.
pub struct DebouncedSaver<T> {
    state: SaveState,
    debounce: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
    last_error: Option<String>,
}

impl<T> DebouncedSaver<T> {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: SaveState::Idle,
            debounce,
            pending: None,
            deadline: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Records an edit. Local state is the caller's concern; this only
    /// tracks what would be persisted and when.
    pub fn edit(&mut self, payload: T, now: Instant) {
        self.state = transition(self.state, SaveEvent::Edit);
        self.pending = Some(payload);
        self.deadline = Some(now + self.debounce);
        self.last_error = None;
    }

    /// Fires the debounce timer if it is due, yielding the coalesced
    /// payload the caller should persist. Returns `None` when nothing is
    /// due yet.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.state != SaveState::PendingSave {
            return None;
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.state = transition(self.state, SaveEvent::DebounceFired);
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Reports that the in-flight save landed. Ignored when newer edits
    /// have already moved the machine back to PendingSave.
    pub fn save_completed(&mut self) {
        self.state = transition(self.state, SaveEvent::SaveCompleted);
    }

    /// Reports that the in-flight save failed. Also ignored when newer
    /// edits superseded the failed save.
    pub fn save_failed(&mut self, error: impl Into<String>) {
        let next = transition(self.state, SaveEvent::SaveFailed);
        if next == SaveState::Error {
            self.last_error = Some(error.into());
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_secs(1);

    fn saver() -> DebouncedSaver<&'static str> {
        DebouncedSaver::new(DEBOUNCE)
    }

    #[test]
    fn test_transition_table_core_path() {
        use SaveEvent::*;
        use SaveState::*;
        assert_eq!(transition(Idle, Edit), PendingSave);
        assert_eq!(transition(PendingSave, DebounceFired), Saving);
        assert_eq!(transition(Saving, SaveCompleted), Saved);
        assert_eq!(transition(Saving, SaveFailed), Error);
        assert_eq!(transition(Saved, Edit), PendingSave);
        assert_eq!(transition(Error, Edit), PendingSave);
    }

    #[test]
    fn test_stale_events_are_ignored() {
        use SaveEvent::*;
        use SaveState::*;
        assert_eq!(transition(Idle, DebounceFired), Idle);
        assert_eq!(transition(Saved, SaveCompleted), Saved);
        assert_eq!(transition(PendingSave, SaveCompleted), PendingSave);
        assert_eq!(transition(PendingSave, SaveFailed), PendingSave);
    }

    #[test]
    fn test_rapid_edits_coalesce_to_last_payload() {
        let mut saver = saver();
        let t0 = Instant::now();
        saver.edit("first", t0);
        saver.edit("second", t0 + Duration::from_millis(300));
        saver.edit("third", t0 + Duration::from_millis(600));

        // Not due until one second after the LAST edit.
        assert_eq!(saver.poll(t0 + Duration::from_millis(1100)), None);
        let fired = saver.poll(t0 + Duration::from_millis(1600));
        assert_eq!(fired, Some("third"));
        assert_eq!(saver.state(), SaveState::Saving);
    }

    #[test]
    fn test_each_edit_replaces_the_deadline() {
        let mut saver = saver();
        let t0 = Instant::now();
        saver.edit("a", t0);
        saver.edit("b", t0 + Duration::from_millis(900));
        // The first deadline (t0 + 1s) must no longer fire.
        assert_eq!(saver.poll(t0 + Duration::from_millis(1000)), None);
        assert_eq!(saver.poll(t0 + Duration::from_millis(1900)), Some("b"));
    }

    #[test]
    fn test_successful_save_reaches_saved() {
        let mut saver = saver();
        let t0 = Instant::now();
        saver.edit("doc", t0);
        assert_eq!(saver.poll(t0 + DEBOUNCE), Some("doc"));
        saver.save_completed();
        assert_eq!(saver.state(), SaveState::Saved);
    }

    #[test]
    fn test_edit_during_inflight_save_supersedes_completion() {
        let mut saver = saver();
        let t0 = Instant::now();
        saver.edit("v1", t0);
        assert_eq!(saver.poll(t0 + DEBOUNCE), Some("v1"));
        assert_eq!(saver.state(), SaveState::Saving);

        // User keeps typing while v1 is in flight.
        saver.edit("v2", t0 + DEBOUNCE + Duration::from_millis(100));
        assert_eq!(saver.state(), SaveState::PendingSave);

        // v1's completion arrives: stale, the machine still owes a save of v2.
        saver.save_completed();
        assert_eq!(saver.state(), SaveState::PendingSave);

        let second = saver.poll(t0 + DEBOUNCE * 2 + Duration::from_millis(100));
        assert_eq!(second, Some("v2"));
    }

    #[test]
    fn test_failed_save_records_error_until_next_edit() {
        let mut saver = saver();
        let t0 = Instant::now();
        saver.edit("doc", t0);
        saver.poll(t0 + DEBOUNCE);
        saver.save_failed("network down");
        assert_eq!(saver.state(), SaveState::Error);
        assert_eq!(saver.last_error(), Some("network down"));

        saver.edit("doc2", t0 + DEBOUNCE * 2);
        assert_eq!(saver.state(), SaveState::PendingSave);
        assert_eq!(saver.last_error(), None);
    }

    #[test]
    fn test_stale_failure_does_not_clobber_pending_edits() {
        let mut saver = saver();
        let t0 = Instant::now();
        saver.edit("v1", t0);
        saver.poll(t0 + DEBOUNCE);
        saver.edit("v2", t0 + DEBOUNCE + Duration::from_millis(50));
        saver.save_failed("timeout");
        assert_eq!(saver.state(), SaveState::PendingSave);
        assert_eq!(saver.last_error(), None);
    }
}
