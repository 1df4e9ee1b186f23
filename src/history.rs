//! Snapshot-based undo/redo, layered transparently over document
//! mutations.
//!
//! Rapid edits are coalesced: a mutation arms a short debounce timer and
//! the snapshot is captured only once the burst settles. The undo stack is
//! bounded; the oldest entry is evicted on overflow, so deep history is
//! deliberately not preserved.

use std::time::{Duration, Instant};

use crate::document::{Document, DocumentState};
use crate::error::EditorError;

/// Maximum number of retained snapshots.
pub const MAX_SNAPSHOTS: usize = 20;

/// Time a burst of edits must settle before it is recorded as one entry.
pub const SNAPSHOT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A fully-serialized copy of document state at one point in time.
/// Immutable once pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    state: DocumentState,
}

impl HistorySnapshot {
    fn capture(document: &Document) -> Self {
        Self {
            state: document.serialize(),
        }
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }
}

#[derive(Debug, Default)]
pub struct HistoryManager {
    undo_stack: Vec<HistorySnapshot>,
    redo_stack: Vec<HistorySnapshot>,
    /// Deadline of the pending coalesced snapshot, if a mutation burst is
    /// still settling.
    pending_since: Option<Instant>,
    /// Re-entrancy guard: set while a restore is being applied so the
    /// programmatic mutation is not recorded as a user action.
    applying: bool,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the initial state. Called once, when the document first
    /// becomes ready; the entry is never undone past.
    pub fn record_initial(&mut self, document: &Document) {
        if self.undo_stack.is_empty() {
            self.undo_stack.push(HistorySnapshot::capture(document));
            log::debug!("history: initial snapshot recorded");
        }
    }

    /// Notes that a mutation happened, (re)arming the debounce timer.
    pub fn note_change(&mut self, now: Instant) {
        if !self.applying {
            self.pending_since = Some(now);
        }
    }

    /// Captures the pending coalesced snapshot if the debounce has
    /// settled. Returns whether an entry was recorded.
    pub fn poll(&mut self, now: Instant, document: &Document) -> bool {
        match self.pending_since {
            Some(since) if now.duration_since(since) >= SNAPSHOT_DEBOUNCE => {
                self.pending_since = None;
                self.push(HistorySnapshot::capture(document));
                true
            }
            _ => false,
        }
    }

    fn push(&mut self, snapshot: HistorySnapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > MAX_SNAPSHOTS {
            self.undo_stack.remove(0);
        }
        // A new action invalidates anything that was undone.
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Restores the previous snapshot into the document. The popped
    /// current state moves to the redo stack.
    pub fn undo(&mut self, document: &mut Document) -> Result<(), EditorError> {
        if !self.can_undo() {
            return Err(EditorError::NothingToUndo);
        }
        // A settled-but-uncaptured edit dies with the restore; its timer
        // must not fire afterwards and record the post-restore state.
        self.pending_since = None;
        self.applying = true;
        let current = self.undo_stack.pop().expect("checked above");
        self.redo_stack.push(current);
        let previous = self.undo_stack.last().expect("initial entry remains");
        document.restore(previous.state());
        self.applying = false;
        log::debug!("history: undo ({} entries remain)", self.undo_stack.len());
        Ok(())
    }

    /// Re-applies the most recently undone snapshot.
    pub fn redo(&mut self, document: &mut Document) -> Result<(), EditorError> {
        let Some(next) = self.redo_stack.pop() else {
            return Err(EditorError::NothingToRedo);
        };
        self.pending_since = None;
        self.applying = true;
        document.restore(next.state());
        self.undo_stack.push(next);
        self.applying = false;
        log::debug!("history: redo ({} entries queued)", self.redo_stack.len());
        Ok(())
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Dimensions, ImageObject, VisualObject};

    fn settle(history: &mut HistoryManager, document: &Document, at: Instant) -> Instant {
        let later = at + SNAPSHOT_DEBOUNCE;
        assert!(history.poll(later, document));
        later
    }

    #[test]
    fn burst_of_edits_coalesces_into_one_entry() {
        let mut document = Document::new(Dimensions::new(800, 600));
        let mut history = HistoryManager::new();
        history.record_initial(&document);

        let t0 = Instant::now();
        for i in 0..5 {
            document.add_object(VisualObject::Image(ImageObject::new("x.png", 1.0, 1.0)));
            history.note_change(t0 + Duration::from_millis(i * 50));
        }
        // Still settling halfway through the debounce window.
        assert!(!history.poll(t0 + Duration::from_millis(400), &document));
        settle(&mut history, &document, t0 + Duration::from_millis(250));

        assert_eq!(history.depth(), 2);
    }

    #[test]
    fn undo_is_refused_at_the_initial_entry() {
        let mut document = Document::new(Dimensions::new(800, 600));
        let mut history = HistoryManager::new();
        history.record_initial(&document);

        assert!(!history.can_undo());
        assert!(history.undo(&mut document).is_err());
    }

    #[test]
    fn overflow_evicts_the_oldest_entry() {
        let mut document = Document::new(Dimensions::new(800, 600));
        let mut history = HistoryManager::new();
        history.record_initial(&document);

        let mut now = Instant::now();
        for i in 0..MAX_SNAPSHOTS + 5 {
            document.set_dimensions(Dimensions::new(800 + i as u32 + 1, 600));
            history.note_change(now);
            now = settle(&mut history, &document, now);
        }

        assert_eq!(history.depth(), MAX_SNAPSHOTS);
        // Unwind everything that is reachable.
        let mut undone = 0;
        while history.can_undo() {
            history.undo(&mut document).unwrap();
            undone += 1;
        }
        assert_eq!(undone, MAX_SNAPSHOTS - 1);
        // The oldest states were evicted; we cannot get back to 800 wide.
        assert_ne!(document.dimensions().width, 800);
    }
}
