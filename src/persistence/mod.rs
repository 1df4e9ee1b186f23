//! Reconciliation of the in-memory document with the remote project
//! record.
//!
//! Automatic saves are debounced so a burst of edits produces one write;
//! a manual save goes out immediately. Conflict policy is last-writer-wins:
//! a save overwrites the record's mutable fields wholesale and bumps the
//! update timestamp. Nothing here locks; concurrent sessions are out of
//! scope and must tolerate lost updates.

mod record;

pub use record::{
    create_project, ProjectPatch, ProjectRecord, ProjectStore, Uploader, UploadResult,
};

use std::time::{Duration, Instant};

use crate::document::Document;
use crate::error::EditorError;

/// Quiet period after the last mutation before an automatic save fires.
pub const SAVE_DEBOUNCE: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct Reconciler {
    project_id: String,
    pending_since: Option<Instant>,
}

impl Reconciler {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            pending_since: None,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// (Re)arms the auto-save debounce timer.
    pub fn schedule_save(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Fires the pending auto-save once the debounce has settled.
    /// Returns whether a save went out.
    pub fn poll(
        &mut self,
        now: Instant,
        document: &Document,
        store: &mut dyn ProjectStore,
    ) -> Result<bool, EditorError> {
        match self.pending_since {
            Some(since) if now.duration_since(since) >= SAVE_DEBOUNCE => {
                self.pending_since = None;
                self.save_now(document, store)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Immediate, user-triggered save of the canvas state.
    pub fn save_now(
        &mut self,
        document: &Document,
        store: &mut dyn ProjectStore,
    ) -> Result<(), EditorError> {
        let patch = ProjectPatch {
            canvas_state: Some(serialize_canvas_state(document)?),
            ..Default::default()
        };
        store.update_project(&self.project_id, patch)?;
        log::debug!("saved canvas state for project {}", self.project_id);
        Ok(())
    }

    /// Saves the canvas state together with extra record fields, e.g.
    /// after a tool rewrote the current image URL.
    pub fn save_with(
        &mut self,
        document: &Document,
        store: &mut dyn ProjectStore,
        mut patch: ProjectPatch,
    ) -> Result<(), EditorError> {
        patch.canvas_state = Some(serialize_canvas_state(document)?);
        store.update_project(&self.project_id, patch)?;
        Ok(())
    }

    /// Drops any scheduled save; used at teardown.
    pub fn cancel_pending(&mut self) {
        self.pending_since = None;
    }
}

pub fn serialize_canvas_state(document: &Document) -> Result<String, EditorError> {
    Ok(serde_json::to_string(&document.serialize())?)
}
