//! The session coordinator: owns the single live document, the active
//! tool, and the shared busy flag, and sequences initialization and
//! teardown.
//!
//! Initialization order: fetch the remote project record, construct the
//! document, hydrate the primary image and any saved canvas state, then
//! mark ready (capturing the initial history snapshot). At runtime the
//! coordinator's [`EditorSession::pump`] drains document mutation events
//! into the history manager and the persistence reconciler, each of which
//! coalesces on its own timer.

use std::time::Instant;

use crate::document::{Dimensions, Document, DocumentEvent, DocumentState, ImageObject, VisualObject};
use crate::error::{EditorError, RemoteError};
use crate::history::HistoryManager;
use crate::persistence::{ProjectPatch, ProjectRecord, ProjectStore, Reconciler};
use crate::plan::PlanAccess;
use crate::tools::ToolId;
use crate::util::time;

/// Pixel dimensions reported by the image service for a source URL.
#[derive(Debug, Clone, Copy)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Materializes an image URL (possibly carrying transformation
/// directives) into a loadable bitmap, reporting its dimensions.
pub trait ImageFetcher {
    fn fetch_image(&mut self, url: &str) -> Result<ImageInfo, RemoteError>;
}

/// Zoom/offset state of the on-screen canvas. Kept here so export can
/// reset it to 1:1 and restore it afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

/// Padding the viewport keeps around the canvas when fitting a container.
const FIT_PADDING: f32 = 40.0;

/// Floor for the fitted scale; a container smaller than the padding must
/// not produce a zero or negative zoom.
const MIN_FIT_SCALE: f32 = 0.05;

impl Viewport {
    /// Scale that fits the canvas into a container, never above 1:1.
    pub fn fit_scale(dimensions: Dimensions, container_width: f32, container_height: f32) -> f32 {
        let available_w = container_width - FIT_PADDING;
        let available_h = container_height - FIT_PADDING;
        let scale_x = available_w / dimensions.width as f32;
        let scale_y = available_h / dimensions.height as f32;
        scale_x.min(scale_y).clamp(MIN_FIT_SCALE, 1.0)
    }
}

pub struct EditorSession {
    project: ProjectRecord,
    document: Document,
    history: HistoryManager,
    reconciler: Reconciler,
    plan: PlanAccess,
    active_tool: ToolId,
    processing_message: Option<String>,
    viewport: Viewport,
    ready: bool,
}

impl EditorSession {
    /// Opens an editing session for a persisted project.
    ///
    /// A failed image fetch during hydration is logged and skipped (the
    /// user still gets an empty canvas); a missing or denied project is
    /// fatal to the session.
    pub fn open(
        project_id: &str,
        store: &dyn ProjectStore,
        fetcher: &mut dyn ImageFetcher,
        plan: PlanAccess,
    ) -> Result<Self, EditorError> {
        let project = store.get_project(project_id)?;
        let mut document = Document::new(Dimensions::new(project.width, project.height));

        let image_url = project
            .current_image_url
            .clone()
            .or_else(|| project.original_image_url.clone());
        if let Some(url) = image_url {
            match fetcher.fetch_image(&url) {
                Ok(info) => {
                    let image = place_cover_image(&url, info, document.dimensions());
                    document.add_object(VisualObject::Image(image));
                }
                Err(err) => log::warn!("failed to load project image {url}: {err}"),
            }
        }

        if let Some(saved) = &project.canvas_state {
            match serde_json::from_str::<DocumentState>(saved) {
                Ok(state) => document.restore(&state),
                Err(err) => log::error!("ignoring corrupt saved canvas state: {err}"),
            }
        }

        // Hydration is not a user edit.
        document.take_events();

        let mut history = HistoryManager::new();
        history.record_initial(&document);

        let reconciler = Reconciler::new(project_id);
        log::info!(
            "opened session for project {project_id} ({}x{}, {} objects)",
            project.width,
            project.height,
            document.objects().len()
        );

        Ok(Self {
            project,
            document,
            history,
            reconciler,
            plan,
            active_tool: ToolId::Resize,
            processing_message: None,
            viewport: Viewport::default(),
            ready: true,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn project(&self) -> &ProjectRecord {
        &self.project
    }

    pub fn plan(&self) -> &PlanAccess {
        &self.plan
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.zoom = zoom;
    }

    // ---- Tool selection ----------------------------------------------

    pub fn active_tool(&self) -> ToolId {
        self.active_tool
    }

    /// Switches the active tool, consulting the plan gate first. A denial
    /// changes nothing; the caller shows the upgrade prompt.
    pub fn select_tool(&mut self, tool: ToolId) -> Result<(), EditorError> {
        if !self.plan.has_access(tool) {
            return Err(EditorError::UpgradeRequired(tool));
        }
        self.active_tool = tool;
        Ok(())
    }

    // ---- Busy state machine ------------------------------------------

    /// Marks the session busy with an asynchronous operation. Only one
    /// may be outstanding at a time; a second request is rejected rather
    /// than raced.
    pub fn begin_processing(&mut self, message: impl Into<String>) -> Result<(), EditorError> {
        if let Some(current) = &self.processing_message {
            return Err(EditorError::Busy(current.clone()));
        }
        self.processing_message = Some(message.into());
        Ok(())
    }

    /// Clears the busy flag. Operations call this on every exit path.
    pub fn finish_processing(&mut self) {
        self.processing_message = None;
    }

    pub fn processing_message(&self) -> Option<&str> {
        self.processing_message.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.processing_message.is_some()
    }

    // ---- Event pump ---------------------------------------------------

    /// Drains pending document events into the observers and fires any
    /// debounce timers that have settled. Call regularly with a
    /// monotonically advancing `now`.
    pub fn pump(&mut self, now: Instant, store: &mut dyn ProjectStore) -> Result<(), EditorError> {
        let events = self.document.take_events();
        let mut mutated = false;
        for event in &events {
            if event.is_mutation() {
                mutated = true;
            }
            // Selecting a text object pulls the text tool forward.
            if let DocumentEvent::SelectionChanged(Some(id)) = event {
                let is_text = self
                    .document
                    .object(*id)
                    .map(|o| o.as_text().is_some())
                    .unwrap_or(false);
                if is_text && self.active_tool != ToolId::Text {
                    self.active_tool = ToolId::Text;
                }
            }
        }
        if mutated {
            self.history.note_change(now);
            self.reconciler.schedule_save(now);
        }

        self.history.poll(now, &self.document);
        self.reconciler.poll(now, &self.document, store)?;
        Ok(())
    }

    // ---- History ------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restores the previous snapshot. The restore's own mutation events
    /// are not recorded as a new action, but the result is still queued
    /// for persistence.
    pub fn undo(&mut self, now: Instant) -> Result<(), EditorError> {
        self.history.undo(&mut self.document)?;
        self.document.take_events();
        self.reconciler.schedule_save(now);
        Ok(())
    }

    pub fn redo(&mut self, now: Instant) -> Result<(), EditorError> {
        self.history.redo(&mut self.document)?;
        self.document.take_events();
        self.reconciler.schedule_save(now);
        Ok(())
    }

    // ---- Persistence --------------------------------------------------

    /// Immediate, user-triggered save of the canvas state.
    pub fn save_now(&mut self, store: &mut dyn ProjectStore) -> Result<(), EditorError> {
        self.reconciler.save_now(&self.document, store)
    }

    /// Persists the canvas state plus extra record fields, mirroring the
    /// patch onto the session's local record copy.
    pub fn persist(
        &mut self,
        store: &mut dyn ProjectStore,
        patch: ProjectPatch,
    ) -> Result<(), EditorError> {
        self.reconciler.save_with(&self.document, store, patch.clone())?;
        patch.apply_to(&mut self.project, time::timestamp_millis());
        Ok(())
    }

    /// Rebuilds the document around the original uploaded image and
    /// persists a save that clears the transformation descriptor and the
    /// background-removed flag.
    pub fn reset_to_original(
        &mut self,
        store: &mut dyn ProjectStore,
        fetcher: &mut dyn ImageFetcher,
    ) -> Result<(), EditorError> {
        let url = self
            .project
            .original_image_url
            .clone()
            .ok_or(EditorError::NoOriginalImage)?;

        self.begin_processing("Resetting to original...")?;
        let result = self.reset_inner(store, fetcher, &url);
        self.finish_processing();
        result
    }

    fn reset_inner(
        &mut self,
        store: &mut dyn ProjectStore,
        fetcher: &mut dyn ImageFetcher,
        url: &str,
    ) -> Result<(), EditorError> {
        let info = fetcher.fetch_image(url)?;
        let dimensions = self.document.dimensions();
        let image = place_cover_image(url, info, dimensions);

        let state = DocumentState {
            dimensions,
            background: crate::document::DEFAULT_BACKGROUND.to_owned(),
            objects: vec![VisualObject::Image(image)],
        };
        self.document.restore(&state);

        let patch = ProjectPatch {
            current_image_url: Some(url.to_owned()),
            active_transformations: Some(None),
            background_removed: Some(false),
            ..Default::default()
        };
        self.persist(store, patch)
    }

    /// Releases the document and detaches the observers.
    pub fn close(&mut self) {
        self.document.dispose();
        self.reconciler.cancel_pending();
        self.history.clear();
        self.processing_message = None;
        self.ready = false;
        log::info!("closed session for project {}", self.project.id);
    }
}

/// Places an image at the canvas center, uniformly scaled so it covers
/// the canvas along its tighter axis.
pub(crate) fn place_cover_image(url: &str, info: ImageInfo, canvas: Dimensions) -> ImageObject {
    let mut image = ImageObject::new(url, info.width as f32, info.height as f32);
    let image_aspect = info.width as f32 / info.height as f32;
    let canvas_aspect = canvas.width as f32 / canvas.height as f32;
    let scale = if image_aspect > canvas_aspect {
        canvas.width as f32 / info.width as f32
    } else {
        canvas.height as f32 / info.height as f32
    };
    image.common.scale_x = scale;
    image.common.scale_y = scale;
    image.common.left = canvas.width as f32 / 2.0;
    image.common.top = canvas.height as f32 / 2.0;
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_placement_scales_along_the_tighter_axis() {
        let canvas = Dimensions::new(800, 600);
        let info = ImageInfo { width: 1600, height: 800 }; // wider than the canvas
        let image = place_cover_image("x.png", info, canvas);
        assert_eq!(image.common.scale_x, 0.5);
        assert_eq!(image.common.left, 400.0);
        assert_eq!(image.common.top, 300.0);

        let tall = ImageInfo { width: 400, height: 1200 };
        let image = place_cover_image("x.png", tall, canvas);
        assert_eq!(image.common.scale_y, 0.5);
    }

    #[test]
    fn fit_scale_never_exceeds_one_to_one() {
        let canvas = Dimensions::new(800, 600);
        // Plenty of room: cap at 1.0 rather than upscaling.
        assert_eq!(Viewport::fit_scale(canvas, 2000.0, 2000.0), 1.0);
        // Constrained by width after padding: (440 - 40) / 800.
        assert_eq!(Viewport::fit_scale(canvas, 440.0, 2000.0), 0.5);
    }

    #[test]
    fn fit_scale_stays_positive_in_a_tiny_container() {
        let canvas = Dimensions::new(800, 600);
        // Smaller than the padding itself: floor at the minimum zoom.
        assert_eq!(Viewport::fit_scale(canvas, 20.0, 20.0), 0.05);
        assert_eq!(Viewport::fit_scale(canvas, 40.0, 40.0), 0.05);
    }
}
