//! In-memory representation of one project's canvas.
//!
//! The document owns an ordered list of visual objects (insertion order is
//! paint order, back to front), the canvas dimensions and background, and
//! the current selection. Every mutating call pushes a [`DocumentEvent`]
//! into an internal queue; the session coordinator drains the queue and
//! feeds the history manager and the persistence reconciler, each of which
//! does its own timer-based coalescing.

mod object;

pub use object::{
    FilterEffect, FilterKind, ImageObject, ObjectCommon, ObjectId, ShapeKind, ShapeObject,
    TextAlign, TextObject, VisualObject,
};

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

/// Mutation notifications consumed by the history manager and the
/// persistence reconciler.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    ObjectAdded(ObjectId),
    ObjectRemoved(ObjectId),
    ObjectModified(ObjectId),
    CanvasResized(Dimensions),
    SelectionChanged(Option<ObjectId>),
    /// Contents were replaced wholesale (undo/redo or hydration).
    Restored,
}

impl DocumentEvent {
    /// Whether this event represents an edit that should be snapshotted
    /// and persisted. Selection changes are transient UI state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, DocumentEvent::SelectionChanged(_))
    }
}

/// Structural snapshot of a document, suitable for history entries and
/// for the persisted `canvasState` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    pub dimensions: Dimensions,
    pub background: String,
    pub objects: Vec<VisualObject>,
}

#[derive(Debug)]
pub struct Document {
    dimensions: Dimensions,
    background: String,
    objects: Vec<VisualObject>,
    selection: Option<ObjectId>,
    events: Vec<DocumentEvent>,
}

impl Document {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            background: DEFAULT_BACKGROUND.to_owned(),
            objects: Vec::new(),
            selection: None,
            events: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    /// Changes the canvas bounds. Objects are not rescaled; only the
    /// bounds change.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        if self.dimensions != dimensions {
            self.dimensions = dimensions;
            self.events.push(DocumentEvent::CanvasResized(dimensions));
        }
    }

    pub fn objects(&self) -> &[VisualObject] {
        &self.objects
    }

    pub fn add_object(&mut self, object: VisualObject) -> ObjectId {
        let id = object.id();
        self.objects.push(object);
        self.events.push(DocumentEvent::ObjectAdded(id));
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<VisualObject> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        if self.selection == Some(id) {
            self.selection = None;
            self.events.push(DocumentEvent::SelectionChanged(None));
        }
        let removed = self.objects.remove(index);
        self.events.push(DocumentEvent::ObjectRemoved(id));
        Some(removed)
    }

    pub fn object(&self, id: ObjectId) -> Option<&VisualObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Mutates one object in place and records a modification event.
    /// Returns `false` if the object no longer exists.
    pub fn update_object(&mut self, id: ObjectId, f: impl FnOnce(&mut VisualObject)) -> bool {
        match self.objects.iter_mut().find(|o| o.id() == id) {
            Some(object) => {
                f(object);
                self.events.push(DocumentEvent::ObjectModified(id));
                true
            }
            None => false,
        }
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn selected_object(&self) -> Option<&VisualObject> {
        self.selection.and_then(|id| self.object(id))
    }

    pub fn set_selection(&mut self, id: Option<ObjectId>) {
        if id.is_some() && id.map(|i| self.object(i).is_none()).unwrap_or(false) {
            log::warn!("attempted to select an object that is not on the canvas");
            return;
        }
        if self.selection != id {
            self.selection = id;
            self.events.push(DocumentEvent::SelectionChanged(id));
        }
    }

    /// The image a tool should operate on: the current selection when it
    /// is an image, else the first image on the canvas.
    pub fn active_image(&self) -> Option<&ImageObject> {
        if let Some(selected) = self.selected_object() {
            if let Some(image) = selected.as_image() {
                return Some(image);
            }
        }
        self.objects.iter().find_map(|o| o.as_image())
    }

    pub fn active_image_id(&self) -> Option<ObjectId> {
        self.active_image().map(|i| i.common.id)
    }

    /// The text object a tool should operate on: only ever the current
    /// selection (text edits never fall back to an arbitrary object).
    pub fn selected_text(&self) -> Option<&TextObject> {
        self.selected_object().and_then(|o| o.as_text())
    }

    /// Removes every shape object from the canvas. Shapes are only used
    /// as crop overlays, so this is the crop tool's cleanup.
    pub fn remove_all_shapes(&mut self) {
        let ids: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|o| o.is_shape())
            .map(|o| o.id())
            .collect();
        for id in ids {
            self.remove_object(id);
        }
    }

    pub fn serialize(&self) -> DocumentState {
        DocumentState {
            dimensions: self.dimensions,
            background: self.background.clone(),
            objects: self.objects.clone(),
        }
    }

    /// Replaces the document contents in place, preserving the document
    /// identity so attached observers keep working.
    pub fn restore(&mut self, state: &DocumentState) {
        self.dimensions = state.dimensions;
        self.background = state.background.clone();
        self.objects = state.objects.clone();
        self.selection = None;
        self.events.push(DocumentEvent::Restored);
    }

    /// Drains the pending mutation events.
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Releases the document's contents at session teardown.
    pub fn dispose(&mut self) {
        self.objects.clear();
        self.selection = None;
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(Dimensions::new(800, 600))
    }

    #[test]
    fn active_image_prefers_selection_then_first() {
        let mut d = doc();
        let first = d.add_object(VisualObject::Image(ImageObject::new("a.png", 10.0, 10.0)));
        let second = d.add_object(VisualObject::Image(ImageObject::new("b.png", 10.0, 10.0)));

        assert_eq!(d.active_image_id(), Some(first));

        d.set_selection(Some(second));
        assert_eq!(d.active_image_id(), Some(second));
    }

    #[test]
    fn restore_preserves_identity_and_replaces_contents() {
        let mut d = doc();
        d.add_object(VisualObject::Image(ImageObject::new("a.png", 10.0, 10.0)));
        let before = d.serialize();

        d.add_object(VisualObject::Image(ImageObject::new("b.png", 10.0, 10.0)));
        assert_eq!(d.objects().len(), 2);

        d.restore(&before);
        assert_eq!(d.objects().len(), 1);
        assert_eq!(d.serialize(), before);
    }

    #[test]
    fn selection_events_are_not_mutations() {
        let mut d = doc();
        let id = d.add_object(VisualObject::Image(ImageObject::new("a.png", 10.0, 10.0)));
        d.take_events();

        d.set_selection(Some(id));
        let events = d.take_events();
        assert!(events.iter().all(|e| !e.is_mutation()));
    }
}
