//! Cropping: a user-adjustable rectangle overlay over the active image,
//! applied by computing the crop window in the image's un-scaled source
//! pixel space.
//!
//! While a crop is in progress the target image is made non-interactive
//! and a shape overlay covering the middle 80% of its rendered bounds is
//! placed on the canvas. Applying replaces the image with a new image
//! object carrying the crop window; cancelling restores the stored
//! placement. Either way every overlay shape is removed on exit.

use crate::document::{
    Document, ImageObject, ObjectCommon, ObjectId, ShapeObject, VisualObject,
};
use crate::error::EditorError;

/// Preset crop aspect ratios (width / height); `None` is freeform.
pub const CROP_RATIOS: [(&str, Option<f32>); 5] = [
    ("Freeform", None),
    ("Square", Some(1.0)),
    ("Widescreen", Some(16.0 / 9.0)),
    ("Portrait", Some(4.0 / 5.0)),
    ("Story", Some(9.0 / 16.0)),
];

/// An in-progress crop. Holds the target image's original placement so
/// cancelling is lossless.
#[derive(Debug)]
pub struct CropSession {
    image_id: ObjectId,
    overlay_id: ObjectId,
    original: ObjectCommon,
    aspect_ratio: Option<f32>,
}

impl CropSession {
    /// Enters crop mode on the active image.
    pub fn begin(document: &mut Document) -> Result<Self, EditorError> {
        let image = document.active_image().ok_or(EditorError::NoActiveImage)?;
        let image_id = image.common.id;
        let original = image.common.clone();
        let (left, top, width, height) = image.bounding_rect();

        // Stray overlays from an interrupted crop must not stack up.
        document.remove_all_shapes();

        document.update_object(image_id, |object| {
            let common = object.common_mut();
            common.selectable = false;
            common.evented = false;
        });

        let overlay = ShapeObject::rect(
            left + width * 0.1,
            top + height * 0.1,
            width * 0.8,
            height * 0.8,
        );
        let overlay_id = document.add_object(VisualObject::Shape(overlay));
        document.set_selection(Some(overlay_id));

        Ok(Self {
            image_id,
            overlay_id,
            original,
            aspect_ratio: None,
        })
    }

    pub fn image_id(&self) -> ObjectId {
        self.image_id
    }

    pub fn overlay_id(&self) -> ObjectId {
        self.overlay_id
    }

    pub fn aspect_ratio(&self) -> Option<f32> {
        self.aspect_ratio
    }

    /// Constrains the overlay to a fixed ratio, recomputing its height
    /// from its current width.
    pub fn set_aspect_ratio(&mut self, document: &mut Document, ratio: Option<f32>) {
        self.aspect_ratio = ratio;
        let Some(ratio) = ratio else { return };
        let overlay_id = self.overlay_id;
        document.update_object(overlay_id, |object| {
            if let VisualObject::Shape(shape) = object {
                let rendered_width = shape.width * shape.common.scale_x;
                shape.height = (rendered_width / ratio) / shape.common.scale_y;
            }
        });
    }

    /// Moves/resizes the overlay to the given canvas-space rectangle,
    /// re-applying the aspect constraint if one is set.
    pub fn set_overlay_rect(
        &self,
        document: &mut Document,
        left: f32,
        top: f32,
        width: f32,
        mut height: f32,
    ) {
        if let Some(ratio) = self.aspect_ratio {
            height = width / ratio;
        }
        let overlay_id = self.overlay_id;
        document.update_object(overlay_id, |object| {
            if let VisualObject::Shape(shape) = object {
                shape.common.scale_x = 1.0;
                shape.common.scale_y = 1.0;
                shape.width = width;
                shape.height = height;
                shape.common.left = left + width / 2.0;
                shape.common.top = top + height / 2.0;
            }
        });
    }

    /// Applies the crop: the overlay is clamped against the image's
    /// rendered bounds, converted to source pixels by dividing out the
    /// image's scale factors, and the image is replaced by one whose
    /// crop window is set and whose on-canvas scale is preserved.
    pub fn apply(self, document: &mut Document) -> Result<ObjectId, EditorError> {
        let image = document
            .object(self.image_id)
            .and_then(|o| o.as_image())
            .ok_or(EditorError::NoActiveImage)?;
        let overlay = document
            .object(self.overlay_id)
            .and_then(|o| match o {
                VisualObject::Shape(s) => Some(s),
                _ => None,
            })
            .ok_or(EditorError::NoActiveImage)?;

        let (img_left, img_top, img_width, img_height) = {
            // Bounds under the original placement: the image was frozen at
            // entry, so its common still matches `self.original`.
            image.bounding_rect()
        };
        let (ovl_left, ovl_top, ovl_width, ovl_height) = overlay.bounding_rect();

        // Clamp the overlay into the image's rendered bounds.
        let crop_left = (ovl_left - img_left).max(0.0);
        let crop_top = (ovl_top - img_top).max(0.0);
        let crop_width = ovl_width.min(img_width - crop_left).max(0.0);
        let crop_height = ovl_height.min(img_height - crop_top).max(0.0);

        // Convert to the un-scaled source pixel space.
        let scale_x = if image.common.scale_x == 0.0 { 1.0 } else { image.common.scale_x };
        let scale_y = if image.common.scale_y == 0.0 { 1.0 } else { image.common.scale_y };
        let source_x = crop_left / scale_x;
        let source_y = crop_top / scale_y;
        let source_width = crop_width / scale_x;
        let source_height = crop_height / scale_y;

        let mut cropped = ImageObject::new(image.src.clone(), source_width, source_height);
        // Crop offsets accumulate over an existing crop window.
        cropped.crop_x = image.crop_x + source_x;
        cropped.crop_y = image.crop_y + source_y;
        cropped.filters = image.filters.clone();
        cropped.common.left = img_left + crop_left + crop_width / 2.0;
        cropped.common.top = img_top + crop_top + crop_height / 2.0;
        cropped.common.scale_x = scale_x;
        cropped.common.scale_y = scale_y;
        cropped.common.angle = self.original.angle;

        log::debug!(
            "crop applied: {}x{} source px at ({}, {})",
            source_width,
            source_height,
            cropped.crop_x,
            cropped.crop_y
        );

        document.remove_object(self.image_id);
        let new_id = document.add_object(VisualObject::Image(cropped));
        document.remove_all_shapes();
        document.set_selection(Some(new_id));
        Ok(new_id)
    }

    /// Abandons the crop, restoring the image's stored placement.
    pub fn cancel(self, document: &mut Document) {
        document.remove_all_shapes();
        let original = self.original;
        let image_id = self.image_id;
        document.update_object(image_id, |object| {
            *object.common_mut() = original;
        });
        document.set_selection(Some(image_id));
    }
}
