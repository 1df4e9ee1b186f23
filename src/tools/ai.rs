//! AI-assisted image replacement: retouch presets, directional extension,
//! and background removal.
//!
//! Each operation builds a new source URL by rewriting the image's
//! transformation directive string, asks the remote image service to
//! materialize it, and atomically swaps the result in for the prior image
//! object. The old object is not removed until the new one exists, so a
//! failed fetch leaves the document unmodified. All three are gated by
//! the session's busy flag; a second invocation while one is outstanding
//! is rejected.

use crate::directive;
use crate::document::{ImageObject, ObjectId, VisualObject};
use crate::error::EditorError;
use crate::persistence::{ProjectPatch, ProjectStore};
use crate::session::{EditorSession, ImageFetcher};

/// Directives that mark an image as having had its background removed or
/// replaced.
const BACKGROUND_DIRECTIVES: [&str; 3] = ["e-bgremove", "e-removedotbg", "e-changebg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetouchPreset {
    AiRetouch,
    AiUpscale,
    EnhanceSharpen,
    PremiumQuality,
}

impl RetouchPreset {
    pub const ALL: [RetouchPreset; 4] = [
        RetouchPreset::AiRetouch,
        RetouchPreset::AiUpscale,
        RetouchPreset::EnhanceSharpen,
        RetouchPreset::PremiumQuality,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RetouchPreset::AiRetouch => "AI Retouch",
            RetouchPreset::AiUpscale => "AI Upscale",
            RetouchPreset::EnhanceSharpen => "Enhance & Sharpen",
            RetouchPreset::PremiumQuality => "Premium Quality",
        }
    }

    /// The ordered directive list this preset applies.
    pub fn directives(&self) -> &'static str {
        match self {
            RetouchPreset::AiRetouch => "e-retouch",
            RetouchPreset::AiUpscale => "e-upscale",
            RetouchPreset::EnhanceSharpen => "e-retouch,e-contrast,e-sharpen",
            RetouchPreset::PremiumQuality => "e-retouch,e-upscale,e-contrast,e-sharpen",
        }
    }
}

/// Retouch effects are cumulative: the preset's directives merge into the
/// URL's existing list.
pub fn build_retouch_url(image_url: &str, preset: RetouchPreset) -> String {
    directive::merge(image_url, preset.directives())
}

/// Applies a retouch preset to the active image, preserving its
/// placement, rotation, and scale.
pub fn apply_retouch(
    session: &mut EditorSession,
    store: &mut dyn ProjectStore,
    fetcher: &mut dyn ImageFetcher,
    preset: RetouchPreset,
) -> Result<ObjectId, EditorError> {
    let (id, src, common) = active_image_parts(session)?;

    session.begin_processing(format!("Enhancing image with {}...", preset.label()))?;
    let result: Result<ObjectId, EditorError> = (|| {
        let url = build_retouch_url(&src, preset);
        let info = fetcher.fetch_image(&url)?;

        let mut replacement = ImageObject::new(url.clone(), info.width as f32, info.height as f32);
        replacement.common.left = common.left;
        replacement.common.top = common.top;
        replacement.common.angle = common.angle;
        replacement.common.scale_x = common.scale_x;
        replacement.common.scale_y = common.scale_y;

        let new_id = swap_image(session, id, replacement);
        let patch = ProjectPatch {
            current_image_url: Some(url),
            active_transformations: Some(Some(preset.directives().to_owned())),
            ..Default::default()
        };
        session.persist(store, patch)?;
        log::info!("applied retouch preset {:?}", preset);
        Ok(new_id)
    })();
    session.finish_processing();
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl ExtendDirection {
    fn is_horizontal(&self) -> bool {
        matches!(self, ExtendDirection::Left | ExtendDirection::Right)
    }

    /// Generative fill anchors the original content opposite the
    /// extension direction.
    fn focus_directive(&self) -> &'static str {
        match self {
            ExtendDirection::Left => "fo-right",
            ExtendDirection::Right => "fo-left",
            ExtendDirection::Top => "fo-bottom",
            ExtendDirection::Bottom => "fo-top",
        }
    }
}

/// Target pixel dimensions for an extension: the image's rendered size
/// plus the amount along the chosen axis.
pub fn extension_dimensions(
    image: &ImageObject,
    direction: ExtendDirection,
    amount: u32,
) -> (u32, u32) {
    let width = image.rendered_width()
        + if direction.is_horizontal() { amount as f32 } else { 0.0 };
    let height = image.rendered_height()
        + if direction.is_horizontal() { 0.0 } else { amount as f32 };
    (width.round() as u32, height.round() as u32)
}

/// Extension must not compound earlier directives, so it always starts
/// from the bare base URL.
pub fn build_extension_url(
    image_url: &str,
    direction: ExtendDirection,
    width: u32,
    height: u32,
) -> String {
    let directives = vec![
        "bg-genfill".to_owned(),
        format!("w-{width}"),
        format!("h-{height}"),
        "cm-pad_resize".to_owned(),
        direction.focus_directive().to_owned(),
    ];
    directive::with_directives(directive::base_url(image_url), &directives)
}

/// Extends the active image in one direction with generative fill. The
/// replacement is larger than the original, so it is re-scaled to fit
/// the canvas and centered rather than keeping the old scale.
pub fn apply_extension(
    session: &mut EditorSession,
    store: &mut dyn ProjectStore,
    fetcher: &mut dyn ImageFetcher,
    direction: ExtendDirection,
    amount: u32,
) -> Result<ObjectId, EditorError> {
    let (id, src, _) = active_image_parts(session)?;
    if directive::contains_any(&src, &BACKGROUND_DIRECTIVES) {
        return Err(EditorError::BackgroundAlreadyRemoved);
    }
    let image = session
        .document()
        .active_image()
        .ok_or(EditorError::NoActiveImage)?;
    let (width, height) = extension_dimensions(image, direction, amount);

    session.begin_processing("Extending image with AI...")?;
    let result: Result<ObjectId, EditorError> = (|| {
        let url = build_extension_url(&src, direction, width, height);
        let info = fetcher.fetch_image(&url)?;

        let canvas = session.document().dimensions();
        let scale = (canvas.width as f32 / info.width as f32)
            .min(canvas.height as f32 / info.height as f32)
            .min(1.0);

        let mut replacement = ImageObject::new(url.clone(), info.width as f32, info.height as f32);
        replacement.common.scale_x = scale;
        replacement.common.scale_y = scale;
        replacement.common.left = canvas.width as f32 / 2.0;
        replacement.common.top = canvas.height as f32 / 2.0;

        let new_id = swap_image(session, id, replacement);
        let patch = ProjectPatch {
            current_image_url: Some(url),
            ..Default::default()
        };
        session.persist(store, patch)?;
        log::info!("extended image {:?} by {amount}px", direction);
        Ok(new_id)
    })();
    session.finish_processing();
    result
}

/// Removes the background of the active image, preserving its placement.
/// The project record's `background_removed` flag is set with the save.
pub fn apply_background_removal(
    session: &mut EditorSession,
    store: &mut dyn ProjectStore,
    fetcher: &mut dyn ImageFetcher,
) -> Result<ObjectId, EditorError> {
    let (id, src, common) = active_image_parts(session)?;

    session.begin_processing("Removing background with AI...")?;
    let result: Result<ObjectId, EditorError> = (|| {
        let url = directive::merge(&src, "e-bgremove");
        let info = fetcher.fetch_image(&url)?;

        let mut replacement = ImageObject::new(url.clone(), info.width as f32, info.height as f32);
        replacement.common.left = common.left;
        replacement.common.top = common.top;
        replacement.common.angle = common.angle;
        replacement.common.scale_x = common.scale_x;
        replacement.common.scale_y = common.scale_y;

        let new_id = swap_image(session, id, replacement);
        let patch = ProjectPatch {
            current_image_url: Some(url),
            background_removed: Some(true),
            ..Default::default()
        };
        session.persist(store, patch)?;
        log::info!("removed image background");
        Ok(new_id)
    })();
    session.finish_processing();
    result
}

fn active_image_parts(
    session: &EditorSession,
) -> Result<(ObjectId, String, crate::document::ObjectCommon), EditorError> {
    let image = session
        .document()
        .active_image()
        .ok_or(EditorError::NoActiveImage)?;
    Ok((image.common.id, image.src.clone(), image.common.clone()))
}

fn swap_image(session: &mut EditorSession, old: ObjectId, replacement: ImageObject) -> ObjectId {
    let document = session.document_mut();
    document.remove_object(old);
    let new_id = document.add_object(VisualObject::Image(replacement));
    document.set_selection(Some(new_id));
    new_id
}
