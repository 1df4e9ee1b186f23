//! Canvas resize: direct width/height entry with an optional aspect-ratio
//! lock, and preset aspect ratios that approximately preserve total pixel
//! area. Objects are never rescaled; only the canvas bounds change.

use crate::document::Dimensions;
use crate::error::EditorError;
use crate::persistence::{ProjectPatch, ProjectStore};
use crate::session::EditorSession;

/// Named preset ratios offered by the resize tool.
pub const ASPECT_PRESETS: [(&str, u32, u32); 6] = [
    ("Instagram Story", 9, 16),
    ("Instagram Post", 1, 1),
    ("Youtube Thumbnail", 16, 9),
    ("Portrait", 2, 3),
    ("Facebook Cover", 851, 315),
    ("Twitter Header", 3, 1),
];

/// Height matching `width` under the original aspect ratio.
pub fn height_for_width(original: Dimensions, width: u32) -> u32 {
    let ratio = original.height as f64 / original.width as f64;
    (width as f64 * ratio).round() as u32
}

/// Width matching `height` under the original aspect ratio.
pub fn width_for_height(original: Dimensions, height: u32) -> u32 {
    let ratio = original.width as f64 / original.height as f64;
    (height as f64 * ratio).round() as u32
}

/// Dimensions for a preset ratio, derived to approximately preserve the
/// original pixel area rather than either original dimension.
pub fn dimensions_for_preset(original: Dimensions, ratio_w: u32, ratio_h: u32) -> Dimensions {
    let aspect = ratio_w as f64 / ratio_h as f64;
    let height = (original.area() / aspect).sqrt();
    let width = height * aspect;
    Dimensions::new(width.round() as u32, height.round() as u32)
}

/// Applies a canvas resize and persists the new bounds immediately.
///
/// A no-change request is skipped. Returns whether anything changed.
pub fn apply_resize(
    session: &mut EditorSession,
    store: &mut dyn ProjectStore,
    new: Dimensions,
) -> Result<bool, EditorError> {
    if new == session.document().dimensions() {
        return Ok(false);
    }

    session.begin_processing("Resizing canvas...")?;
    let result = resize_inner(session, store, new);
    session.finish_processing();
    result.map(|_| true)
}

fn resize_inner(
    session: &mut EditorSession,
    store: &mut dyn ProjectStore,
    new: Dimensions,
) -> Result<(), EditorError> {
    session.document_mut().set_dimensions(new);

    let patch = ProjectPatch {
        width: Some(new.width),
        height: Some(new.height),
        ..Default::default()
    };
    session.persist(store, patch)?;
    log::info!("resized canvas to {}x{}", new.width, new.height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_lock_does_not_drift_under_rederivation() {
        let original = Dimensions::new(1237, 829);
        for width in [100u32, 640, 1237, 1920, 4999] {
            let height = height_for_width(original, width);
            let rederived = width_for_height(original, height);
            assert!(
                rederived.abs_diff(width) <= 1,
                "width {width} -> height {height} -> width {rederived}"
            );
        }
    }

    #[test]
    fn locked_resize_scales_both_dimensions() {
        let original = Dimensions::new(800, 600);
        assert_eq!(height_for_width(original, 1600), 1200);
    }

    #[test]
    fn presets_preserve_pixel_area() {
        let original = Dimensions::new(800, 600);
        for (_, rw, rh) in ASPECT_PRESETS {
            let d = dimensions_for_preset(original, rw, rh);
            let area = d.area();
            let drift = (area - original.area()).abs() / original.area();
            assert!(drift < 0.01, "{rw}:{rh} drifted {drift}");
        }
    }
}
