//! Image adjustments: an ordered, sparse list of filter effects on the
//! active image.
//!
//! Slider values are user-facing units (-100..100, degrees for hue) and
//! are converted to each filter's native domain on write; re-selecting an
//! image reconstructs the slider values by reversing the transform and
//! rounding to the nearest integer. Sliders left at their default produce
//! no filter entry at all.

use std::f32::consts::PI;

use crate::document::{Document, FilterEffect, FilterKind};
use crate::error::EditorError;

/// User-facing slider values. All default to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adjustments {
    /// -100..100
    pub brightness: i32,
    /// -100..100
    pub contrast: i32,
    /// -100..100
    pub saturation: i32,
    /// -100..100
    pub vibrance: i32,
    /// 0..100
    pub blur: i32,
    /// -180..180 degrees
    pub hue: i32,
}

impl Adjustments {
    /// Slider order is the order filters are applied in.
    fn entries(&self) -> [(FilterKind, i32); 6] {
        [
            (FilterKind::Brightness, self.brightness),
            (FilterKind::Contrast, self.contrast),
            (FilterKind::Saturation, self.saturation),
            (FilterKind::Vibrance, self.vibrance),
            (FilterKind::Blur, self.blur),
            (FilterKind::HueRotation, self.hue),
        ]
    }
}

/// Slider units -> the filter's native numeric domain.
fn to_native(kind: FilterKind, value: i32) -> f32 {
    match kind {
        FilterKind::HueRotation => value as f32 * (PI / 180.0),
        _ => value as f32 / 100.0,
    }
}

/// Native domain -> slider units, rounded to the nearest integer.
fn to_slider(kind: FilterKind, value: f32) -> i32 {
    match kind {
        FilterKind::HueRotation => (value * (180.0 / PI)).round() as i32,
        _ => (value * 100.0).round() as i32,
    }
}

/// Writes the sparse filter list onto the active image. Sliders at their
/// default value are omitted entirely.
pub fn apply_adjustments(document: &mut Document, values: &Adjustments) -> Result<(), EditorError> {
    let id = document.active_image_id().ok_or(EditorError::NoActiveImage)?;

    let filters: Vec<FilterEffect> = values
        .entries()
        .into_iter()
        .filter(|(_, value)| *value != 0)
        .map(|(kind, value)| FilterEffect {
            kind,
            value: to_native(kind, value),
        })
        .collect();

    document.update_object(id, |object| {
        if let Some(image) = object.as_image_mut() {
            image.filters = filters;
        }
    });
    Ok(())
}

/// Clears every filter from the active image.
pub fn reset_adjustments(document: &mut Document) -> Result<(), EditorError> {
    apply_adjustments(document, &Adjustments::default())
}

/// Reconstructs slider values from the active image's existing filter
/// list, for re-selection. A missing filter reads as the default.
pub fn extract_adjustments(document: &Document) -> Result<Adjustments, EditorError> {
    let image = document.active_image().ok_or(EditorError::NoActiveImage)?;

    let mut values = Adjustments::default();
    for filter in &image.filters {
        let slider = to_slider(filter.kind, filter.value);
        match filter.kind {
            FilterKind::Brightness => values.brightness = slider,
            FilterKind::Contrast => values.contrast = slider,
            FilterKind::Saturation => values.saturation = slider,
            FilterKind::Vibrance => values.vibrance = slider,
            FilterKind::Blur => values.blur = slider,
            FilterKind::HueRotation => values.hue = slider,
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Dimensions, ImageObject, VisualObject};

    fn doc_with_image() -> Document {
        let mut d = Document::new(Dimensions::new(800, 600));
        d.add_object(VisualObject::Image(ImageObject::new("a.png", 100.0, 100.0)));
        d
    }

    #[test]
    fn slider_round_trip_is_exact_under_rounding() {
        let mut d = doc_with_image();
        for v in -100..=100 {
            let values = Adjustments {
                brightness: v,
                hue: v,
                ..Default::default()
            };
            apply_adjustments(&mut d, &values).unwrap();
            let read = extract_adjustments(&d).unwrap();
            assert_eq!(read.brightness, v);
            assert_eq!(read.hue, v);
        }
    }

    #[test]
    fn defaults_produce_an_empty_filter_list() {
        let mut d = doc_with_image();
        apply_adjustments(&mut d, &Adjustments::default()).unwrap();
        assert!(d.active_image().unwrap().filters.is_empty());

        apply_adjustments(
            &mut d,
            &Adjustments {
                contrast: 30,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(d.active_image().unwrap().filters.len(), 1);

        reset_adjustments(&mut d).unwrap();
        assert!(d.active_image().unwrap().filters.is_empty());
    }

    #[test]
    fn missing_image_is_a_validation_no_op() {
        let mut d = Document::new(Dimensions::new(800, 600));
        let err = apply_adjustments(&mut d, &Adjustments::default()).unwrap_err();
        assert!(matches!(err, EditorError::NoActiveImage));
        assert!(!d.has_pending_events());
    }
}
