use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity for a canvas object, used for selection and diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Attributes shared by every object variant.
///
/// Positions are center-based: `left`/`top` locate the object's center on
/// the canvas. Scale factors are independent per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectCommon {
    pub id: ObjectId,
    pub left: f32,
    pub top: f32,
    pub angle: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub selectable: bool,
    pub evented: bool,
}

impl ObjectCommon {
    pub fn at(left: f32, top: f32) -> Self {
        Self {
            id: ObjectId::new(),
            left,
            top,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            selectable: true,
            evented: true,
        }
    }
}

/// A non-destructive filter effect applied to an image.
///
/// `value` is in the filter's native domain (fractions for most kinds,
/// radians for hue rotation); the adjust tool owns the conversion from
/// user-facing slider units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEffect {
    pub kind: FilterKind,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    Brightness,
    Contrast,
    Saturation,
    Vibrance,
    Blur,
    HueRotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub common: ObjectCommon,
    /// Source URL, possibly carrying a transformation directive query.
    pub src: String,
    /// Width of the visible source window in source pixels.
    pub width: f32,
    /// Height of the visible source window in source pixels.
    pub height: f32,
    /// Crop offset into the source bitmap, in source pixels.
    pub crop_x: f32,
    pub crop_y: f32,
    pub filters: Vec<FilterEffect>,
}

impl ImageObject {
    pub fn new(src: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            common: ObjectCommon::at(0.0, 0.0),
            src: src.into(),
            width,
            height,
            crop_x: 0.0,
            crop_y: 0.0,
            filters: Vec::new(),
        }
    }

    /// On-canvas rendered width (source window scaled).
    pub fn rendered_width(&self) -> f32 {
        self.width * self.common.scale_x
    }

    pub fn rendered_height(&self) -> f32 {
        self.height * self.common.scale_y
    }

    /// Axis-aligned rendered bounds as (left, top, width, height),
    /// ignoring rotation.
    pub fn bounding_rect(&self) -> (f32, f32, f32, f32) {
        let w = self.rendered_width();
        let h = self.rendered_height();
        (self.common.left - w / 2.0, self.common.top - h / 2.0, w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub common: ObjectCommon,
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub fill: String,
    pub align: TextAlign,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect,
}

/// Plain geometric shape. Currently only rectangles, used by the crop
/// tool as its adjustable overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeObject {
    pub common: ObjectCommon,
    pub kind: ShapeKind,
    pub width: f32,
    pub height: f32,
    pub fill: Option<String>,
    pub stroke: Option<String>,
}

impl ShapeObject {
    pub fn rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            common: ObjectCommon::at(left + width / 2.0, top + height / 2.0),
            kind: ShapeKind::Rect,
            width,
            height,
            fill: None,
            stroke: None,
        }
    }

    pub fn rendered_width(&self) -> f32 {
        self.width * self.common.scale_x
    }

    pub fn rendered_height(&self) -> f32 {
        self.height * self.common.scale_y
    }

    pub fn bounding_rect(&self) -> (f32, f32, f32, f32) {
        let w = self.rendered_width();
        let h = self.rendered_height();
        (self.common.left - w / 2.0, self.common.top - h / 2.0, w, h)
    }
}

/// One item placed on the canvas. Tool code dispatches on the variant
/// rather than inspecting dynamic types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VisualObject {
    Image(ImageObject),
    Text(TextObject),
    Shape(ShapeObject),
}

impl VisualObject {
    pub fn id(&self) -> ObjectId {
        self.common().id
    }

    pub fn common(&self) -> &ObjectCommon {
        match self {
            VisualObject::Image(o) => &o.common,
            VisualObject::Text(o) => &o.common,
            VisualObject::Shape(o) => &o.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ObjectCommon {
        match self {
            VisualObject::Image(o) => &mut o.common,
            VisualObject::Text(o) => &mut o.common,
            VisualObject::Shape(o) => &mut o.common,
        }
    }

    pub fn as_image(&self) -> Option<&ImageObject> {
        match self {
            VisualObject::Image(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageObject> {
        match self {
            VisualObject::Image(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match self {
            VisualObject::Text(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match self {
            VisualObject::Text(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, VisualObject::Shape(_))
    }
}
