//! Raster export of the current canvas.
//!
//! The canvas is rendered at 1:1 scale (the session viewport is reset
//! for the duration and restored afterwards, whether or not the export
//! succeeds), encoded in the chosen format, and handed back as bytes for
//! a client-side download.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::document::Document;
use crate::error::EditorError;
use crate::session::EditorSession;

/// Renders a document to pixels. Rendering itself is outside this crate;
/// the editor only orchestrates it.
pub trait CanvasRenderer {
    fn rasterize(&mut self, document: &Document) -> Result<RgbaImage, EditorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg90,
    Jpeg80,
    /// WebP output is always lossless; there is no lossy WebP encoder.
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png,
        ExportFormat::Jpeg90,
        ExportFormat::Jpeg80,
        ExportFormat::Webp,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG (High Quality)",
            ExportFormat::Jpeg90 => "JPEG (90% Quality)",
            ExportFormat::Jpeg80 => "JPEG (80% Quality)",
            ExportFormat::Webp => "WebP (Lossless)",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg90 | ExportFormat::Jpeg80 => "jpg",
            ExportFormat::Webp => "webp",
        }
    }

    /// JPEG quality setting; `None` for the losslessly encoded formats.
    pub fn quality(&self) -> Option<u8> {
        match self {
            ExportFormat::Jpeg90 => Some(90),
            ExportFormat::Jpeg80 => Some(80),
            ExportFormat::Png | ExportFormat::Webp => None,
        }
    }
}

/// An encoded export, named after the project title.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Exports the current canvas.
///
/// The plan's monthly export allowance is checked up front; a denial is
/// expected control flow (the caller shows an upgrade prompt). The
/// viewport is restored on every exit path.
pub fn export_image(
    session: &mut EditorSession,
    renderer: &mut dyn CanvasRenderer,
    format: ExportFormat,
    exports_this_month: u32,
) -> Result<ExportedImage, EditorError> {
    if !session.plan().can_export(exports_this_month) {
        return Err(EditorError::ExportLimitReached);
    }

    let saved_zoom = session.viewport().zoom;
    session.set_zoom(1.0);
    let result = renderer
        .rasterize(session.document())
        .and_then(|pixels| encode(&pixels, format));
    session.set_zoom(saved_zoom);

    let bytes = result?;
    let filename = format!("{}.{}", session.project().title, format.extension());
    log::info!("exported {} ({} bytes)", filename, bytes.len());
    Ok(ExportedImage { filename, bytes })
}

fn encode(pixels: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>, EditorError> {
    let (width, height) = pixels.dimensions();
    let mut out = Vec::new();
    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut out).write_image(
                pixels.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        ExportFormat::Jpeg90 | ExportFormat::Jpeg80 => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, format.quality().unwrap_or(90)).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ExportFormat::Webp => {
            WebPEncoder::new_lossless(&mut out).write_image(
                pixels.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
    }
    Ok(out)
}
