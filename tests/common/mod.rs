//! Shared in-memory fakes for the remote collaborators.

use std::collections::HashMap;

use image::RgbaImage;
use pixelforge::document::Document;
use pixelforge::error::{EditorError, RemoteError};
use pixelforge::export::CanvasRenderer;
use pixelforge::persistence::{ProjectPatch, ProjectRecord, ProjectStore};
use pixelforge::session::{ImageFetcher, ImageInfo};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory project store with a deterministic logical clock.
#[derive(Default)]
pub struct MemoryStore {
    pub records: HashMap<String, ProjectRecord>,
    pub update_count: usize,
    clock: u64,
}

impl MemoryStore {
    pub fn with_project(record: ProjectRecord) -> Self {
        let mut store = Self::default();
        store.records.insert(record.id.clone(), record);
        store
    }

    pub fn record(&self, id: &str) -> &ProjectRecord {
        &self.records[id]
    }
}

impl ProjectStore for MemoryStore {
    fn get_project(&self, project_id: &str) -> Result<ProjectRecord, RemoteError> {
        self.records
            .get(project_id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    fn create_project(&mut self, record: ProjectRecord) -> Result<(), RemoteError> {
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    fn update_project(&mut self, project_id: &str, patch: ProjectPatch) -> Result<(), RemoteError> {
        self.clock += 1;
        self.update_count += 1;
        let clock = self.clock;
        let record = self
            .records
            .get_mut(project_id)
            .ok_or(RemoteError::NotFound)?;
        patch.apply_to(record, clock);
        Ok(())
    }

    fn delete_project(&mut self, project_id: &str) -> Result<(), RemoteError> {
        self.records
            .remove(project_id)
            .map(|_| ())
            .ok_or(RemoteError::NotFound)
    }
}

/// Image service stub: reports fixed dimensions and remembers every URL
/// it was asked to materialize.
pub struct StubFetcher {
    pub dimensions: (u32, u32),
    pub fetched: Vec<String>,
    pub fail: bool,
}

impl StubFetcher {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: (width, height),
            fetched: Vec::new(),
            fail: false,
        }
    }
}

impl ImageFetcher for StubFetcher {
    fn fetch_image(&mut self, url: &str) -> Result<ImageInfo, RemoteError> {
        if self.fail {
            return Err(RemoteError::Unavailable("stub offline".to_owned()));
        }
        self.fetched.push(url.to_owned());
        Ok(ImageInfo {
            width: self.dimensions.0,
            height: self.dimensions.1,
        })
    }
}

/// Renderer stub: a solid bitmap sized to the canvas.
pub struct StubRenderer;

impl CanvasRenderer for StubRenderer {
    fn rasterize(&mut self, document: &Document) -> Result<RgbaImage, EditorError> {
        let d = document.dimensions();
        Ok(RgbaImage::from_pixel(
            d.width,
            d.height,
            image::Rgba([255, 255, 255, 255]),
        ))
    }
}

pub fn sample_project(id: &str) -> ProjectRecord {
    ProjectRecord {
        id: id.to_owned(),
        title: "sunset".to_owned(),
        original_image_url: Some("https://cdn.example/sunset.png".to_owned()),
        current_image_url: Some("https://cdn.example/sunset.png".to_owned()),
        thumbnail_url: None,
        width: 800,
        height: 600,
        canvas_state: None,
        active_transformations: None,
        background_removed: false,
        created_at: 1,
        updated_at: 1,
    }
}
