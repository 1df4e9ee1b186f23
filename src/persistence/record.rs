use serde::{Deserialize, Serialize};

use crate::error::{EditorError, RemoteError};
use crate::plan::PlanAccess;

/// Durable counterpart of a document, authoritative at rest and across
/// sessions. The in-memory document is authoritative while a session is
/// live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub original_image_url: Option<String>,
    pub current_image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Opaque serialized document state (JSON).
    pub canvas_state: Option<String>,
    /// Last-applied transformation directive string.
    pub active_transformations: Option<String>,
    pub background_removed: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

/// A field-sparse update. `None` leaves the field untouched, so
/// concurrent writers only clobber what they actually send.
///
/// `active_transformations` distinguishes "leave unchanged" (`None`) from
/// "clear" (`Some(None)`): reset-to-original must drop the descriptor.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub canvas_state: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub current_image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub active_transformations: Option<Option<String>>,
    pub background_removed: Option<bool>,
}

impl ProjectPatch {
    /// Applies the patch to a record, bumping its update timestamp.
    /// Last writer wins; there is no concurrency check.
    pub fn apply_to(&self, record: &mut ProjectRecord, now: u64) {
        if let Some(state) = &self.canvas_state {
            record.canvas_state = Some(state.clone());
        }
        if let Some(width) = self.width {
            record.width = width;
        }
        if let Some(height) = self.height {
            record.height = height;
        }
        if let Some(url) = &self.current_image_url {
            record.current_image_url = Some(url.clone());
        }
        if let Some(url) = &self.thumbnail_url {
            record.thumbnail_url = Some(url.clone());
        }
        if let Some(transformations) = &self.active_transformations {
            record.active_transformations = transformations.clone();
        }
        if let Some(removed) = self.background_removed {
            record.background_removed = removed;
        }
        record.updated_at = now;
    }
}

/// The remote store holding project records.
pub trait ProjectStore {
    fn get_project(&self, project_id: &str) -> Result<ProjectRecord, RemoteError>;

    fn create_project(&mut self, record: ProjectRecord) -> Result<(), RemoteError>;

    fn update_project(&mut self, project_id: &str, patch: ProjectPatch) -> Result<(), RemoteError>;

    fn delete_project(&mut self, project_id: &str) -> Result<(), RemoteError>;
}

/// Result of pushing an image binary to the upload collaborator.
#[derive(Debug, Clone)]
pub struct UploadResult {
    pub url: String,
    pub thumbnail_url: String,
    pub width: u32,
    pub height: u32,
}

/// Accepts a binary image payload and materializes it as a hosted URL.
pub trait Uploader {
    fn upload(&mut self, data: &[u8], filename: &str) -> Result<UploadResult, RemoteError>;
}

/// Uploads an image and inserts a fresh project record sized to it.
///
/// The plan's project limit is checked first; an upload failure
/// propagates and nothing is inserted.
pub fn create_project(
    store: &mut dyn ProjectStore,
    uploader: &mut dyn Uploader,
    plan: &PlanAccess,
    existing_project_count: u32,
    id: impl Into<String>,
    title: impl Into<String>,
    data: &[u8],
    filename: &str,
    now: u64,
) -> Result<ProjectRecord, EditorError> {
    if !plan.can_create_project(existing_project_count) {
        return Err(EditorError::ProjectLimitReached);
    }

    let uploaded = uploader.upload(data, filename)?;
    let record = ProjectRecord {
        id: id.into(),
        title: title.into(),
        original_image_url: Some(uploaded.url.clone()),
        current_image_url: Some(uploaded.url),
        thumbnail_url: Some(uploaded.thumbnail_url),
        width: uploaded.width,
        height: uploaded.height,
        canvas_state: None,
        active_transformations: None,
        background_removed: false,
        created_at: now,
        updated_at: now,
    };
    store.create_project(record.clone())?;
    log::info!("created project {} ({}x{})", record.id, record.width, record.height);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;

    struct NullStore {
        created: Vec<ProjectRecord>,
    }

    impl ProjectStore for NullStore {
        fn get_project(&self, _: &str) -> Result<ProjectRecord, RemoteError> {
            Err(RemoteError::NotFound)
        }
        fn create_project(&mut self, record: ProjectRecord) -> Result<(), RemoteError> {
            self.created.push(record);
            Ok(())
        }
        fn update_project(&mut self, _: &str, _: ProjectPatch) -> Result<(), RemoteError> {
            Ok(())
        }
        fn delete_project(&mut self, _: &str) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    struct FixedUploader {
        fail: bool,
    }

    impl Uploader for FixedUploader {
        fn upload(&mut self, _: &[u8], filename: &str) -> Result<UploadResult, RemoteError> {
            if self.fail {
                return Err(RemoteError::Unavailable("upload rejected".to_owned()));
            }
            Ok(UploadResult {
                url: format!("https://cdn.example/{filename}"),
                thumbnail_url: format!("https://cdn.example/thumb/{filename}"),
                width: 640,
                height: 480,
            })
        }
    }

    #[test]
    fn creation_sizes_the_record_to_the_upload() {
        let mut store = NullStore { created: Vec::new() };
        let mut uploader = FixedUploader { fail: false };
        let plan = PlanAccess::new(Plan::Free);

        let record = create_project(
            &mut store, &mut uploader, &plan, 0, "p1", "beach", b"png bytes", "beach.png", 7,
        )
        .unwrap();

        assert_eq!(record.width, 640);
        assert_eq!(record.height, 480);
        assert_eq!(record.original_image_url, record.current_image_url);
        assert_eq!(store.created.len(), 1);
    }

    #[test]
    fn creation_is_refused_at_the_free_project_limit() {
        let mut store = NullStore { created: Vec::new() };
        let mut uploader = FixedUploader { fail: false };
        let plan = PlanAccess::new(Plan::Free);

        let err = create_project(
            &mut store, &mut uploader, &plan, 3, "p1", "beach", b"png bytes", "beach.png", 7,
        )
        .unwrap_err();
        assert!(matches!(err, EditorError::ProjectLimitReached));
        assert!(store.created.is_empty());
    }

    #[test]
    fn a_failed_upload_inserts_nothing() {
        let mut store = NullStore { created: Vec::new() };
        let mut uploader = FixedUploader { fail: true };
        let plan = PlanAccess::new(Plan::Pro);

        let err = create_project(
            &mut store, &mut uploader, &plan, 0, "p1", "beach", b"png bytes", "beach.png", 7,
        )
        .unwrap_err();
        assert!(matches!(err, EditorError::Remote(_)));
        assert!(store.created.is_empty());
    }
}
