use thiserror::Error;

use crate::tools::ToolId;

/// Failures reported by remote collaborators (project store, image
/// service, uploader).
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("project not found")]
    NotFound,

    #[error("access denied")]
    AccessDenied,

    #[error("remote service unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced by editor operations.
///
/// Validation variants (`NoActiveImage`, `NoTextSelected`) mean the
/// operation was a no-op and the document is untouched; callers typically
/// surface them as inline guidance rather than failures. `UpgradeRequired`
/// is expected control flow for plan-gated tools, not a failure path.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no image on the canvas")]
    NoActiveImage,

    #[error("no text object selected")]
    NoTextSelected,

    #[error("another operation is in progress: {0}")]
    Busy(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("tool {0:?} requires an upgraded plan")]
    UpgradeRequired(ToolId),

    #[error("export limit reached for the current plan")]
    ExportLimitReached,

    #[error("project limit reached for the current plan")]
    ProjectLimitReached,

    #[error("extension cannot be applied to an image with a removed background")]
    BackgroundAlreadyRemoved,

    #[error("no original image to reset to")]
    NoOriginalImage,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("failed to serialize document state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to encode export image: {0}")]
    Encode(#[from] image::ImageError),
}
