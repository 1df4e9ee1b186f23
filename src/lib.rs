//! Editor session state manager for a canvas-based image editor.
//!
//! Owns the live canvas document, coordinates tool-specific mutations
//! (crop, resize, filters, text, AI replacement) against it, maintains a
//! snapshot undo/redo history, and reconciles in-memory edits with a
//! remote project record. Rendering, authentication, and billing are
//! collaborator traits implemented elsewhere.

#![warn(clippy::all, rust_2018_idioms)]

pub mod directive;
pub mod document;
pub mod error;
pub mod export;
pub mod history;
pub mod persistence;
pub mod plan;
pub mod session;
pub mod tools;
pub mod util;

pub use document::{Dimensions, Document, DocumentEvent, DocumentState, VisualObject};
pub use error::{EditorError, RemoteError};
pub use export::{CanvasRenderer, ExportFormat, ExportedImage};
pub use history::HistoryManager;
pub use persistence::{ProjectPatch, ProjectRecord, ProjectStore, Reconciler, Uploader};
pub use plan::{Plan, PlanAccess};
pub use session::{EditorSession, ImageFetcher, ImageInfo, Viewport};
pub use tools::ToolId;
