//! Tool operations: independent mutators over the shared document.

pub mod adjust;
pub mod ai;
pub mod crop;
pub mod resize;
pub mod text;

use serde::{Deserialize, Serialize};

/// Identifier for each tool surface in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolId {
    Resize,
    Crop,
    Adjust,
    Text,
    Background,
    AiExtender,
    AiEdit,
}

impl ToolId {
    pub const ALL: [ToolId; 7] = [
        ToolId::Resize,
        ToolId::Crop,
        ToolId::Adjust,
        ToolId::Text,
        ToolId::Background,
        ToolId::AiExtender,
        ToolId::AiEdit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ToolId::Resize => "Resize",
            ToolId::Crop => "Crop",
            ToolId::Adjust => "Adjust",
            ToolId::Text => "Text",
            ToolId::Background => "AI Background",
            ToolId::AiExtender => "AI Image Extender",
            ToolId::AiEdit => "AI Editing",
        }
    }

    /// AI-backed tools are reserved for the pro plan.
    pub fn pro_only(&self) -> bool {
        matches!(self, ToolId::Background | ToolId::AiExtender | ToolId::AiEdit)
    }
}
