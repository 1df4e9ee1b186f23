//! Text objects: add, edit, delete, and formatting toggles. Changes apply
//! immediately to the selected text object; every operation other than
//! `add_text` requires a text selection.

use crate::document::{Document, ObjectCommon, ObjectId, TextAlign, TextObject, VisualObject};
use crate::error::EditorError;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f32 = 20.0;
pub const DEFAULT_FILL: &str = "#000000";
pub const FONT_SIZE_RANGE: (f32, f32) = (8.0, 120.0);

pub const FONT_FAMILIES: [&str; 9] = [
    "Arial",
    "Arial Black",
    "Helvetica",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Verdana",
    "Comic Sans MS",
    "Impact",
];

/// Adds an editable placeholder text centered on the canvas and selects
/// it.
pub fn add_text(document: &mut Document) -> ObjectId {
    let dimensions = document.dimensions();
    let text = TextObject {
        common: ObjectCommon::at(
            dimensions.width as f32 / 2.0,
            dimensions.height as f32 / 2.0,
        ),
        text: "Edit this text".to_owned(),
        font_family: DEFAULT_FONT_FAMILY.to_owned(),
        font_size: DEFAULT_FONT_SIZE,
        fill: DEFAULT_FILL.to_owned(),
        align: TextAlign::Left,
        bold: false,
        italic: false,
        underline: false,
    };
    let id = document.add_object(VisualObject::Text(text));
    document.set_selection(Some(id));
    id
}

pub fn delete_selected_text(document: &mut Document) -> Result<(), EditorError> {
    let id = selected_text_id(document)?;
    document.remove_object(id);
    Ok(())
}

pub fn set_content(document: &mut Document, content: &str) -> Result<(), EditorError> {
    edit(document, |text| text.text = content.to_owned())
}

pub fn set_font_family(document: &mut Document, family: &str) -> Result<(), EditorError> {
    edit(document, |text| text.font_family = family.to_owned())
}

pub fn set_font_size(document: &mut Document, size: f32) -> Result<(), EditorError> {
    let size = size.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1);
    edit(document, |text| text.font_size = size)
}

pub fn set_fill(document: &mut Document, color: &str) -> Result<(), EditorError> {
    edit(document, |text| text.fill = color.to_owned())
}

pub fn set_align(document: &mut Document, align: TextAlign) -> Result<(), EditorError> {
    edit(document, |text| text.align = align)
}

pub fn toggle_bold(document: &mut Document) -> Result<(), EditorError> {
    edit(document, |text| text.bold = !text.bold)
}

pub fn toggle_italic(document: &mut Document) -> Result<(), EditorError> {
    edit(document, |text| text.italic = !text.italic)
}

pub fn toggle_underline(document: &mut Document) -> Result<(), EditorError> {
    edit(document, |text| text.underline = !text.underline)
}

fn selected_text_id(document: &Document) -> Result<ObjectId, EditorError> {
    document
        .selected_text()
        .map(|t| t.common.id)
        .ok_or(EditorError::NoTextSelected)
}

fn edit(
    document: &mut Document,
    f: impl FnOnce(&mut TextObject),
) -> Result<(), EditorError> {
    let id = selected_text_id(document)?;
    document.update_object(id, |object| {
        if let Some(text) = object.as_text_mut() {
            f(text);
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Dimensions;

    #[test]
    fn added_text_is_centered_and_selected() {
        let mut d = Document::new(Dimensions::new(800, 600));
        let id = add_text(&mut d);
        assert_eq!(d.selection(), Some(id));

        let text = d.selected_text().unwrap();
        assert_eq!(text.common.left, 400.0);
        assert_eq!(text.common.top, 300.0);
        assert_eq!(text.font_family, DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn formatting_toggles_flip_state() {
        let mut d = Document::new(Dimensions::new(800, 600));
        add_text(&mut d);

        toggle_bold(&mut d).unwrap();
        toggle_underline(&mut d).unwrap();
        assert!(d.selected_text().unwrap().bold);
        assert!(d.selected_text().unwrap().underline);

        toggle_bold(&mut d).unwrap();
        assert!(!d.selected_text().unwrap().bold);
    }

    #[test]
    fn edits_require_a_text_selection() {
        let mut d = Document::new(Dimensions::new(800, 600));
        add_text(&mut d);
        d.set_selection(None);

        assert!(matches!(
            toggle_italic(&mut d),
            Err(EditorError::NoTextSelected)
        ));
        assert!(matches!(
            delete_selected_text(&mut d),
            Err(EditorError::NoTextSelected)
        ));
    }
}
