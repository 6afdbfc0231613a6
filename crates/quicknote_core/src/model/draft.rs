//! Draft text classification for the editor.
//!
//! The editor UI shows placeholder strings inside empty fields. Those strings
//! must never be stored as real note text, so raw input is tagged as
//! `Empty` or `Populated` before anything else looks at it.

/// Placeholder shown in an empty title field.
pub const TITLE_PLACEHOLDER: &str = "Title";
/// Placeholder shown in an empty content field.
pub const CONTENT_PLACEHOLDER: &str = "Type something...";

/// Editor field value tagged by whether it carries real text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Empty,
    Populated(String),
}

impl DraftField {
    /// Classifies raw field text; the field's own placeholder counts as empty.
    pub fn from_input(text: &str, placeholder: &str) -> Self {
        if text.is_empty() || text == placeholder {
            Self::Empty
        } else {
            Self::Populated(text.to_string())
        }
    }

    pub fn title(text: &str) -> Self {
        Self::from_input(text, TITLE_PLACEHOLDER)
    }

    pub fn content(text: &str) -> Self {
        Self::from_input(text, CONTENT_PLACEHOLDER)
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }

    /// Returns the real text, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Populated(text) => Some(text.as_str()),
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Populated(text) => Some(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftField, CONTENT_PLACEHOLDER, TITLE_PLACEHOLDER};

    #[test]
    fn placeholder_and_empty_text_classify_as_empty() {
        assert_eq!(DraftField::title(""), DraftField::Empty);
        assert_eq!(DraftField::title(TITLE_PLACEHOLDER), DraftField::Empty);
        assert_eq!(DraftField::content(CONTENT_PLACEHOLDER), DraftField::Empty);
    }

    #[test]
    fn placeholder_of_other_field_is_real_text() {
        let field = DraftField::content(TITLE_PLACEHOLDER);
        assert!(field.is_populated());
        assert_eq!(field.as_text(), Some("Title"));
    }

    #[test]
    fn into_text_returns_owned_value() {
        assert_eq!(
            DraftField::title("Groceries").into_text().as_deref(),
            Some("Groceries")
        );
        assert_eq!(DraftField::Empty.into_text(), None);
    }
}
