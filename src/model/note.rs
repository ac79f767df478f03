//! Title/content documents of the notes app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{ValidationError, require_text};

/// A stored note. Content is LaTeX-flavoured text, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Note title.
    pub title: String,
    /// Note body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or updating a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteInput {
    /// Note title.
    pub title: String,
    /// Note body.
    pub content: String,
}

impl Default for NoteInput {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            content: " ".to_string(),
        }
    }
}

impl NoteInput {
    /// Edits must keep both title and content non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for a blank field.
    pub fn validate_edit(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_placeholder_fails_edit_validation() {
        assert_eq!(
            NoteInput::default().validate_edit(),
            Err(ValidationError::MissingField("content"))
        );
    }
}
