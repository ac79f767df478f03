//! Notes CRUD.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Database;
use crate::error::ServerError;
use crate::model::{Note, NoteInput};

/// Note operations. Notes are shared, not owned by an account.
#[derive(Debug, Clone)]
pub struct NoteService {
    db: Arc<Database>,
}

impl NoteService {
    /// Creates the service.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every note, most recently updated first.
    pub async fn list(&self) -> Vec<Note> {
        let mut notes = self.db.read().await.notes.clone();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    /// Stores a note. Blank fields get the new-note placeholders.
    pub async fn create(&self, input: NoteInput) -> Note {
        let defaults = NoteInput::default();
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().simple().to_string(),
            title: if input.title.trim().is_empty() {
                defaults.title
            } else {
                input.title
            },
            content: if input.content.is_empty() {
                defaults.content
            } else {
                input.content
            },
            created_at: now,
            updated_at: now,
        };
        self.db.write().await.notes.push(note.clone());
        tracing::info!(note_id = %note.id, "note created");
        note
    }

    /// Replaces title and content.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Validation`] for a blank title or content and
    /// [`ServerError::NoteNotFound`] for an unknown ID.
    pub async fn update(&self, note_id: &str, input: NoteInput) -> Result<Note, ServerError> {
        input.validate_edit()?;
        let mut tables = self.db.write().await;
        let note = tables.note_mut(note_id)?;
        note.title = input.title;
        note.content = input.content;
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    /// Deletes a note.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NoteNotFound`] for an unknown ID.
    pub async fn delete(&self, note_id: &str) -> Result<(), ServerError> {
        let mut tables = self.db.write().await;
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != note_id);
        if tables.notes.len() == before {
            return Err(ServerError::NoteNotFound(note_id.to_string()));
        }
        tracing::info!(%note_id, "note deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn input(title: &str, content: &str) -> NoteInput {
        NoteInput {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn crud_cycle() {
        let svc = NoteService::new(Arc::new(Database::new()));
        let note = svc.create(NoteInput::default()).await;
        assert_eq!(note.title, "Untitled");

        let Ok(updated) = svc
            .update(&note.id, input("Euler", r"e^{i\pi} + 1 = 0"))
            .await
        else {
            panic!("update failed");
        };
        assert_eq!(updated.title, "Euler");
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(svc.list().await.len(), 1);

        assert!(svc.delete(&note.id).await.is_ok());
        assert!(matches!(
            svc.delete(&note.id).await,
            Err(ServerError::NoteNotFound(_))
        ));
    }

    #[tokio::test]
    async fn blank_edit_is_rejected() {
        let svc = NoteService::new(Arc::new(Database::new()));
        let note = svc.create(input("T", "body")).await;
        assert!(matches!(
            svc.update(&note.id, input("T", "   ")).await,
            Err(ServerError::Validation(_))
        ));
    }
}
