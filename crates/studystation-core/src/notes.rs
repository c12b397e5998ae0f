//! Study notes.
//!
//! Plain persisted text blocks, decoupled from the state machines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyNote {
    pub id: String,
    pub text: String,
    pub updated_at: DateTime<Utc>,
}

/// Persisted under the `study_notes` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteList {
    notes: Vec<StudyNote>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[StudyNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Append a note. Blank text is rejected silently.
    pub fn add(&mut self, text: &str) -> Option<&StudyNote> {
        if text.trim().is_empty() {
            return None;
        }
        self.notes.push(StudyNote {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            updated_at: Utc::now(),
        });
        self.notes.last()
    }

    /// Replace the text of an existing note, bumping its timestamp.
    pub fn edit(&mut self, id: &str, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.text = text.to_string();
                note.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }
}
