use clap::Subcommand;
use studystation_core::notes::NoteList;
use studystation_core::storage::keys;

use super::{open_session, print_json};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add { text: String },
    /// List notes as JSON
    List,
    /// Replace a note's text
    Edit { id: String, text: String },
    /// Delete a note
    Remove { id: String },
}

pub fn run(action: NoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = open_session()?;
    let mut notes: NoteList = coordinator
        .store()
        .get_json(keys::STUDY_NOTES)?
        .unwrap_or_default();

    match action {
        NoteAction::Add { text } => {
            match notes.add(&text) {
                Some(note) => print_json(&note)?,
                None => eprintln!("nothing to add"),
            }
            coordinator.store().set_json(keys::STUDY_NOTES, &notes)?;
        }
        NoteAction::List => {
            print_json(&notes.notes())?;
        }
        NoteAction::Edit { id, text } => {
            if !notes.edit(&id, &text) {
                eprintln!("no note with id {id}");
            }
            coordinator.store().set_json(keys::STUDY_NOTES, &notes)?;
            print_json(&notes.notes())?;
        }
        NoteAction::Remove { id } => {
            if !notes.remove(&id) {
                eprintln!("no note with id {id}");
            }
            coordinator.store().set_json(keys::STUDY_NOTES, &notes)?;
            print_json(&notes.notes())?;
        }
    }

    Ok(())
}
