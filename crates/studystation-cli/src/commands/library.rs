use clap::Subcommand;
use studystation_core::MediaItem;

use super::{open_session, print_json, save_session};

#[derive(Subcommand)]
pub enum LibraryAction {
    /// Save a video (or short) and make it the active selection
    Save {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        thumbnail: Option<String>,
        /// Save into the shorts library instead
        #[arg(long)]
        short: bool,
    },
    /// Remove a video everywhere (library, queue, active selection)
    Remove { id: String },
    /// Print saved videos as JSON
    List {
        /// Show the shorts library instead
        #[arg(long)]
        shorts: bool,
    },
    /// Play a video (saved metadata is used when available)
    Play { id: String },
    /// Print the active selection
    Active,
}

pub fn run(action: LibraryAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = open_session()?;

    match action {
        LibraryAction::Save {
            id,
            title,
            channel,
            thumbnail,
            short,
        } => {
            let item = MediaItem {
                id,
                title,
                channel,
                thumbnail_url: thumbnail,
            };
            match coordinator.save_media(item, short) {
                Some(event) => print_json(&event)?,
                None => eprintln!("nothing to save"),
            }
        }
        LibraryAction::Remove { id } => {
            if !coordinator.remove_media(&id) {
                eprintln!("no saved video with id {id}");
            }
            print_json(coordinator.library())?;
        }
        LibraryAction::List { shorts } => {
            if shorts {
                print_json(coordinator.shorts())?;
            } else {
                print_json(coordinator.library())?;
            }
        }
        LibraryAction::Play { id } => {
            let item = coordinator
                .library()
                .get(&id)
                .or_else(|| coordinator.shorts().get(&id))
                .cloned()
                .unwrap_or_else(|| MediaItem::new(id));
            match coordinator.play(item) {
                Some(event) => print_json(&event)?,
                None => eprintln!("nothing to play"),
            }
        }
        LibraryAction::Active => {
            print_json(&coordinator.active())?;
        }
    }

    save_session(&coordinator)?;
    Ok(())
}
