use clap::Subcommand;
use serde::Serialize;
use studystation_core::{MediaItem, SessionCoordinator};

use super::{open_session, print_json, save_session};

#[derive(Subcommand)]
pub enum QueueAction {
    /// Append a video to the queue (duplicate ids are ignored)
    Add {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        channel: Option<String>,
    },
    /// Remove a video from the queue
    Remove { id: String },
    /// Print the queue as JSON
    List,
    /// Empty the queue
    Clear,
    /// Replace the queue order by listing ids in the new order
    Reorder { ids: Vec<String> },
    /// Toggle repeat
    Repeat,
    /// Toggle shuffle (shuffling permutes the queue immediately)
    Shuffle,
    /// Play the next queued video
    Next,
    /// Report that the active video finished playing
    Ended,
}

#[derive(Serialize)]
struct QueueStatus<'a> {
    items: &'a [MediaItem],
    repeat: bool,
    shuffle: bool,
    active: Option<&'a MediaItem>,
}

fn status(coordinator: &SessionCoordinator) -> QueueStatus<'_> {
    QueueStatus {
        items: coordinator.queue().items(),
        repeat: coordinator.queue().repeat(),
        shuffle: coordinator.queue().shuffle(),
        active: coordinator.active(),
    }
}

pub fn run(action: QueueAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = open_session()?;

    match action {
        QueueAction::Add { id, title, channel } => {
            // Prefer saved metadata when the id is already in the library.
            let item = coordinator
                .library()
                .get(&id)
                .cloned()
                .unwrap_or(MediaItem {
                    id,
                    title,
                    channel,
                    thumbnail_url: None,
                });
            coordinator.add_to_queue(item);
            print_json(&status(&coordinator))?;
        }
        QueueAction::Remove { id } => {
            coordinator.remove_from_queue(&id);
            print_json(&status(&coordinator))?;
        }
        QueueAction::List => {
            print_json(&status(&coordinator))?;
        }
        QueueAction::Clear => {
            coordinator.clear_queue();
            print_json(&status(&coordinator))?;
        }
        QueueAction::Reorder { ids } => {
            // Accept the given order as-is; ids resolve against the queue
            // first, then the library.
            let new_order: Vec<MediaItem> = ids
                .iter()
                .filter_map(|id| {
                    coordinator
                        .queue()
                        .items()
                        .iter()
                        .find(|v| &v.id == id)
                        .or_else(|| coordinator.library().get(id))
                        .cloned()
                })
                .collect();
            coordinator.reorder_queue(new_order);
            print_json(&status(&coordinator))?;
        }
        QueueAction::Repeat => {
            coordinator.toggle_queue_repeat();
            print_json(&status(&coordinator))?;
        }
        QueueAction::Shuffle => {
            coordinator.toggle_queue_shuffle();
            print_json(&status(&coordinator))?;
        }
        QueueAction::Next => match coordinator.play_next() {
            Some(event) => print_json(&event)?,
            None => eprintln!("queue is empty"),
        },
        QueueAction::Ended => {
            let event = coordinator.handle_item_ended();
            print_json(&event)?;
        }
    }

    save_session(&coordinator)?;
    Ok(())
}
