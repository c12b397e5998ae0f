use clap::Subcommand;
use studystation_core::playlist::Playlists;
use studystation_core::storage::keys;
use studystation_core::MediaItem;

use super::{open_session, print_json};

#[derive(Subcommand)]
pub enum PlaylistAction {
    /// List playlists as JSON
    List,
    /// Create a playlist
    Create { name: String },
    /// Rename a playlist
    Rename { id: String, name: String },
    /// Delete a playlist (the last one cannot be deleted)
    Delete { id: String },
    /// Switch the active playlist
    Active { id: String },
    /// Add a track to a playlist (duplicates are ignored)
    AddTrack {
        playlist_id: String,
        track_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
    },
    /// Remove a track from a playlist
    RemoveTrack { playlist_id: String, track_id: String },
    /// Play the track at an index in the active playlist
    Play { index: usize },
    /// Advance to the next track
    Next,
    /// Step back to the previous track
    Prev,
    /// Toggle repeat
    Repeat,
    /// Toggle shuffle (shuffling permutes the active playlist)
    Shuffle,
}

pub fn run(action: PlaylistAction) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = open_session()?;
    let mut playlists: Playlists = coordinator
        .store()
        .get_json(keys::PLAYLISTS)?
        .unwrap_or_default();

    match action {
        PlaylistAction::List => {
            print_json(&playlists)?;
        }
        PlaylistAction::Create { name } => match playlists.create(&name) {
            Some(list) => print_json(&list)?,
            None => eprintln!("playlist name cannot be empty"),
        },
        PlaylistAction::Rename { id, name } => {
            if !playlists.rename(&id, &name) {
                eprintln!("no playlist with id {id}");
            }
            print_json(&playlists)?;
        }
        PlaylistAction::Delete { id } => {
            if !playlists.delete(&id) {
                eprintln!("cannot delete playlist {id}");
            }
            print_json(&playlists)?;
        }
        PlaylistAction::Active { id } => {
            if !playlists.set_active(&id) {
                eprintln!("no playlist with id {id}");
            }
            print_json(playlists.active())?;
        }
        PlaylistAction::AddTrack {
            playlist_id,
            track_id,
            title,
            artist,
        } => {
            let track = MediaItem {
                id: track_id,
                title,
                channel: artist,
                thumbnail_url: None,
            };
            if !playlists.add_track(&playlist_id, track) {
                eprintln!("track not added");
            }
            print_json(&playlists)?;
        }
        PlaylistAction::RemoveTrack {
            playlist_id,
            track_id,
        } => {
            if !playlists.remove_track(&playlist_id, &track_id) {
                eprintln!("track not found");
            }
            print_json(&playlists)?;
        }
        PlaylistAction::Play { index } => match playlists.play_index(index) {
            Some(track) => print_json(&track)?,
            None => eprintln!("no track at index {index}"),
        },
        PlaylistAction::Next => match playlists.next() {
            Some(track) => print_json(&track)?,
            None => eprintln!("end of playlists"),
        },
        PlaylistAction::Prev => match playlists.previous() {
            Some(track) => print_json(&track)?,
            None => eprintln!("at the beginning"),
        },
        PlaylistAction::Repeat => {
            playlists.toggle_repeat();
            print_json(&playlists)?;
        }
        PlaylistAction::Shuffle => {
            playlists.toggle_shuffle();
            print_json(&playlists)?;
        }
    }

    coordinator.store().set_json(keys::PLAYLISTS, &playlists)?;
    Ok(())
}
