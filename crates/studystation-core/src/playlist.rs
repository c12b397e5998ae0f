//! Named music playlists with track advance semantics.
//!
//! The music station keeps several named playlists. Track advance stays
//! inside the active playlist; at the end it wraps when repeat is on,
//! otherwise it spills into the next playlist that has tracks. Track ids
//! are unique within a playlist (duplicate add is a no-op).

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaItem;

pub const DEFAULT_PLAYLIST_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<MediaItem>,
}

impl Playlist {
    fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }
}

/// The playlist collection, persisted under the `playlists` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlists {
    lists: Vec<Playlist>,
    active_id: String,
    #[serde(default)]
    repeat: bool,
    #[serde(default)]
    shuffle: bool,
    /// Index of the playing track within the active playlist. Transient.
    #[serde(skip)]
    current: Option<usize>,
}

impl Default for Playlists {
    fn default() -> Self {
        Self {
            lists: vec![Playlist {
                id: DEFAULT_PLAYLIST_ID.to_string(),
                name: "Study Playlist".to_string(),
                tracks: Vec::new(),
            }],
            active_id: DEFAULT_PLAYLIST_ID.to_string(),
            repeat: false,
            shuffle: false,
            current: None,
        }
    }
}

impl Playlists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &[Playlist] {
        &self.lists
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    fn active_index(&self) -> usize {
        self.lists
            .iter()
            .position(|p| p.id == self.active_id)
            .unwrap_or(0)
    }

    pub fn active(&self) -> &Playlist {
        &self.lists[self.active_index()]
    }

    pub fn current_track(&self) -> Option<&MediaItem> {
        self.active().tracks.get(self.current?)
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if self.lists.iter().any(|p| p.id == id) {
            self.active_id = id.to_string();
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Create a playlist. Blank names are rejected.
    pub fn create(&mut self, name: &str) -> Option<&Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.lists.push(Playlist {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            tracks: Vec::new(),
        });
        self.lists.last()
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.lists.iter_mut().find(|p| p.id == id) {
            Some(list) => {
                list.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Delete a playlist. The last remaining playlist cannot be deleted;
    /// deleting the active one activates the first.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.lists.len() <= 1 {
            return false;
        }
        let before = self.lists.len();
        self.lists.retain(|p| p.id != id);
        if self.lists.len() == before {
            return false;
        }
        if self.active_id == id {
            self.active_id = self.lists[0].id.clone();
            self.current = None;
        }
        true
    }

    /// Add a track to a playlist, deduplicated by track id.
    pub fn add_track(&mut self, playlist_id: &str, track: MediaItem) -> bool {
        if !track.is_valid() {
            return false;
        }
        match self.lists.iter_mut().find(|p| p.id == playlist_id) {
            Some(list) if !list.contains(&track.id) => {
                list.tracks.push(track);
                true
            }
            _ => false,
        }
    }

    pub fn remove_track(&mut self, playlist_id: &str, track_id: &str) -> bool {
        let current_id = self.current_track().map(|t| t.id.clone());
        let Some(list) = self.lists.iter_mut().find(|p| p.id == playlist_id) else {
            return false;
        };
        let before = list.tracks.len();
        list.tracks.retain(|t| t.id != track_id);
        if list.tracks.len() == before {
            return false;
        }
        // Keep the pointer on the same track if it survived.
        if playlist_id == self.active_id {
            self.current = current_id
                .filter(|id| id != track_id)
                .and_then(|id| self.active().tracks.iter().position(|t| t.id == id));
        }
        true
    }

    /// Start playing the track at `index` in the active playlist.
    pub fn play_index(&mut self, index: usize) -> Option<&MediaItem> {
        if index >= self.active().tracks.len() {
            return None;
        }
        self.current = Some(index);
        self.current_track()
    }

    /// Advance to the next track. At the end of the active playlist:
    /// wrap to the front when repeat is on, otherwise continue into the
    /// next playlist that has tracks. Returns `None` when playback stops.
    pub fn next(&mut self) -> Option<&MediaItem> {
        let len = self.active().tracks.len();
        match self.current {
            None => self.play_index(0),
            Some(i) if i + 1 < len => self.play_index(i + 1),
            Some(_) => {
                if self.repeat {
                    return self.play_index(0);
                }
                let start = self.active_index();
                let follow = self
                    .lists
                    .iter()
                    .enumerate()
                    .skip(start + 1)
                    .find(|(_, p)| !p.tracks.is_empty())
                    .map(|(i, _)| i)?;
                self.active_id = self.lists[follow].id.clone();
                self.play_index(0)
            }
        }
    }

    /// Step back one track, wrapping to the last track when repeat is on.
    pub fn previous(&mut self) -> Option<&MediaItem> {
        let len = self.active().tracks.len();
        match self.current {
            Some(i) if i > 0 => self.play_index(i - 1),
            Some(_) if self.repeat && len > 0 => self.play_index(len - 1),
            _ => None,
        }
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    /// Flip shuffle; enabling it permutes the active playlist in place.
    /// The pointer follows the playing track to its new position.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        if self.shuffle {
            let current_id = self.current_track().map(|t| t.id.clone());
            let idx = self.active_index();
            self.lists[idx].tracks.shuffle(&mut rand::thread_rng());
            self.current =
                current_id.and_then(|id| self.active().tracks.iter().position(|t| t.id == id));
        }
        self.shuffle
    }
}
