//! Media items and the persisted saved library.
//!
//! A [`MediaItem`] is one playable unit identified by the provider's id.
//! Provider payloads are deeply optional; [`MediaItem::from_provider`]
//! normalizes them at the boundary so nothing downstream ever touches raw
//! JSON. The [`Library`] is the deduplicated, insertion-ordered set of items
//! the user has kept, distinct from the transient playback queue.

use serde::{Deserialize, Serialize};

/// One playable unit. `id` is the sole identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Channel name for videos, artist for music tracks.
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl MediaItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            channel: None,
            thumbnail_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// An item without an id cannot be queued, saved, or played.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Normalize a raw provider record into a `MediaItem`.
    ///
    /// Accepts both search-result shape (`id.videoId`) and detail shape
    /// (plain `id` string). Returns `None` when no usable id is present.
    pub fn from_provider(value: &serde_json::Value) -> Option<Self> {
        let id = value["id"]["videoId"]
            .as_str()
            .or_else(|| value["id"].as_str())?
            .to_string();
        if id.trim().is_empty() {
            return None;
        }

        let snippet = &value["snippet"];
        let thumbnail_url = snippet["thumbnails"]["medium"]["url"]
            .as_str()
            .or_else(|| snippet["thumbnails"]["high"]["url"].as_str())
            .or_else(|| snippet["thumbnails"]["default"]["url"].as_str())
            .map(str::to_string);

        Some(Self {
            id,
            title: snippet["title"].as_str().map(str::to_string),
            channel: snippet["channelTitle"].as_str().map(str::to_string),
            thumbnail_url,
        })
    }

    pub fn title_or_untitled(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn channel_or_unknown(&self) -> &str {
        self.channel.as_deref().unwrap_or("Unknown")
    }
}

/// Persisted, id-deduplicated collection of saved items.
///
/// Insertion order is preserved for display and for the sequential
/// "play the next library item" fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    items: Vec<MediaItem>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless its id is already present or the item is
    /// malformed. Returns whether the library changed.
    pub fn add(&mut self, item: MediaItem) -> bool {
        if !item.is_valid() || self.contains(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the item with the given id. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|v| v.id != id);
        self.items.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|v| v.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&MediaItem> {
        self.items.iter().find(|v| v.id == id)
    }

    /// Index of the item with the given id in display order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|v| v.id == id)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
