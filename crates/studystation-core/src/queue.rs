//! Playback queue with repeat/shuffle policies.
//!
//! The queue is a transient, session-scoped ordered list of items pending
//! playback, distinct from the persisted [`Library`](crate::media::Library).
//! All operations are total: malformed input is dropped silently, an
//! exhausted queue makes `play_next` a no-op. The manager never touches the
//! active selection directly -- `play_next`/`on_item_ended` return the new
//! selection and the session coordinator applies it.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::media::{Library, MediaItem};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueManager {
    items: Vec<MediaItem>,
    repeat: bool,
    shuffle: bool,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
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

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Append `item` unless its id is already queued or the item is
    /// malformed. Returns whether the queue changed.
    pub fn add(&mut self, item: MediaItem) -> bool {
        if !item.is_valid() || self.items.iter().any(|v| v.id == item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the queued item with the given id. Returns whether anything
    /// was removed so the caller can clear a matching active selection.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|v| v.id != id);
        self.items.len() != before
    }

    /// Replace the queue order wholesale with the caller-supplied list.
    ///
    /// The new list is accepted as given; membership is not checked against
    /// the prior contents. The caller (drag-drop reordering) is trusted to
    /// pass a permutation.
    pub fn reorder(&mut self, new_order: Vec<MediaItem>) {
        self.items = new_order;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Flip repeat. Returns the new value.
    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    /// Flip shuffle. Turning shuffle on permutes the current contents once
    /// (Fisher-Yates, in place); turning it off does not restore the
    /// original order. Returns the new value.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        if self.shuffle && self.items.len() > 1 {
            self.items.shuffle(&mut rand::thread_rng());
        }
        self.shuffle
    }

    /// Pop the head of the queue as the next item to play.
    ///
    /// When repeat is on and the head was the last queued item, the queue
    /// refills from the saved library minus the item that is about to play.
    /// An empty refill legitimately leaves the queue empty.
    pub fn play_next(&mut self, library: &Library) -> Option<MediaItem> {
        if self.items.is_empty() {
            return None;
        }
        let head = self.items.remove(0);

        if self.repeat && self.items.is_empty() {
            self.items = library
                .items()
                .iter()
                .filter(|v| v.id != head.id)
                .cloned()
                .collect();
        }

        Some(head)
    }

    /// React to the player reporting end-of-playback for `ended_id`.
    ///
    /// Non-empty queue advances normally. With an empty queue and repeat on,
    /// playback continues from the saved library: a uniform random pick
    /// (excluding the ended item) under shuffle, otherwise the library item
    /// following the ended one, wrapping to the front. Returns `None` when
    /// playback should simply stop.
    pub fn on_item_ended(
        &mut self,
        ended_id: Option<&str>,
        library: &Library,
    ) -> Option<MediaItem> {
        if !self.items.is_empty() {
            return self.play_next(library);
        }
        if !self.repeat {
            return None;
        }

        let candidates: Vec<&MediaItem> = library
            .items()
            .iter()
            .filter(|v| Some(v.id.as_str()) != ended_id)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        if self.shuffle {
            let pick = rand::thread_rng().gen_range(0..candidates.len());
            return Some(candidates[pick].clone());
        }

        let next_index = match ended_id.and_then(|id| library.position(id)) {
            Some(idx) => (idx + 1) % library.len(),
            None => 0,
        };
        Some(library.items()[next_index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn item(id: &str) -> MediaItem {
        MediaItem::new(id)
    }

    fn library(ids: &[&str]) -> Library {
        let mut lib = Library::new();
        for id in ids {
            lib.add(item(id));
        }
        lib
    }

    #[test]
    fn add_dedupes_and_rejects_blank() {
        let mut q = QueueManager::new();
        assert!(q.add(item("a")));
        assert!(!q.add(item("a")));
        assert!(!q.add(item("")));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let mut q = QueueManager::new();
        q.add(item("a"));
        assert!(!q.remove("zzz"));
        assert!(q.remove("a"));
        assert!(q.is_empty());
    }

    #[test]
    fn play_next_consumes_in_order() {
        let mut q = QueueManager::new();
        let lib = Library::new();
        for id in ["a", "b", "c"] {
            q.add(item(id));
        }

        assert_eq!(q.play_next(&lib).unwrap().id, "a");
        assert_eq!(q.play_next(&lib).unwrap().id, "b");
        assert_eq!(q.play_next(&lib).unwrap().id, "c");
        assert!(q.is_empty());
        assert!(q.play_next(&lib).is_none());
    }

    #[test]
    fn play_next_refills_from_library_on_repeat() {
        let mut q = QueueManager::new();
        q.add(item("a"));
        q.toggle_repeat();
        let lib = library(&["a", "b", "c"]);

        let played = q.play_next(&lib).unwrap();
        assert_eq!(played.id, "a");
        let ids: Vec<_> = q.items().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn repeat_refill_from_empty_library_leaves_queue_empty() {
        let mut q = QueueManager::new();
        q.add(item("a"));
        q.toggle_repeat();
        let lib = library(&["a"]);

        assert_eq!(q.play_next(&lib).unwrap().id, "a");
        assert!(q.is_empty());
        assert!(q.play_next(&lib).is_none());
    }

    #[test]
    fn toggle_shuffle_preserves_id_set() {
        let mut q = QueueManager::new();
        let ids = ["a", "b", "c", "d", "e", "f", "g", "h"];
        for id in ids {
            q.add(item(id));
        }
        q.toggle_shuffle();
        let after: HashSet<_> = q.items().iter().map(|v| v.id.clone()).collect();
        assert_eq!(after.len(), ids.len());
        for id in ids {
            assert!(after.contains(id));
        }
    }

    #[test]
    fn toggle_shuffle_on_empty_queue_is_noop() {
        let mut q = QueueManager::new();
        assert!(q.toggle_shuffle());
        assert!(q.is_empty());
    }

    #[test]
    fn item_ended_advances_queue_first() {
        let mut q = QueueManager::new();
        q.add(item("b"));
        let lib = library(&["a", "b", "c"]);
        let next = q.on_item_ended(Some("a"), &lib).unwrap();
        assert_eq!(next.id, "b");
    }

    #[test]
    fn item_ended_without_repeat_stops() {
        let mut q = QueueManager::new();
        let lib = library(&["a", "b"]);
        assert!(q.on_item_ended(Some("a"), &lib).is_none());
    }

    #[test]
    fn item_ended_sequential_wraps_library() {
        let mut q = QueueManager::new();
        q.toggle_repeat();
        let lib = library(&["a", "b", "c"]);

        assert_eq!(q.on_item_ended(Some("a"), &lib).unwrap().id, "b");
        assert_eq!(q.on_item_ended(Some("c"), &lib).unwrap().id, "a");
        // Unknown ended id falls back to the front of the library.
        assert_eq!(q.on_item_ended(Some("zzz"), &lib).unwrap().id, "a");
        assert_eq!(q.on_item_ended(None, &lib).unwrap().id, "a");
    }

    #[test]
    fn item_ended_shuffle_picks_from_remaining() {
        let mut q = QueueManager::new();
        q.toggle_repeat();
        q.toggle_shuffle();
        let lib = library(&["a", "b", "c"]);

        for _ in 0..32 {
            let pick = q.on_item_ended(Some("a"), &lib).unwrap();
            assert_ne!(pick.id, "a");
            assert!(lib.contains(&pick.id));
        }
    }

    #[test]
    fn item_ended_repeat_with_only_ended_item_stops() {
        let mut q = QueueManager::new();
        q.toggle_repeat();
        let lib = library(&["a"]);
        assert!(q.on_item_ended(Some("a"), &lib).is_none());
    }

    proptest! {
        #[test]
        fn no_duplicates_under_arbitrary_adds(ids in proptest::collection::vec("[a-e]{1,2}", 0..40)) {
            let mut q = QueueManager::new();
            for id in &ids {
                q.add(item(id));
            }
            let unique: HashSet<_> = q.items().iter().map(|v| v.id.clone()).collect();
            prop_assert_eq!(unique.len(), q.len());
        }
    }
}
