//! Persistence store for user-generated state.
//!
//! Every collection (favorites, watchlist, history, ratings, comments) is one
//! JSON document under one storage key. Each operation reads the whole
//! document, changes it, writes it back, and then notifies that
//! collection's listeners with the new value.
//!
//! Policy violations (duplicate add, unauthenticated comment, deleting
//! someone else's comment) are reported as `false`/`None` and leave storage
//! untouched. Only a failed storage write is an `Err`.
//!
//! The store is single-threaded: a read-modify-write runs to completion
//! before anything else touches the same key.

use std::rc::Rc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::core::error::StorageError;
use crate::core::observer::{Change, Listener, Observers, Topic};
use crate::core::persist;
use crate::core::session::{MirroredCollection, SessionProvider};
use crate::models::{
    Comment, CommentThreads, HistoryEntry, MediaItem, MediaKind, PartitionKey, Rating, Ratings,
    SavedItem, Score, UserStats,
};
use crate::utils::{Clock, KeyValueStore};

/// The two "saved" lists with add-if-absent semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SavedList {
    Favorites,
    Watchlist,
}

impl SavedList {
    fn change(self, items: Vec<SavedItem>) -> Change {
        match self {
            Self::Favorites => Change::Favorites(items),
            Self::Watchlist => Change::Watchlist(items),
        }
    }

    fn mirrored(self) -> MirroredCollection {
        match self {
            Self::Favorites => MirroredCollection::Favorites,
            Self::Watchlist => MirroredCollection::Watchlist,
        }
    }
}

/// Favorites, watchlist, history, ratings, and comments over durable storage.
pub struct PersistenceStore {
    storage: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    session: Rc<dyn SessionProvider>,
    observers: Observers,
    config: StoreConfig,
}

impl PersistenceStore {
    pub fn new(
        storage: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        session: Rc<dyn SessionProvider>,
    ) -> Self {
        Self::with_config(storage, clock, session, StoreConfig::default())
    }

    pub fn with_config(
        storage: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        session: Rc<dyn SessionProvider>,
        config: StoreConfig,
    ) -> Self {
        Self {
            storage,
            clock,
            session,
            observers: Observers::new(),
            config,
        }
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Read the collection stored under `key`, or its empty value.
    pub fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        persist::read(self.storage.as_ref(), key)
    }

    /// Overwrite the collection stored under `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        persist::write(self.storage.as_ref(), key, value)
    }

    /// Deliver a change to its topic's listeners.
    pub fn notify(&self, change: &Change) {
        self.observers.notify(change);
    }

    pub fn subscribe(&self, topic: Topic, listener: &Listener) {
        self.observers.subscribe(topic, listener);
    }

    /// Remove all registrations of `listener` on `topic`.
    pub fn unsubscribe(&self, topic: Topic, listener: &Listener) {
        self.observers.unsubscribe(topic, listener);
    }

    // =========================================================================
    // Favorites & Watchlist
    // =========================================================================

    pub fn favorites(&self) -> Vec<SavedItem> {
        self.saved(SavedList::Favorites)
    }

    /// Add to favorites. Returns `false` if `(id, kind)` is already there.
    pub fn add_favorite(&self, item: MediaItem) -> Result<bool, StorageError> {
        self.add_saved(SavedList::Favorites, item, true)
    }

    /// Remove from favorites. Returns whether an entry was removed.
    pub fn remove_favorite(&self, id: u64, kind: MediaKind) -> Result<bool, StorageError> {
        self.remove_saved(SavedList::Favorites, id, kind)
    }

    pub fn is_favorite(&self, id: u64, kind: MediaKind) -> bool {
        self.favorites().iter().any(|s| s.item.is(id, kind))
    }

    pub fn watchlist(&self) -> Vec<SavedItem> {
        self.saved(SavedList::Watchlist)
    }

    /// Add to the watchlist. Returns `false` if `(id, kind)` is already there.
    pub fn add_to_watchlist(&self, item: MediaItem) -> Result<bool, StorageError> {
        self.add_saved(SavedList::Watchlist, item, true)
    }

    /// Remove from the watchlist. Returns whether an entry was removed.
    pub fn remove_from_watchlist(&self, id: u64, kind: MediaKind) -> Result<bool, StorageError> {
        self.remove_saved(SavedList::Watchlist, id, kind)
    }

    pub fn is_in_watchlist(&self, id: u64, kind: MediaKind) -> bool {
        self.watchlist().iter().any(|s| s.item.is(id, kind))
    }

    fn key(&self, list: SavedList) -> &str {
        match list {
            SavedList::Favorites => self.config.keys.favorites.as_str(),
            SavedList::Watchlist => self.config.keys.watchlist.as_str(),
        }
    }

    fn saved(&self, list: SavedList) -> Vec<SavedItem> {
        persist::read_list(self.storage.as_ref(), self.key(list))
    }

    fn add_saved(
        &self,
        list: SavedList,
        item: MediaItem,
        mirror: bool,
    ) -> Result<bool, StorageError> {
        let mut items = self.saved(list);
        if items.iter().any(|s| s.item.is(item.id, item.kind)) {
            return Ok(false);
        }

        items.push(SavedItem {
            item,
            added_at: self.clock.now_ms(),
        });
        self.commit_saved(list, items, mirror)?;
        Ok(true)
    }

    fn remove_saved(
        &self,
        list: SavedList,
        id: u64,
        kind: MediaKind,
    ) -> Result<bool, StorageError> {
        let mut items = self.saved(list);
        let before = items.len();
        items.retain(|s| !s.item.is(id, kind));
        let removed = items.len() != before;

        self.commit_saved(list, items, true)?;
        Ok(removed)
    }

    fn commit_saved(
        &self,
        list: SavedList,
        items: Vec<SavedItem>,
        mirror: bool,
    ) -> Result<(), StorageError> {
        self.write(self.key(list), &items)?;

        if mirror && self.session.is_authenticated() {
            // Best effort: the local collection is already written
            if let Err(err) = self.session.mirror_collection(list.mirrored(), &items) {
                tracing::warn!(error = %err, "failed to mirror collection into user record");
            }
        }

        self.notify(&list.change(items));
        Ok(())
    }

    /// Restore favorites and watchlist from the signed-in user's record
    /// when the local copies are empty.
    pub fn sync_from_session(&self) -> Result<(), StorageError> {
        let Some(user) = self.session.current_user() else {
            return Ok(());
        };

        for (list, remote) in [
            (SavedList::Favorites, user.favorites),
            (SavedList::Watchlist, user.watchlist),
        ] {
            if remote.is_empty() || !self.saved(list).is_empty() {
                continue;
            }
            for saved in remote {
                self.add_saved(list, saved.item, false)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Most recently viewed first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        persist::read_list(self.storage.as_ref(), &self.config.keys.history)
    }

    /// Record a view: moves `(id, kind)` to the front and trims the tail.
    pub fn add_to_history(&self, item: MediaItem) -> Result<(), StorageError> {
        let mut history = self.history();
        history.retain(|h| !h.item.is(item.id, item.kind));
        history.insert(
            0,
            HistoryEntry {
                item,
                viewed_at: self.clock.now_ms(),
            },
        );
        history.truncate(self.config.max_history);

        self.write(&self.config.keys.history, &history)?;
        self.notify(&Change::History(history));
        Ok(())
    }

    pub fn clear_history(&self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.config.keys.history)?;
        self.notify(&Change::History(Vec::new()));
        Ok(())
    }

    // =========================================================================
    // Ratings
    // =========================================================================

    pub fn ratings(&self) -> Ratings {
        persist::read_map(self.storage.as_ref(), &self.config.keys.ratings)
    }

    /// Rate a title, replacing any earlier score.
    pub fn rate(&self, id: u64, kind: MediaKind, score: Score) -> Result<(), StorageError> {
        let mut ratings = self.ratings();
        ratings.insert(
            PartitionKey::new(id, kind).to_string(),
            Rating {
                score,
                rated_at: self.clock.now_ms(),
            },
        );
        self.commit_ratings(ratings)
    }

    pub fn user_rating(&self, id: u64, kind: MediaKind) -> Option<Score> {
        self.ratings()
            .get(&PartitionKey::new(id, kind).to_string())
            .map(|r| r.score)
    }

    /// Delete a rating. The collection is rewritten even if nothing was rated.
    pub fn remove_rating(&self, id: u64, kind: MediaKind) -> Result<bool, StorageError> {
        let mut ratings = self.ratings();
        let removed = ratings
            .remove(&PartitionKey::new(id, kind).to_string())
            .is_some();
        self.commit_ratings(ratings)?;
        Ok(removed)
    }

    fn commit_ratings(&self, ratings: Ratings) -> Result<(), StorageError> {
        self.write(&self.config.keys.ratings, &ratings)?;
        self.notify(&Change::Ratings(ratings));
        Ok(())
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// The thread for one title, in posting order.
    pub fn comments(&self, id: u64, kind: MediaKind) -> Vec<Comment> {
        self.threads()
            .remove(&PartitionKey::new(id, kind).to_string())
            .unwrap_or_default()
    }

    /// Every thread, with malformed comments dropped and like counts
    /// rebuilt from their liked-by sets.
    fn threads(&self) -> CommentThreads {
        let key = &self.config.keys.comments;
        persist::read_map::<Vec<Value>>(self.storage.as_ref(), key)
            .into_iter()
            .map(|(partition, raw)| {
                let mut thread: Vec<Comment> = persist::keep_valid(key, raw);
                thread.iter_mut().for_each(Comment::sync_like_count);
                (partition, thread)
            })
            .collect()
    }

    /// Post a comment as the signed-in user.
    ///
    /// Returns `None` when nobody is signed in or `text` is blank.
    pub fn add_comment(
        &self,
        id: u64,
        kind: MediaKind,
        text: &str,
    ) -> Result<Option<Comment>, StorageError> {
        let Some(user) = self.session.current_user() else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let partition = PartitionKey::new(id, kind);
        let mut threads = self.threads();
        let thread = threads.entry(partition.to_string()).or_default();

        let now = self.clock.now_ms();
        let mut id_ms = now;
        while thread.iter().any(|c| c.id == id_ms.to_string()) {
            id_ms += 1;
        }

        let comment = Comment {
            id: id_ms.to_string(),
            author_id: user.id,
            author_name: user.name,
            author_avatar_url: user.avatar,
            text: text.to_string(),
            posted_at: now,
            like_count: 0,
            liked_by: Default::default(),
        };
        thread.push(comment.clone());

        self.commit_thread(partition, threads)?;
        Ok(Some(comment))
    }

    /// Toggle the signed-in user's like on a comment.
    ///
    /// Returns `false` when nobody is signed in or the comment does not exist.
    pub fn like_comment(
        &self,
        id: u64,
        kind: MediaKind,
        comment_id: &str,
    ) -> Result<bool, StorageError> {
        let Some(user) = self.session.current_user() else {
            return Ok(false);
        };

        let partition = PartitionKey::new(id, kind);
        let mut threads = self.threads();
        let Some(comment) = threads
            .get_mut(&partition.to_string())
            .and_then(|thread| thread.iter_mut().find(|c| c.id == comment_id))
        else {
            return Ok(false);
        };

        comment.toggle_like(&user.id);
        self.commit_thread(partition, threads)?;
        Ok(true)
    }

    /// Delete a comment. Only its author may do so.
    pub fn delete_comment(
        &self,
        id: u64,
        kind: MediaKind,
        comment_id: &str,
    ) -> Result<bool, StorageError> {
        let Some(user) = self.session.current_user() else {
            return Ok(false);
        };

        let partition = PartitionKey::new(id, kind);
        let mut threads = self.threads();
        let Some(thread) = threads.get_mut(&partition.to_string()) else {
            return Ok(false);
        };
        let Some(pos) = thread
            .iter()
            .position(|c| c.id == comment_id && c.author_id == user.id)
        else {
            return Ok(false);
        };

        thread.remove(pos);
        self.commit_thread(partition, threads)?;
        Ok(true)
    }

    fn commit_thread(
        &self,
        partition: PartitionKey,
        threads: CommentThreads,
    ) -> Result<(), StorageError> {
        self.write(&self.config.keys.comments, &threads)?;
        let comments = threads
            .get(&partition.to_string())
            .cloned()
            .unwrap_or_default();
        self.notify(&Change::Comments {
            partition,
            comments,
        });
        Ok(())
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    pub fn stats(&self) -> UserStats {
        let ratings = self.ratings();
        let average_rating = (!ratings.is_empty()).then(|| {
            let sum: u32 = ratings.values().map(|r| u32::from(r.score.get())).sum();
            f64::from(sum) / ratings.len() as f64
        });

        UserStats {
            favorites: self.favorites().len(),
            watchlist: self.watchlist().len(),
            history: self.history().len(),
            ratings: ratings.len(),
            average_rating,
        }
    }
}
