//! Change notification for persisted collections.
//!
//! Each collection publishes on its own [`Topic`]. Listeners are called
//! synchronously in registration order; a failing listener is logged and
//! does not stop the ones after it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::core::error::ListenerError;
use crate::models::{Comment, HistoryEntry, PartitionKey, Ratings, SavedItem};

/// Notification channel, one per collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    Favorites,
    Watchlist,
    History,
    Ratings,
    Comments,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Favorites => "favorites",
            Self::Watchlist => "watchlist",
            Self::History => "history",
            Self::Ratings => "ratings",
            Self::Comments => "comments",
        })
    }
}

/// The new value of a collection after a write.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    Favorites(Vec<SavedItem>),
    Watchlist(Vec<SavedItem>),
    History(Vec<HistoryEntry>),
    Ratings(Ratings),
    /// The thread for one title, not the whole comments map.
    Comments {
        partition: PartitionKey,
        comments: Vec<Comment>,
    },
}

impl Change {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Favorites(_) => Topic::Favorites,
            Self::Watchlist(_) => Topic::Watchlist,
            Self::History(_) => Topic::History,
            Self::Ratings(_) => Topic::Ratings,
            Self::Comments { .. } => Topic::Comments,
        }
    }
}

/// A change subscriber. Identity (the `Rc` allocation) is what
/// [`Observers::unsubscribe`] matches on.
pub type Listener = Rc<dyn Fn(&Change) -> Result<(), ListenerError>>;

/// Wrap a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&Change) -> Result<(), ListenerError> + 'static,
{
    Rc::new(f)
}

/// Per-topic ordered listener lists.
#[derive(Default)]
pub struct Observers {
    listeners: RefCell<HashMap<Topic, Vec<Listener>>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to `topic`. Subscribing twice means being called twice.
    pub fn subscribe(&self, topic: Topic, listener: &Listener) {
        self.listeners
            .borrow_mut()
            .entry(topic)
            .or_default()
            .push(Rc::clone(listener));
    }

    /// Remove every registration of `listener` on `topic`. Returns how many were removed.
    pub fn unsubscribe(&self, topic: Topic, listener: &Listener) -> usize {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&topic) else {
            return 0;
        };
        let before = list.len();
        list.retain(|l| !Rc::ptr_eq(l, listener));
        before - list.len()
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        self.listeners.borrow().get(&topic).map_or(0, Vec::len)
    }

    /// Deliver `change` to its topic's listeners. Returns the number that failed.
    pub fn notify(&self, change: &Change) -> usize {
        let topic = change.topic();
        // Snapshot so listeners may (un)subscribe while being notified
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        let mut failed = 0;
        for listener in snapshot {
            if let Err(err) = listener(change) {
                failed += 1;
                tracing::warn!(%topic, error = %err, "change listener failed");
            }
        }
        failed
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let mut map = f.debug_map();
        for (topic, list) in listeners.iter() {
            map.entry(topic, &list.len());
        }
        map.finish()
    }
}
