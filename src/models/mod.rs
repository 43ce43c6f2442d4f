//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`MediaItem`], [`SavedItem`], [`HistoryEntry`], [`PartitionKey`] - Saved titles
//! - [`Rating`], [`Score`] - User ratings
//! - [`Comment`] - Per-title comment threads
//! - [`UserProfile`], [`UserRecord`], [`UserStats`] - Local accounts
//! - [`SearchScope`], [`TrendingScope`], [`Video`], [`Trailer`] - Catalog request and payload types

mod catalog;
mod comment;
mod media;
mod rating;
mod user;

pub use catalog::{SearchScope, TimeWindow, Trailer, TrendingScope, Video};
pub use comment::{Comment, CommentThreads};
pub use media::{HistoryEntry, MediaItem, MediaKind, PartitionKey, SavedItem};
pub use rating::{Rating, Ratings, Score};
pub use user::{CreatedAt, UserProfile, UserRecord, UserStats};
