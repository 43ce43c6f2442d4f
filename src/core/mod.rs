//! Core services of the application.
//!
//! This module provides:
//! - [`ResponseCache`] and [`CatalogClient`] for cached catalog reads
//! - [`PersistenceStore`] for favorites, watchlist, history, ratings, and comments
//! - [`Observers`] change notification per [`Topic`]
//! - [`AccountService`] browser-local accounts behind [`SessionProvider`]

mod cache;
mod catalog;
pub mod error;
mod observer;
mod persist;
mod session;
mod store;

pub use cache::ResponseCache;
pub use catalog::{CatalogClient, CatalogRequest, Transport};
pub use observer::{Change, Listener, Observers, Topic, listener};
pub use session::{
    AccountService, MirroredCollection, NoSession, Registration, SessionProvider, is_valid_email,
};
pub use store::PersistenceStore;
