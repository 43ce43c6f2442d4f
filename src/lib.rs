//! Browser-side core of a movie discovery front end.
//!
//! - [`core::CatalogClient`] reads the movie-metadata API through a
//!   time-bounded [`core::ResponseCache`]
//! - [`core::PersistenceStore`] keeps favorites, watchlist, view history,
//!   ratings, and comments in `localStorage` and notifies subscribers
//! - [`core::AccountService`] simulates per-browser accounts
//!
//! [`app::AppServices`] wires them together once at startup.

pub mod app;
pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod utils;

pub use app::AppServices;
