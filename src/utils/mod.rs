//! Utility modules for browser access, time, storage, and networking.
//!
//! Provides:
//! - [`KeyValueStore`] with [`BrowserStorage`] and [`MemoryStorage`] backends
//! - [`Clock`] with [`SystemClock`] and [`ManualClock`]
//! - [`FetchTransport`] - Fetch API with timeout
//! - [`Debouncer`] - Trailing-edge debounce for input handlers

mod clock;
mod debounce;
pub mod dom;
mod fetch;
mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::Debouncer;
pub use fetch::{FetchTransport, RaceResult, fetch_json, race_with_timeout};
pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage};
