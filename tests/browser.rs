//! Browser-only checks. Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use cinevault::core::{NoSession, PersistenceStore};
use cinevault::models::{MediaItem, MediaKind};
use cinevault::utils::{BrowserStorage, Clock, Debouncer, KeyValueStore, SystemClock};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let storage = BrowserStorage::local().unwrap();
    storage.set_item("cinevault_test", "[1,2]").unwrap();
    assert_eq!(storage.get_item("cinevault_test").unwrap().as_deref(), Some("[1,2]"));

    storage.remove_item("cinevault_test").unwrap();
    assert_eq!(storage.get_item("cinevault_test").unwrap(), None);
}

#[wasm_bindgen_test]
fn store_writes_reach_local_storage() {
    let storage = BrowserStorage::local().unwrap();
    storage.remove_item("cinevault_favorites").unwrap();

    let store = PersistenceStore::new(
        Rc::new(storage.clone()),
        Rc::new(SystemClock),
        Rc::new(NoSession),
    );
    store
        .add_favorite(MediaItem::new(42, MediaKind::Movie, "Dune"))
        .unwrap();

    let raw = storage.get_item("cinevault_favorites").unwrap().unwrap();
    assert!(raw.contains("\"id\":42"));
    storage.remove_item("cinevault_favorites").unwrap();
}

#[wasm_bindgen_test]
fn system_clock_is_wall_time() {
    assert!(SystemClock.now_ms() > 1_600_000_000_000);
}

#[wasm_bindgen_test]
async fn debouncer_runs_only_the_last_call() {
    let debouncer = Debouncer::new(20);
    let hits = Rc::new(Cell::new(0));

    for n in 1..=3 {
        let hits = Rc::clone(&hits);
        debouncer.call(move || hits.set(n));
    }
    assert!(debouncer.is_pending());

    TimeoutFuture::new(60).await;
    assert_eq!(hits.get(), 3);
    assert!(!debouncer.is_pending());
}

#[wasm_bindgen_test]
async fn cancelled_debounce_never_fires() {
    let debouncer = Debouncer::new(20);
    let hits = Rc::new(Cell::new(0));

    let counter = Rc::clone(&hits);
    debouncer.call(move || counter.set(counter.get() + 1));
    debouncer.cancel();

    TimeoutFuture::new(60).await;
    assert_eq!(hits.get(), 0);
}
