//! Application service wiring.
//!
//! [`AppServices`] is built once at startup and handed to whatever renders
//! the UI. It owns the only instances of the catalog client, the
//! persistence store, and the account service.

use std::rc::Rc;

use serde_json::Value;

use crate::config::{SEARCH_DEBOUNCE_MS, StoreConfig};
use crate::core::error::{FetchError, StorageError};
use crate::core::{AccountService, CatalogClient, PersistenceStore, Transport};
use crate::models::SearchScope;
use crate::utils::{BrowserStorage, Clock, Debouncer, FetchTransport, KeyValueStore, SystemClock};

/// Application-wide services.
///
/// # Architecture
///
/// - **Catalog**: cached reads from the movie-metadata API
/// - **Store**: user collections with change notification
/// - **Accounts**: browser-local sign-in, also the store's session provider
pub struct AppServices<T = FetchTransport> {
    pub catalog: Rc<CatalogClient<T>>,
    pub store: Rc<PersistenceStore>,
    pub accounts: Rc<AccountService>,
    search_debounce: Debouncer,
}

impl AppServices<FetchTransport> {
    /// Services backed by `localStorage`, `Date.now()`, and `fetch`.
    pub fn browser() -> Result<Self, StorageError> {
        let storage: Rc<dyn KeyValueStore> = Rc::new(BrowserStorage::local()?);
        let services = Self::new(storage, Rc::new(SystemClock), FetchTransport::default());
        services.store.sync_from_session()?;
        Ok(services)
    }
}

impl<T: Transport> AppServices<T> {
    pub fn new(storage: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, transport: T) -> Self {
        let accounts = Rc::new(AccountService::new(Rc::clone(&storage), Rc::clone(&clock)));
        let store = Rc::new(PersistenceStore::with_config(
            storage,
            Rc::clone(&clock),
            accounts.clone(),
            StoreConfig::default(),
        ));
        let catalog = Rc::new(CatalogClient::new(transport, clock));

        Self {
            catalog,
            store,
            accounts,
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE_MS),
        }
    }
}

impl<T: Transport + 'static> AppServices<T> {
    /// Search once typing pauses. Only the last query of a burst is sent;
    /// blank queries cancel the pending search.
    pub fn search_as_you_type(
        &self,
        query: &str,
        on_result: impl FnOnce(Result<Value, FetchError>) + 'static,
    ) {
        let query = query.trim().to_string();
        if query.is_empty() {
            self.search_debounce.cancel();
            return;
        }

        let catalog = Rc::clone(&self.catalog);
        self.search_debounce.call(move || {
            wasm_bindgen_futures::spawn_local(async move {
                let result = catalog.search(&query, SearchScope::Multi, 1).await;
                on_result(result);
            });
        });
    }
}
