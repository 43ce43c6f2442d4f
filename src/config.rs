//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application,
//! plus the small configuration structs handed to each service at startup.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name, also used as the storage key prefix.
pub const APP_NAME: &str = "cinevault";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Storage Keys
// =============================================================================

/// localStorage keys, one JSON document each.
pub mod storage_keys {
    pub const FAVORITES: &str = "cinevault_favorites";
    pub const WATCHLIST: &str = "cinevault_watchlist";
    pub const HISTORY: &str = "cinevault_history";
    pub const RATINGS: &str = "cinevault_ratings";
    pub const COMMENTS: &str = "cinevault_comments";
    pub const USERS: &str = "cinevault_users";
    pub const CURRENT_USER: &str = "cinevault_current_user";
}

/// Maximum number of view history entries to keep.
pub const MAX_HISTORY: usize = 50;

// =============================================================================
// Catalog Configuration
// =============================================================================

/// Movie-metadata API base URL.
pub const CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Image CDN base URL (size segment and path are appended).
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Embed base URL for trailer videos.
pub const VIDEO_EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";

/// API key, injected at build time.
pub const CATALOG_API_KEY: &str = match option_env!("TMDB_API_KEY") {
    Some(key) => key,
    None => "",
};

/// Response language sent with every catalog request.
pub const CATALOG_LANGUAGE: &str = "ru-RU";

/// Freshness window for cached catalog responses (5 minutes).
pub const CACHE_TTL_MS: u64 = 5 * 60 * 1000;

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

/// Extra sections requested alongside movie/series details.
pub const DETAILS_APPEND: &str = "videos,credits,similar,recommendations";

/// Fallback artwork when the catalog has no image path.
pub mod placeholders {
    pub const POSTER: &str = "https://via.placeholder.com/500x750?text=No+Poster";
    pub const BACKDROP: &str = "https://via.placeholder.com/1920x1080?text=No+Backdrop";
}

/// Default image sizes.
pub mod image_sizes {
    pub const POSTER: &str = "w500";
    pub const CARD_POSTER: &str = "w342";
    pub const BACKDROP: &str = "original";
}

// =============================================================================
// Accounts
// =============================================================================

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Generated avatar service; the URL-encoded user name is appended.
pub const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/?name=";

/// Query suffix for generated avatars.
pub const AVATAR_STYLE: &str = "&background=ff6b4a&color=fff&size=128";

// =============================================================================
// Input
// =============================================================================

/// Delay before a search-as-you-type query is sent.
pub const SEARCH_DEBOUNCE_MS: u32 = 500;

// =============================================================================
// Service Configuration
// =============================================================================

/// Settings for [`CatalogClient`](crate::core::CatalogClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub video_base_url: String,
    pub api_key: String,
    pub language: String,
    pub cache_ttl_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: CATALOG_BASE_URL.to_string(),
            image_base_url: IMAGE_BASE_URL.to_string(),
            video_base_url: VIDEO_EMBED_BASE_URL.to_string(),
            api_key: CATALOG_API_KEY.to_string(),
            language: CATALOG_LANGUAGE.to_string(),
            cache_ttl_ms: CACHE_TTL_MS,
        }
    }
}

/// Storage key layout for the persistence store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreKeys {
    pub favorites: String,
    pub watchlist: String,
    pub history: String,
    pub ratings: String,
    pub comments: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            favorites: storage_keys::FAVORITES.to_string(),
            watchlist: storage_keys::WATCHLIST.to_string(),
            history: storage_keys::HISTORY.to_string(),
            ratings: storage_keys::RATINGS.to_string(),
            comments: storage_keys::COMMENTS.to_string(),
        }
    }
}

/// Settings for [`PersistenceStore`](crate::core::PersistenceStore).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub keys: StoreKeys,
    pub max_history: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            keys: StoreKeys::default(),
            max_history: MAX_HISTORY,
        }
    }
}

/// Storage key layout for the account service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountConfig {
    pub users_key: String,
    pub current_user_key: String,
    pub min_password_len: usize,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            users_key: storage_keys::USERS.to_string(),
            current_user_key: storage_keys::CURRENT_USER.to_string(),
            min_password_len: MIN_PASSWORD_LEN,
        }
    }
}
