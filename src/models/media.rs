use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Media Kind
// =============================================================================

/// Catalog section an entry belongs to.
///
/// Serialized as the catalog's own path segment (`"movie"` / `"tv"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaKind {
    #[default]
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv", alias = "series")]
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" | "series" => Ok(Self::Series),
            other => Err(format!("unknown media kind '{}'", other)),
        }
    }
}

// =============================================================================
// Partition Key
// =============================================================================

/// Scope for per-title data (ratings, comments): `{kind}_{id}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    pub kind: MediaKind,
    pub id: u64,
}

impl PartitionKey {
    pub fn new(id: u64, kind: MediaKind) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.id)
    }
}

// =============================================================================
// Saved Entries
// =============================================================================

/// The catalog fields kept for a title the user interacted with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
}

impl MediaItem {
    pub fn new(id: u64, kind: MediaKind, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            kind,
        }
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    /// Whether this is the `(id, kind)` pair given.
    pub fn is(&self, id: u64, kind: MediaKind) -> bool {
        self.id == id && self.kind == kind
    }

    pub fn partition(&self) -> PartitionKey {
        PartitionKey::new(self.id, self.kind)
    }
}

/// A favorites or watchlist entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    #[serde(flatten)]
    pub item: MediaItem,
    #[serde(rename = "addedAt")]
    pub added_at: u64,
}

/// A view history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub item: MediaItem,
    #[serde(rename = "viewedAt")]
    pub viewed_at: u64,
}
