use serde::{Deserialize, Serialize};

use super::SavedItem;

/// The public part of a local account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: CreatedAt,
    #[serde(default)]
    pub favorites: Vec<SavedItem>,
    #[serde(default)]
    pub watchlist: Vec<SavedItem>,
}

/// Account creation time: Unix milliseconds, or the ISO-8601 text older
/// records carry. Text is kept as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    Millis(u64),
    Iso(String),
}

impl Default for CreatedAt {
    fn default() -> Self {
        Self::Millis(0)
    }
}

impl From<u64> for CreatedAt {
    fn from(ms: u64) -> Self {
        Self::Millis(ms)
    }
}

/// A stored account: profile plus the encoded password.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub password: String,
}

/// Counts shown on the profile statistics panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserStats {
    pub favorites: usize,
    pub watchlist: usize,
    pub history: usize,
    pub ratings: usize,
    /// Mean score, `None` when nothing is rated.
    pub average_rating: Option<f64>,
}
