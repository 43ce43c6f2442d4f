use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A user comment on a catalog title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(rename = "userId")]
    pub author_id: String,
    #[serde(rename = "userName")]
    pub author_name: String,
    #[serde(rename = "userAvatar", default)]
    pub author_avatar_url: String,
    pub text: String,
    #[serde(rename = "timestamp")]
    pub posted_at: u64,
    #[serde(rename = "likes", default, deserialize_with = "lenient_count")]
    pub like_count: u32,
    #[serde(rename = "likedBy", default)]
    pub liked_by: BTreeSet<String>,
}

impl Comment {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.contains(user_id)
    }

    /// Add or remove `user_id`'s like. Returns `true` if the comment is now liked.
    ///
    /// The count always follows the size of the liked-by set.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        let liked = if self.liked_by.remove(user_id) {
            false
        } else {
            self.liked_by.insert(user_id.to_string());
            true
        };
        self.sync_like_count();
        liked
    }

    /// Reset the count to the size of the liked-by set.
    pub fn sync_like_count(&mut self) {
        self.like_count = u32::try_from(self.liked_by.len()).unwrap_or(u32::MAX);
    }
}

/// Out-of-range or non-numeric counts read as zero until the count is synced
/// with the liked-by set.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0))
}

/// All comments keyed by partition key, each list in posting order.
pub type CommentThreads = BTreeMap<String, Vec<Comment>>;
