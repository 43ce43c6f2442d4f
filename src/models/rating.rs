use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A user score from 1 to 10 inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Returns `None` outside `1..=10`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("score {} out of range 1-10", value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// A stored rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "rating")]
    pub score: Score,
    #[serde(rename = "timestamp")]
    pub rated_at: u64,
}

/// All ratings keyed by partition key (`{kind}_{id}`).
pub type Ratings = BTreeMap<String, Rating>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(Score::new(0).is_none());
        assert_eq!(Score::new(1).map(Score::get), Some(1));
        assert_eq!(Score::new(10).map(Score::get), Some(10));
        assert!(Score::new(11).is_none());
    }

    #[test]
    fn test_rating_rejects_out_of_range_json() {
        let ok: Rating = serde_json::from_str(r#"{"rating": 8, "timestamp": 5}"#).unwrap();
        assert_eq!(ok.score.get(), 8);
        assert!(serde_json::from_str::<Rating>(r#"{"rating": 11, "timestamp": 5}"#).is_err());
    }

    #[test]
    fn test_score_display() {
        assert_eq!(Score::new(7).unwrap().to_string(), "7/10");
    }
}
