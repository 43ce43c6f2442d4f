use std::fmt;

use serde::Deserialize;

use super::MediaKind;

/// What a search covers (`/search/{scope}`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchScope {
    #[default]
    Multi,
    Only(MediaKind),
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multi => f.write_str("multi"),
            Self::Only(kind) => kind.fmt(f),
        }
    }
}

/// Media filter for trending lists (`/trending/{scope}/{window}`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrendingScope {
    #[default]
    All,
    Only(MediaKind),
}

impl fmt::Display for TrendingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(kind) => kind.fmt(f),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Week => "week",
        })
    }
}

/// One entry of a details response's `videos.results`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind == "Trailer"
    }
}

/// A playable trailer with its embed URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trailer {
    pub name: String,
    pub key: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        assert_eq!(SearchScope::Multi.to_string(), "multi");
        assert_eq!(SearchScope::Only(MediaKind::Series).to_string(), "tv");
        assert_eq!(TrendingScope::Only(MediaKind::Movie).to_string(), "movie");
        assert_eq!(TimeWindow::Week.to_string(), "week");
    }
}
