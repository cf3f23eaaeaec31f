//! Which posts a feed draws from.

use serde::{Deserialize, Serialize};

/// Filter applied when assembling a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedScope {
    /// Every post on the site
    All,
    /// Posts filed under the group with this ID
    Group(i64),
    /// Posts written by this user
    Author(i64),
    /// Posts by the authors this user follows
    FollowedBy(i64),
}

impl FeedScope {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Group(_) => "group",
            Self::Author(_) => "author",
            Self::FollowedBy(_) => "follow",
        }
    }
}

impl std::fmt::Display for FeedScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Group(id) => write!(f, "group:{}", id),
            Self::Author(id) => write!(f, "author:{}", id),
            Self::FollowedBy(id) => write!(f, "follow:{}", id),
        }
    }
}
