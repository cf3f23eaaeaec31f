//! Access rules for site actions.

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visitor {
    Anonymous,
    Authenticated(i64),
}

impl Visitor {
    pub fn from_user_id(user_id: Option<i64>) -> Self {
        user_id.map_or(Self::Anonymous, Self::Authenticated)
    }
}

/// An action a visitor attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Feed, group, profile or post detail pages
    View,
    CreatePost,
    EditPost { author_id: i64 },
    Comment,
    Follow,
    Unfollow,
    FollowFeed,
}

impl Action {
    pub fn requires_login(&self) -> bool {
        !matches!(self, Self::View)
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Send the visitor to the login page, remembering where they were going
    RedirectToLogin,
    /// Quietly send the visitor back to the post page
    RedirectToPost,
}

/// Domain service deciding who may do what.
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn decide(visitor: Visitor, action: Action) -> Decision {
        match (visitor, action) {
            (_, Action::View) => Decision::Allow,
            (Visitor::Anonymous, _) => Decision::RedirectToLogin,
            (Visitor::Authenticated(user_id), Action::EditPost { author_id }) => {
                if user_id == author_id {
                    Decision::Allow
                } else {
                    Decision::RedirectToPost
                }
            }
            (Visitor::Authenticated(_), _) => Decision::Allow,
        }
    }
}
