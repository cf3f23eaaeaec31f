//! In-Memory Repositories
//!
//! A single `MemoryStore` implements every repository trait over shared
//! tables guarded by one `RwLock`. It enforces the same constraints as the
//! Postgres schema (unique usernames and slugs, foreign keys, cascades, no
//! self-follow) so services behave identically on either backend.
//!
//! Used by the test suite and by `storage.backend = "memory"` for local demos.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{
    AuthorRef, Comment, CommentRepository, CommentWithAuthor, FeedScope, Follow,
    FollowRepository, Group, GroupRepository, Post, PostCard, PostRepository, User,
    UserRepository,
};
use crate::shared::error::AppError;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    follows: HashMap<(i64, i64), Follow>,
}

impl Tables {
    fn in_scope(&self, post: &Post, scope: FeedScope) -> bool {
        match scope {
            FeedScope::All => true,
            FeedScope::Group(group_id) => post.group_id == Some(group_id),
            FeedScope::Author(author_id) => post.author_id == author_id,
            FeedScope::FollowedBy(user_id) => {
                self.follows.contains_key(&(user_id, post.author_id))
            }
        }
    }

    fn card(&self, post: &Post) -> Option<PostCard> {
        let author = self.users.get(&post.author_id)?;
        let group = post.group_id.and_then(|id| self.groups.get(&id)).cloned();
        Some(PostCard {
            post: post.clone(),
            author: AuthorRef {
                id: author.id,
                username: author.username.clone(),
                full_name: author.full_name(),
            },
            group,
        })
    }

    fn check_post_references(&self, post: &Post) -> Result<(), AppError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(AppError::Conflict(format!(
                "Author {} does not exist",
                post.author_id
            )));
        }
        if let Some(group_id) = post.group_id {
            if !self.groups.contains_key(&group_id) {
                return Err(AppError::Conflict(format!("Group {} does not exist", group_id)));
            }
        }
        Ok(())
    }
}

/// Process-local storage implementing all repository traits.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .any(|u| u.username == username))
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!("Username {} is taken", user.username)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, AppError> {
        Ok(self.tables.read().groups.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, AppError> {
        Ok(self
            .tables
            .read()
            .groups
            .values()
            .find(|g| g.slug == slug)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>, AppError> {
        let mut groups: Vec<Group> = self.tables.read().groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn create(&self, group: &Group) -> Result<Group, AppError> {
        let mut tables = self.tables.write();
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(AppError::Conflict(format!("Group slug {} is taken", group.slug)));
        }
        tables.groups.insert(group.id, group.clone());
        Ok(group.clone())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.tables.read().posts.get(&id).cloned())
    }

    async fn find_card(&self, id: i64) -> Result<Option<PostCard>, AppError> {
        let tables = self.tables.read();
        Ok(tables.posts.get(&id).and_then(|p| tables.card(p)))
    }

    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let mut tables = self.tables.write();
        tables.check_post_references(post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post.clone())
    }

    async fn update(&self, post: &Post) -> Result<Post, AppError> {
        let mut tables = self.tables.write();
        tables.check_post_references(post)?;
        let stored = tables
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post.id)))?;

        stored.text = post.text.clone();
        stored.group_id = post.group_id;
        stored.image = post.image.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        if tables.posts.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }

    async fn count(&self, scope: FeedScope) -> Result<u64, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .posts
            .values()
            .filter(|p| tables.in_scope(p, scope))
            .count() as u64)
    }

    async fn list(
        &self,
        scope: FeedScope,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<PostCard>, AppError> {
        let tables = self.tables.read();
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| tables.in_scope(p, scope))
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .filter_map(|p| tables.card(p))
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError> {
        let mut tables = self.tables.write();
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(AppError::Conflict(format!(
                "Post {} does not exist",
                comment.post_id
            )));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(AppError::Conflict(format!(
                "Author {} does not exist",
                comment.author_id
            )));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment.clone())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, AppError> {
        let tables = self.tables.read();
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));

        Ok(comments
            .into_iter()
            .map(|c| CommentWithAuthor {
                comment: c.clone(),
                author_username: tables
                    .users
                    .get(&c.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn count_for_post(&self, post_id: i64) -> Result<u64, AppError> {
        Ok(self
            .tables
            .read()
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as u64)
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn create(&self, follow: &Follow) -> Result<bool, AppError> {
        if follow.is_self_follow() {
            return Err(AppError::Conflict("Users cannot follow themselves".into()));
        }
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&follow.user_id)
            || !tables.users.contains_key(&follow.author_id)
        {
            return Err(AppError::Conflict("Follow references a missing user".into()));
        }
        let key = (follow.user_id, follow.author_id);
        if tables.follows.contains_key(&key) {
            return Ok(false);
        }
        tables.follows.insert(key, follow.clone());
        Ok(true)
    }

    async fn delete(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        Ok(self
            .tables
            .write()
            .follows
            .remove(&(user_id, author_id))
            .is_some())
    }

    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        Ok(self.tables.read().follows.contains_key(&(user_id, author_id)))
    }

    async fn count_followers(&self, author_id: i64) -> Result<u64, AppError> {
        Ok(self
            .tables
            .read()
            .follows
            .keys()
            .filter(|(_, a)| *a == author_id)
            .count() as u64)
    }

    async fn count_following(&self, user_id: i64) -> Result<u64, AppError> {
        Ok(self
            .tables
            .read()
            .follows
            .keys()
            .filter(|(u, _)| *u == user_id)
            .count() as u64)
    }
}
