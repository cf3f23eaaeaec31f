//! Post Repository Implementation
//!
//! PostgreSQL implementation of post storage and feed queries. Feed rows are
//! joined with their author and group in a single query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::domain::{AuthorRef, FeedScope, Group, Post, PostCard, PostRepository};
use crate::shared::error::AppError;

const POST_COLUMNS: &str = "id, text, pub_date, author_id, group_id, image";

const CARD_SELECT: &str = r#"
    SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image,
           u.username AS author_username,
           u.first_name AS author_first_name,
           u.last_name AS author_last_name,
           g.title AS group_title,
           g.slug AS group_slug,
           g.description AS group_description
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    text: String,
    pub_date: DateTime<Utc>,
    author_id: i64,
    group_id: Option<i64>,
    image: Option<String>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            text: self.text,
            pub_date: self.pub_date,
            author_id: self.author_id,
            group_id: self.group_id,
            image: self.image,
        }
    }
}

/// A post row joined with author and group columns.
#[derive(Debug, sqlx::FromRow)]
struct PostCardRow {
    id: i64,
    text: String,
    pub_date: DateTime<Utc>,
    author_id: i64,
    group_id: Option<i64>,
    image: Option<String>,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    group_title: Option<String>,
    group_slug: Option<String>,
    group_description: Option<String>,
}

impl PostCardRow {
    fn into_card(self) -> PostCard {
        let group = match (self.group_id, self.group_title, self.group_slug) {
            (Some(id), Some(title), Some(slug)) => Some(Group {
                id,
                title,
                slug,
                description: self.group_description.unwrap_or_default(),
            }),
            _ => None,
        };
        let full_name = format!("{} {}", self.author_first_name, self.author_last_name)
            .trim()
            .to_string();

        PostCard {
            post: Post {
                id: self.id,
                text: self.text,
                pub_date: self.pub_date,
                author_id: self.author_id,
                group_id: self.group_id,
                image: self.image,
            },
            author: AuthorRef {
                id: self.author_id,
                username: self.author_username,
                full_name,
            },
            group,
        }
    }
}

/// Append the WHERE clause selecting `scope` to a query over `posts p`.
fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: FeedScope) {
    match scope {
        FeedScope::All => {}
        FeedScope::Group(group_id) => {
            qb.push(" WHERE p.group_id = ").push_bind(group_id);
        }
        FeedScope::Author(author_id) => {
            qb.push(" WHERE p.author_id = ").push_bind(author_id);
        }
        FeedScope::FollowedBy(user_id) => {
            qb.push(" WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }
}

/// PostgreSQL post repository implementation.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM posts WHERE id = $1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn find_card(&self, id: i64) -> Result<Option<PostCard>, AppError> {
        let row = sqlx::query_as::<_, PostCardRow>(&format!("{} WHERE p.id = $1", CARD_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostCardRow::into_card))
    }

    #[instrument(skip(self, post), fields(post_id = post.id, author_id = post.author_id))]
    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (id, text, pub_date, author_id, group_id, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(post.id)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.author_id)
        .bind(post.group_id)
        .bind(&post.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_post())
    }

    /// Only `text`, `group_id` and `image` are written; author and date stay.
    #[instrument(skip(self, post), fields(post_id = post.id))]
    async fn update(&self, post: &Post) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET text = $2, group_id = $3, image = $4
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(post.id)
        .bind(&post.text)
        .bind(post.group_id)
        .bind(&post.image)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post.id)))?;

        Ok(row.into_post())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }

        Ok(())
    }

    async fn count(&self, scope: FeedScope) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_scope(&mut qb, scope);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn list(
        &self,
        scope: FeedScope,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<PostCard>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(CARD_SELECT);
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY p.pub_date DESC, p.id DESC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(offset as i64);

        let rows = qb
            .build_query_as::<PostCardRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostCardRow::into_card).collect())
    }
}
