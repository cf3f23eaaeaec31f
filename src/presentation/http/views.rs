//! HTML Views
//!
//! Askama page templates and the flattened view models they render. Values
//! are formatted here so templates only print fields.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::application::services::PostDetail;
use crate::domain::{CommentWithAuthor, Group, Page, PageWindow, PostCard, SessionUser};
use crate::shared::error::AppError;
use crate::shared::validation::FormErrors;

const DATE_FORMAT: &str = "%-d %B %Y";

/// Render a template into an HTML response.
pub fn render<T: Template>(page: &T) -> Result<Response, AppError> {
    Ok(Html(page.render()?).into_response())
}

pub fn post_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub fn media_url(path: &str) -> String {
    format!("/media/{}", path)
}

#[derive(Debug, Clone)]
pub struct GroupLink {
    pub title: String,
    pub url: String,
}

impl From<&Group> for GroupLink {
    fn from(group: &Group) -> Self {
        Self {
            title: group.title.clone(),
            url: format!("/group/{}/", group.slug),
        }
    }
}

/// A post as shown in feeds and on its own page.
#[derive(Debug, Clone)]
pub struct PostItem {
    pub id: i64,
    pub url: String,
    pub text: String,
    /// Text cut to the configured length, for titles.
    pub excerpt: String,
    pub pub_date: String,
    pub author_name: String,
    pub author_url: String,
    pub group: Option<GroupLink>,
    pub image_url: Option<String>,
}

impl PostItem {
    pub fn new(card: &PostCard, truncate_to: usize) -> Self {
        Self {
            id: card.post.id,
            url: post_url(card.post.id),
            text: card.post.text.clone(),
            excerpt: format!("{:.*}", truncate_to, card.post),
            pub_date: card.post.pub_date.format(DATE_FORMAT).to_string(),
            author_name: card.author.display_name().to_string(),
            author_url: profile_url(&card.author.username),
            group: card.group.as_ref().map(GroupLink::from),
            image_url: card.post.image.as_deref().map(media_url),
        }
    }

    pub fn list(page: &Page<PostCard>, truncate_to: usize) -> Vec<Self> {
        page.items
            .iter()
            .map(|card| Self::new(card, truncate_to))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: u32,
    pub current: bool,
}

/// Paginator controls; links are relative (`?page=N`).
#[derive(Debug, Clone)]
pub struct PageNav {
    pub number: u32,
    pub num_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous: u32,
    pub next: u32,
    pub has_other_pages: bool,
    pub links: Vec<PageLink>,
}

impl From<&PageWindow> for PageNav {
    fn from(window: &PageWindow) -> Self {
        Self {
            number: window.number,
            num_pages: window.num_pages,
            has_previous: window.has_previous(),
            has_next: window.has_next(),
            previous: window.previous_number(),
            next: window.next_number(),
            has_other_pages: window.has_other_pages(),
            links: (1..=window.num_pages)
                .map(|number| PageLink {
                    number,
                    current: number == window.number,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentItem {
    pub author_name: String,
    pub author_url: String,
    pub text: String,
    pub created: String,
}

impl From<&CommentWithAuthor> for CommentItem {
    fn from(c: &CommentWithAuthor) -> Self {
        Self {
            author_name: c.author_username.clone(),
            author_url: profile_url(&c.author_username),
            text: c.comment.text.clone(),
            created: c.comment.created.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroupOption {
    pub id: i64,
    pub title: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexPage {
    pub viewer: Option<SessionUser>,
    pub posts: Vec<PostItem>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupPage {
    pub viewer: Option<SessionUser>,
    pub title: String,
    pub description: String,
    pub posts: Vec<PostItem>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfilePage {
    pub viewer: Option<SessionUser>,
    pub username: String,
    pub author_name: String,
    pub post_count: u64,
    pub followers: u64,
    pub follows: u64,
    pub following: bool,
    /// Signed in and looking at somebody else's profile.
    pub can_follow: bool,
    pub follow_url: String,
    pub unfollow_url: String,
    pub posts: Vec<PostItem>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "posts/follow.html")]
pub struct FollowPage {
    pub viewer: Option<SessionUser>,
    pub posts: Vec<PostItem>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailPage {
    pub viewer: Option<SessionUser>,
    pub post: PostItem,
    pub author_post_count: u64,
    pub comments: Vec<CommentItem>,
    pub can_edit: bool,
    pub comment_text: String,
    pub errors: FormErrors,
}

impl PostDetailPage {
    pub fn new(viewer: Option<SessionUser>, detail: &PostDetail, truncate_to: usize) -> Self {
        let can_edit = viewer
            .as_ref()
            .is_some_and(|v| detail.card.post.is_author(v.id));
        Self {
            viewer,
            post: PostItem::new(&detail.card, truncate_to),
            author_post_count: detail.author_post_count,
            comments: detail.comments.iter().map(CommentItem::from).collect(),
            can_edit,
            comment_text: String::new(),
            errors: FormErrors::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormPage {
    pub viewer: Option<SessionUser>,
    pub is_edit: bool,
    pub action: String,
    pub text: String,
    pub groups: Vec<GroupOption>,
    pub current_image: Option<String>,
    pub errors: FormErrors,
}

impl PostFormPage {
    pub fn new(
        viewer: Option<SessionUser>,
        action: String,
        groups: &[Group],
        selected: Option<i64>,
    ) -> Self {
        Self {
            viewer,
            is_edit: false,
            action,
            text: String::new(),
            groups: groups
                .iter()
                .map(|g| GroupOption {
                    id: g.id,
                    title: g.title.clone(),
                    selected: Some(g.id) == selected,
                })
                .collect(),
            current_image: None,
            errors: FormErrors::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginPage {
    pub viewer: Option<SessionUser>,
    pub username: String,
    pub next: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupPage {
    pub viewer: Option<SessionUser>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "users/logged_out.html")]
pub struct LoggedOutPage {
    pub viewer: Option<SessionUser>,
}

#[derive(Template)]
#[template(path = "about/author.html")]
pub struct AboutAuthorPage {
    pub viewer: Option<SessionUser>,
}

#[derive(Template)]
#[template(path = "about/tech.html")]
pub struct AboutTechPage {
    pub viewer: Option<SessionUser>,
}
