//! Post and Feed Handlers

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::Uri,
    response::Response,
    Form,
};
use serde::Deserialize;
use validator::Validate;

use crate::application::dto::{CommentForm, PostForm};
use crate::application::services::{
    CommentError, CommentService, FeedError, FeedService, FollowError, FollowService,
    PostDetail, PostDraft, PostError, PostService,
};
use crate::domain::{
    parse_page_number, AccessPolicy, Action, Decision, FeedScope, Group, Post, SessionUser,
};
use crate::presentation::http::extractors::{found, login_redirect, AuthUser, Viewer};
use crate::presentation::http::forms::read_post_form;
use crate::presentation::http::views::{
    post_url, profile_url, render, FollowPage, GroupPage, IndexPage, PageNav, PostDetailPage,
    PostFormPage, PostItem, ProfilePage,
};
use crate::shared::error::AppError;
use crate::shared::validation::FormErrors;
use crate::startup::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    fn number(&self) -> Result<u32, AppError> {
        parse_page_number(self.page.as_deref()).map_err(|e| AppError::NotFound(e.to_string()))
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Post {} not found", raw)))
}

fn feed_error(e: FeedError) -> AppError {
    match e {
        FeedError::GroupNotFound => AppError::NotFound("Group not found".into()),
        FeedError::AuthorNotFound => AppError::NotFound("User not found".into()),
        FeedError::Page(e) => AppError::NotFound(e.to_string()),
        FeedError::Storage(e) => e,
    }
}

fn post_error(e: PostError) -> AppError {
    match e {
        PostError::NotFound => AppError::NotFound("Post not found".into()),
        PostError::Storage(e) => e,
        e => AppError::BadRequest(e.to_string()),
    }
}

fn follow_error(e: FollowError) -> AppError {
    match e {
        FollowError::AuthorNotFound => AppError::NotFound("User not found".into()),
        FollowError::Storage(e) => e,
    }
}

/// Main feed. Served through the page cache.
pub async fn index(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let page = state
        .feed_service()
        .page(FeedScope::All, query.number()?)
        .await
        .map_err(feed_error)?;

    render(&IndexPage {
        viewer,
        posts: PostItem::list(&page, state.settings.posts.truncate_text_length),
        nav: PageNav::from(&page.window),
    })
}

pub async fn group_posts(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let (group, page) = state
        .feed_service()
        .group(&slug, query.number()?)
        .await
        .map_err(feed_error)?;

    render(&GroupPage {
        viewer,
        title: group.title,
        description: group.description,
        posts: PostItem::list(&page, state.settings.posts.truncate_text_length),
        nav: PageNav::from(&page.window),
    })
}

pub async fn profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let feed = state
        .feed_service()
        .profile(&username, query.number()?, viewer.id())
        .await
        .map_err(feed_error)?;

    let can_follow = viewer.id().is_some_and(|id| id != feed.author.id);
    let base = profile_url(&feed.author.username);

    render(&ProfilePage {
        viewer: viewer.0,
        author_name: feed.author.display_name(),
        post_count: feed.page.window.total,
        followers: feed.followers,
        follows: feed.follows,
        following: feed.following,
        can_follow,
        follow_url: format!("{}follow/", base),
        unfollow_url: format!("{}unfollow/", base),
        posts: PostItem::list(&feed.page, state.settings.posts.truncate_text_length),
        nav: PageNav::from(&feed.page.window),
        username: feed.author.username,
    })
}

async fn load_detail(state: &AppState, post_id: i64) -> Result<PostDetail, AppError> {
    state
        .post_service()
        .detail(post_id)
        .await
        .map_err(post_error)
}

pub async fn post_detail(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(post_id): Path<String>,
) -> Result<Response, AppError> {
    let detail = load_detail(&state, parse_id(&post_id)?).await?;
    render(&PostDetailPage::new(
        viewer,
        &detail,
        state.settings.posts.truncate_text_length,
    ))
}

async fn post_form_page(
    state: &AppState,
    viewer: Option<SessionUser>,
    action: String,
    selected_group: Option<i64>,
) -> Result<PostFormPage, AppError> {
    let groups: Vec<Group> = state.post_service().groups().await.map_err(post_error)?;
    Ok(PostFormPage::new(viewer, action, &groups, selected_group))
}

/// Validate a submitted form into a draft, collecting field errors.
fn draft_from_form(form: PostForm) -> Result<PostDraft, FormErrors> {
    let mut errors = FormErrors::new();
    if let Err(e) = form.validate() {
        errors.extend(e.into());
    }
    let group_id = match form.group_id() {
        Ok(group_id) => group_id,
        Err(()) => {
            errors.add("group", PostError::UnknownGroup.to_string());
            None
        }
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PostDraft {
        text: form.text,
        group_id,
        image: form.image,
    })
}

pub async fn post_create_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let page = post_form_page(&state, Some(user), "/create/".into(), None).await?;
    render(&page)
}

pub async fn post_create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_post_form(multipart).await?;
    let text = form.text.clone();
    let selected = form.group_id().ok().flatten();

    let errors = match draft_from_form(form) {
        Ok(draft) => match state.post_service().create(user.id, draft).await {
            Ok(_) => return Ok(found(&profile_url(&user.username))),
            Err(e) => match e.field() {
                Some(field) => {
                    let mut errors = FormErrors::new();
                    errors.add(field, e.to_string());
                    errors
                }
                None => return Err(post_error(e)),
            },
        },
        Err(errors) => errors,
    };

    let mut page = post_form_page(&state, Some(user), "/create/".into(), selected).await?;
    page.text = text;
    page.errors = errors;
    render(&page)
}

/// Resolve who may edit `post_id`; `Err` carries the redirect to send instead.
///
/// Anonymous visitors are sent to login before the post is looked up.
async fn authorize_edit(
    state: &AppState,
    viewer: &Viewer,
    uri: &Uri,
    post_id: i64,
) -> Result<Result<(Post, SessionUser), Response>, AppError> {
    let Some(user) = viewer.0.clone() else {
        return Ok(Err(login_redirect(uri)));
    };

    let post = state.post_service().get(post_id).await.map_err(post_error)?;
    let decision = AccessPolicy::decide(
        viewer.visitor(),
        Action::EditPost {
            author_id: post.author_id,
        },
    );

    Ok(match decision {
        Decision::Allow => Ok((post, user)),
        Decision::RedirectToLogin => Err(login_redirect(uri)),
        Decision::RedirectToPost => Err(found(&post_url(post_id))),
    })
}

pub async fn post_edit_form(
    State(state): State<AppState>,
    viewer: Viewer,
    uri: Uri,
    Path(post_id): Path<String>,
) -> Result<Response, AppError> {
    let post_id = parse_id(&post_id)?;
    let (post, user) = match authorize_edit(&state, &viewer, &uri, post_id).await? {
        Ok(allowed) => allowed,
        Err(redirect) => return Ok(redirect),
    };

    let mut page = post_form_page(&state, Some(user), uri.path().to_string(), post.group_id).await?;
    page.is_edit = true;
    page.text = post.text;
    page.current_image = post.image;
    render(&page)
}

/// The body is only decoded once the visitor is allowed to edit, so a
/// malformed submission from anyone else still gets its redirect.
pub async fn post_edit(
    State(state): State<AppState>,
    viewer: Viewer,
    uri: Uri,
    Path(post_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let post_id = parse_id(&post_id)?;
    let (post, user) = match authorize_edit(&state, &viewer, &uri, post_id).await? {
        Ok(allowed) => allowed,
        Err(redirect) => return Ok(redirect),
    };
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let form = read_post_form(multipart).await?;
    let text = form.text.clone();
    let selected = form.group_id().ok().flatten();

    let errors = match draft_from_form(form) {
        Ok(draft) => match state.post_service().update(post_id, user.id, draft).await {
            Ok(_) => return Ok(found(&post_url(post_id))),
            Err(PostError::NotAuthor) => return Ok(found(&post_url(post_id))),
            Err(e) => match e.field() {
                Some(field) => {
                    let mut errors = FormErrors::new();
                    errors.add(field, e.to_string());
                    errors
                }
                None => return Err(post_error(e)),
            },
        },
        Err(errors) => errors,
    };

    let mut page = post_form_page(&state, Some(user), uri.path().to_string(), selected).await?;
    page.is_edit = true;
    page.text = text;
    page.current_image = post.image;
    page.errors = errors;
    render(&page)
}

pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let post_id = parse_id(&post_id)?;

    let errors = match form.validate() {
        Ok(()) => match state
            .comment_service()
            .add(post_id, user.id, &form.text)
            .await
        {
            Ok(_) => return Ok(found(&post_url(post_id))),
            Err(CommentError::PostNotFound) => {
                return Err(AppError::NotFound(format!("Post {} not found", post_id)))
            }
            Err(CommentError::EmptyText) => {
                let mut errors = FormErrors::new();
                errors.add("text", CommentError::EmptyText.to_string());
                errors
            }
            Err(CommentError::Storage(e)) => return Err(e),
        },
        Err(e) => FormErrors::from(e),
    };

    let detail = load_detail(&state, post_id).await?;
    let mut page = PostDetailPage::new(
        Some(user),
        &detail,
        state.settings.posts.truncate_text_length,
    );
    page.comment_text = form.text;
    page.errors = errors;
    render(&page)
}

/// Posts by the authors the signed-in user follows.
pub async fn follow_index(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let page = state
        .feed_service()
        .page(FeedScope::FollowedBy(user.id), query.number()?)
        .await
        .map_err(feed_error)?;

    render(&FollowPage {
        viewer: Some(user),
        posts: PostItem::list(&page, state.settings.posts.truncate_text_length),
        nav: PageNav::from(&page.window),
    })
}

pub async fn profile_follow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    state
        .follow_service()
        .follow(user.id, &username)
        .await
        .map_err(follow_error)?;
    Ok(found(&profile_url(&username)))
}

pub async fn profile_unfollow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    state
        .follow_service()
        .unfollow(user.id, &username)
        .await
        .map_err(follow_error)?;
    Ok(found(&profile_url(&username)))
}
