use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::{AppJson, AppPath, AppQuery};
use crate::models::blog::{
    CreatePostRequest, MonthResponse, PostListQuery, PostListResponse, PostResponse,
    validate_create_post, validate_post_list_query,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/blog/posts",
    tag = "Blog",
    operation_id = "listPosts",
    summary = "List the latest posts",
    description = "Posts newest first, optionally only those before `before` and at most `limit` \
        of them. Always includes every month that has posts.",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts and available months", body = PostListResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_posts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PostListQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    validate_post_list_query(&query)?;

    let (posts, months) = tokio::try_join!(
        state.gallery.latest_posts(query.before, query.limit),
        state.gallery.available_months(),
    )?;

    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        available_months: months.into_iter().map(MonthResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/posts/{year}/{month}",
    tag = "Blog",
    operation_id = "listPostsByMonth",
    summary = "List posts of a month",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12"),
    ),
    responses(
        (status = 200, description = "Posts of the month and available months", body = PostListResponse),
        (status = 400, description = "Invalid month (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_posts_by_month(
    State(state): State<AppState>,
    AppPath((year, month)): AppPath<(i32, u32)>,
) -> Result<Json<PostListResponse>, AppError> {
    let (posts, months) = tokio::try_join!(
        state.gallery.posts_in_month(year, month),
        state.gallery.available_months(),
    )?;

    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        available_months: months.into_iter().map(MonthResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/posts/{id}",
    tag = "Blog",
    operation_id = "getPost",
    summary = "Get a post",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.gallery.find_post(id).await?;
    Ok(Json(post.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/blog/posts",
    tag = "Blog",
    operation_id = "createPost",
    summary = "Create a post",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_post(&payload)?;

    let post = state.gallery.create_post(&payload.title, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/blog/posts/{id}",
    tag = "Blog",
    operation_id = "deletePost",
    summary = "Delete a post",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin()?;

    state.gallery.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
