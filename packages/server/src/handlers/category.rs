use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::{AppJson, AppPath};
use crate::models::category::{CategoryResponse, CreateCategoryRequest, SetPreviewRequest};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List categories",
    description = "All categories ordered by title, each with its preview image resolved.",
    responses(
        (status = 200, description = "Categories", body = Vec<CategoryResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = state.gallery.list_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Empty title (MISSING_CATEGORY, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Title already used (ALREADY_EXISTS)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let category = state.gallery.create_category(&payload.title).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category and its images",
    description = "Deletes the category, then every image filed under it. A failure part-way \
        leaves the category deleted and the remaining images in place.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category and its images deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Cascade failed (STORAGE_DELETE_FAILED, METADATA_DELETE_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin()?;

    state.gallery.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}/preview",
    tag = "Categories",
    operation_id = "setCategoryPreview",
    summary = "Set the preview image of a category",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = SetPreviewRequest,
    responses(
        (status = 200, description = "Updated category", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category or image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(image_id = payload.image_id))]
pub async fn set_preview_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<SetPreviewRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    auth_user.require_admin()?;

    let category = state.gallery.set_preview_image(id, payload.image_id).await?;
    Ok(Json(category.into()))
}
