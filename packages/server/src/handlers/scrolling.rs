use axum::extract::State;
use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::AppJson;
use crate::models::scrolling::{ReplaceScrollingImagesRequest, ScrollingImageResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/scrolling-images",
    tag = "Scrolling Images",
    operation_id = "listScrollingImages",
    summary = "List the carousel",
    description = "Carousel entries in display order. Entries whose image was deleted are omitted.",
    responses(
        (status = 200, description = "Carousel entries", body = Vec<ScrollingImageResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_scrolling_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScrollingImageResponse>>, AppError> {
    let entries = state.gallery.list_scrolling_images().await?;
    Ok(Json(entries.into_iter().map(ScrollingImageResponse::from).collect()))
}

#[utoipa::path(
    put,
    path = "/api/v1/scrolling-images",
    tag = "Scrolling Images",
    operation_id = "replaceScrollingImages",
    summary = "Replace the carousel",
    description = "Replaces the whole carousel with the given images, in order. An image may \
        appear more than once. If any ID is unknown nothing changes.",
    request_body = ReplaceScrollingImagesRequest,
    responses(
        (status = 200, description = "New carousel", body = Vec<ScrollingImageResponse>),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "An image was not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn replace_scrolling_images(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReplaceScrollingImagesRequest>,
) -> Result<Json<Vec<ScrollingImageResponse>>, AppError> {
    auth_user.require_admin()?;

    let entries = state
        .gallery
        .replace_scrolling_images(&payload.image_ids)
        .await?;
    Ok(Json(entries.into_iter().map(ScrollingImageResponse::from).collect()))
}
