use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::AppPath;
use crate::models::category::CategoryResponse;
use crate::models::image::{ImageListResponse, ImageResponse};
use crate::services::image::UploadedFile;
use crate::state::AppState;

/// Multipart framing allowance on top of the configured file size.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn image_upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD))
}

#[utoipa::path(
    post,
    path = "/api/v1/images",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores a JPEG under its original filename together with a resized derivative. \
        Multipart fields: `image` (the file) and `category` (text). Filenames are unique.",
    request_body(content_type = "multipart/form-data", description = "`image` file and `category` text"),
    responses(
        (status = 201, description = "Image stored", body = ImageResponse),
        (status = 400, description = "Invalid upload (MISSING_FILE, MISSING_CATEGORY, INVALID_FORMAT, INVALID_FILENAME, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Filename already used (DUPLICATE_FILENAME)", body = ErrorBody),
        (status = 422, description = "File could not be decoded (PROCESSING_FAILED)", body = ErrorBody),
        (status = 500, description = "Storage or database failure (STORAGE_WRITE_FAILED, METADATA_WRITE_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let mut upload: Option<UploadedFile> = None;
    let mut category: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                if bytes.len() as u64 > state.config.gallery.max_upload_size {
                    return Err(AppError::Validation(format!(
                        "Image exceeds the maximum size of {} bytes",
                        state.config.gallery.max_upload_size
                    )));
                }
                upload = Some(UploadedFile {
                    name,
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            Some("category") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read category: {e}")))?;
                category = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let image = state.gallery.ingest_image(upload, category).await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(image))))
}

#[utoipa::path(
    get,
    path = "/api/v1/images",
    tag = "Images",
    operation_id = "listImages",
    summary = "List all images",
    description = "Returns every image, newest first, along with all categories.",
    responses(
        (status = 200, description = "Images and categories", body = ImageListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_images(State(state): State<AppState>) -> Result<Json<ImageListResponse>, AppError> {
    let (images, categories) = tokio::try_join!(
        state.gallery.list_images(),
        state.gallery.list_categories(),
    )?;

    Ok(Json(ImageListResponse {
        images: images.into_iter().map(ImageResponse::from).collect(),
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/images/category/{category}",
    tag = "Images",
    operation_id = "listImagesByCategory",
    summary = "List images of a category",
    description = "Category matching is case-insensitive. Unknown categories yield an empty list.",
    params(("category" = String, Path, description = "Category title")),
    responses(
        (status = 200, description = "Images of the category and all categories", body = ImageListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_images_by_category(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> Result<Json<ImageListResponse>, AppError> {
    let (images, categories) = tokio::try_join!(
        state.gallery.images_by_category(&category),
        state.gallery.list_categories(),
    )?;

    Ok(Json(ImageListResponse {
        images: images.into_iter().map(ImageResponse::from).collect(),
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/images/{id}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Get an image",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image", body = ImageResponse),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ImageResponse>, AppError> {
    let image = state.gallery.get_image(id).await?;
    Ok(Json(image.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/images/{id}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Delete an image",
    description = "Removes both stored objects, then the record. If storage deletion fails \
        the record is kept.",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "The deleted image", body = ImageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage or database failure (STORAGE_DELETE_FAILED, METADATA_DELETE_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ImageResponse>, AppError> {
    auth_user.require_admin()?;

    let image = state.gallery.delete_image(id).await?;
    Ok(Json(image.into()))
}
