use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::ImageResponse;
use crate::services::category::CategoryView;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    /// Stored trimmed and lowercased.
    #[schema(example = "Landscapes")]
    pub title: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetPreviewRequest {
    #[schema(example = 12)]
    pub image_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "landscapes")]
    pub title: String,
    /// `null` when unset or when the preview image was deleted.
    pub preview: Option<ImageResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryView> for CategoryResponse {
    fn from(view: CategoryView) -> Self {
        Self {
            id: view.category.id,
            title: view.category.title,
            preview: view.preview.map(ImageResponse::from),
            created_at: view.category.created_at,
        }
    }
}
