use chrono::{DateTime, Utc};
use serde::Serialize;

use super::category::CategoryResponse;
use crate::entity::image;

/// A stored gallery image.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "sunset.jpg")]
    pub filename: String,
    /// URL of the original upload.
    #[schema(example = "https://cdn.example.com/gallery/images/sunset.jpg")]
    pub image_url: String,
    /// URL of the resized JPEG derivative.
    #[schema(example = "https://cdn.example.com/gallery/compressed/comp_sunset.jpg")]
    pub compressed_image_url: String,
    #[schema(example = "landscapes")]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<image::Model> for ImageResponse {
    fn from(m: image::Model) -> Self {
        Self {
            id: m.id,
            filename: m.filename,
            image_url: m.image_url,
            compressed_image_url: m.compressed_image_url,
            category: m.category,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Images together with every category, for gallery pages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageListResponse {
    pub images: Vec<ImageResponse>,
    pub categories: Vec<CategoryResponse>,
}
