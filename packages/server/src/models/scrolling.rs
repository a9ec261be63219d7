use serde::{Deserialize, Serialize};

use super::image::ImageResponse;
use crate::services::scrolling::ScrollingEntry;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReplaceScrollingImagesRequest {
    /// Image IDs in display order. Replaces the whole carousel.
    #[schema(example = json!([4, 1, 9]))]
    pub image_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScrollingImageResponse {
    #[schema(example = 0)]
    pub order: i32,
    pub image: ImageResponse,
}

impl From<ScrollingEntry> for ScrollingImageResponse {
    fn from(entry: ScrollingEntry) -> Self {
        Self {
            order: entry.order,
            image: entry.image.into(),
        }
    }
}
