use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::blog_post;
use crate::error::AppError;
use crate::services::blog::MonthBucket;

/// Hard cap on `limit` for post listings.
pub const MAX_POSTS_PER_PAGE: u64 = 100;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Autumn in Lofoten")]
    pub title: String,
    /// Post body in Markdown.
    pub content: String,
}

pub fn validate_create_post(payload: &CreatePostRequest) -> Result<(), AppError> {
    let title = payload.title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation("Title must be 1-256 characters".into()));
    }
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    Ok(())
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    /// Only posts created strictly before this instant (RFC 3339).
    pub before: Option<DateTime<Utc>>,
    /// Maximum number of posts (1-100). All posts when omitted.
    pub limit: Option<u64>,
}

pub fn validate_post_list_query(query: &PostListQuery) -> Result<(), AppError> {
    if let Some(limit) = query.limit
        && (limit == 0 || limit > MAX_POSTS_PER_PAGE)
    {
        return Err(AppError::Validation(format!(
            "limit must be 1-{MAX_POSTS_PER_PAGE}"
        )));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Autumn in Lofoten")]
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<blog_post::Model> for PostResponse {
    fn from(m: blog_post::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

/// A month that has posts.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MonthResponse {
    #[schema(example = 2024)]
    pub year: i32,
    /// 1-12.
    #[schema(example = 10)]
    pub month: u32,
    #[schema(example = 3)]
    pub count: u64,
}

impl From<MonthBucket> for MonthResponse {
    fn from(b: MonthBucket) -> Self {
        Self {
            year: b.year,
            month: b.month,
            count: b.count,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    /// Every month with at least one post, newest first.
    pub available_months: Vec<MonthResponse>,
}
