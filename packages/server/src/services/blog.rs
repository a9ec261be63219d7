use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::*;

use super::{GalleryError, GalleryService};
use crate::entity::blog_post;

/// A calendar month that has at least one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub count: u64,
}

impl GalleryService {
    pub async fn find_post(&self, id: i32) -> Result<blog_post::Model, GalleryError> {
        blog_post::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(GalleryError::NotFound("Blog post"))
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<blog_post::Model, GalleryError> {
        let post = blog_post::ActiveModel {
            title: Set(title.trim().to_string()),
            content: Set(content.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(post.insert(&self.db).await?)
    }

    pub async fn delete_post(&self, id: i32) -> Result<(), GalleryError> {
        let result = blog_post::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(GalleryError::NotFound("Blog post"));
        }
        Ok(())
    }

    /// Newest posts first, optionally only those created strictly before `before`.
    pub async fn latest_posts(
        &self,
        before: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<blog_post::Model>, GalleryError> {
        let mut query = blog_post::Entity::find()
            .order_by_desc(blog_post::Column::CreatedAt)
            .order_by_desc(blog_post::Column::Id);
        if let Some(before) = before {
            query = query.filter(blog_post::Column::CreatedAt.lt(before));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(query.all(&self.db).await?)
    }

    /// Posts created within a calendar month (UTC), newest first.
    pub async fn posts_in_month(&self, year: i32, month: u32) -> Result<Vec<blog_post::Model>, GalleryError> {
        let (start, end) = month_range(year, month).ok_or_else(|| {
            GalleryError::Validation("Month must be 1-12 and the year in range".into())
        })?;

        Ok(blog_post::Entity::find()
            .filter(blog_post::Column::CreatedAt.gte(start))
            .filter(blog_post::Column::CreatedAt.lt(end))
            .order_by_desc(blog_post::Column::CreatedAt)
            .order_by_desc(blog_post::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Every month that has posts, newest first.
    pub async fn available_months(&self) -> Result<Vec<MonthBucket>, GalleryError> {
        let dates: Vec<DateTime<Utc>> = blog_post::Entity::find()
            .select_only()
            .column(blog_post::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(bucket_by_month(dates))
    }
}

/// Start of the given month and of the month after it.
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

pub fn bucket_by_month(dates: impl IntoIterator<Item = DateTime<Utc>>) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for date in dates {
        *buckets.entry((date.year(), date.month())).or_default() += 1;
    }
    buckets
        .into_iter()
        .rev()
        .map(|((year, month), count)| MonthBucket { year, month, count })
        .collect()
}
