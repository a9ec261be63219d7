use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use tracing::{info, instrument, warn};

use super::image::find_image;
use super::{GalleryError, GalleryService};
use crate::entity::{image, image_category};

/// A category together with its resolved preview image.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub category: image_category::Model,
    /// `None` when no preview is set or the referenced image no longer exists.
    pub preview: Option<image::Model>,
}

/// Normalise a category title: trimmed and lowercase.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

async fn find_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<image_category::Model, GalleryError> {
    image_category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(GalleryError::NotFound("Category"))
}

impl GalleryService {
    #[instrument(skip(self))]
    pub async fn create_category(&self, title: &str) -> Result<CategoryView, GalleryError> {
        let title = normalize_title(title);
        if title.is_empty() {
            return Err(GalleryError::MissingCategory);
        }

        let existing = image_category::Entity::find()
            .filter(image_category::Column::Title.eq(&title))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(GalleryError::AlreadyExists(format!("Category '{title}'")));
        }

        let new_category = image_category::ActiveModel {
            title: Set(title.clone()),
            preview_image_id: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let category = new_category
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    tracing::debug!("Category race condition: unique constraint caught on insert");
                    GalleryError::AlreadyExists(format!("Category '{title}'"))
                }
                _ => GalleryError::from(e),
            })?;

        info!("Created category '{}'", category.title);
        Ok(CategoryView {
            category,
            preview: None,
        })
    }

    /// Remove a category and every image filed under it.
    ///
    /// The record goes first; if the cascade then fails, the category stays
    /// deleted and the remaining images stay behind.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), GalleryError> {
        let category = find_category(&self.db, id).await?;

        image_category::Entity::delete_by_id(category.id)
            .exec(&self.db)
            .await?;

        if let Err(e) = self.delete_images_by_category(&category.title).await {
            warn!(
                "Category '{}' deleted but its images were only partially removed: {}",
                category.title, e
            );
            return Err(e);
        }

        info!("Deleted category '{}'", category.title);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_preview_image(
        &self,
        category_id: i32,
        image_id: i32,
    ) -> Result<CategoryView, GalleryError> {
        let (category, preview) = tokio::try_join!(
            find_category(&self.db, category_id),
            find_image(&self.db, image_id),
        )?;

        let mut active: image_category::ActiveModel = category.into();
        active.preview_image_id = Set(Some(preview.id));
        let category = active.update(&self.db).await?;

        Ok(CategoryView {
            category,
            preview: Some(preview),
        })
    }

    /// All categories ordered by title, previews resolved in one lookup.
    pub async fn list_categories(&self) -> Result<Vec<CategoryView>, GalleryError> {
        let categories = image_category::Entity::find()
            .order_by_asc(image_category::Column::Title)
            .all(&self.db)
            .await?;

        let preview_ids: Vec<i32> = categories
            .iter()
            .filter_map(|c| c.preview_image_id)
            .collect();

        let previews: HashMap<i32, image::Model> = if preview_ids.is_empty() {
            HashMap::new()
        } else {
            image::Entity::find()
                .filter(image::Column::Id.is_in(preview_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|img| (img.id, img))
                .collect()
        };

        Ok(categories
            .into_iter()
            .map(|category| {
                let preview = category
                    .preview_image_id
                    .and_then(|id| previews.get(&id).cloned());
                CategoryView { category, preview }
            })
            .collect())
    }
}
