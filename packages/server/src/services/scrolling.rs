use std::collections::HashMap;

use futures::future::try_join_all;
use sea_orm::*;
use tracing::{info, instrument};

use super::image::find_image;
use super::{GalleryError, GalleryService};
use crate::entity::{image, scrolling_image};

/// One position of the carousel.
#[derive(Debug, Clone)]
pub struct ScrollingEntry {
    pub order: i32,
    pub image: image::Model,
}

impl GalleryService {
    /// Replace the whole carousel with `ids`, in that order.
    ///
    /// Every id must name an existing image; otherwise nothing changes. An
    /// image may appear more than once.
    #[instrument(skip(self))]
    pub async fn replace_scrolling_images(
        &self,
        ids: &[i32],
    ) -> Result<Vec<ScrollingEntry>, GalleryError> {
        let images = try_join_all(ids.iter().map(|&id| find_image(&self.db, id))).await?;

        let entries = images
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                let order = i32::try_from(i).map_err(|_| {
                    GalleryError::Validation("Too many scrolling images".into())
                })?;
                Ok(ScrollingEntry { order, image })
            })
            .collect::<Result<Vec<_>, GalleryError>>()?;

        let txn = self.db.begin().await?;

        scrolling_image::Entity::delete_many().exec(&txn).await?;

        for entry in &entries {
            scrolling_image::ActiveModel {
                image_id: Set(entry.image.id),
                order: Set(entry.order),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!("Replaced scrolling images with {} entries", entries.len());
        Ok(entries)
    }

    /// The carousel in display order. Entries whose image is gone are skipped.
    pub async fn list_scrolling_images(&self) -> Result<Vec<ScrollingEntry>, GalleryError> {
        let rows = scrolling_image::Entity::find()
            .order_by_asc(scrolling_image::Column::Order)
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.image_id).collect();
        let images: HashMap<i32, image::Model> = image::Entity::find()
            .filter(image::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|img| (img.id, img))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                images.get(&row.image_id).cloned().map(|image| ScrollingEntry {
                    order: row.order,
                    image,
                })
            })
            .collect())
    }
}
