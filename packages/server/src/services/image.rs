use chrono::Utc;
use common::generate_derivative;
use common::ProcessingError;
use common::storage::{ObjectKey, StorageError};
use sea_orm::*;
use tracing::{Span, field, info, instrument, warn};

use super::{GalleryError, GalleryService};
use crate::entity::image;
use crate::utils::filename::validate_flat_filename;

/// Storage prefix of original uploads.
pub const ORIGINAL_PREFIX: &str = "gallery/images";
/// Storage prefix of compressed derivatives.
pub const DERIVATIVE_PREFIX: &str = "gallery/compressed";

const JPEG_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/pjpeg"];

/// A file received from a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Declared content type of the part, if the client sent one.
    pub content_type: Option<String>,
}

/// Whether an upload is a JPEG, judged by its declared content type or,
/// failing that, by its filename.
pub fn is_jpeg(content_type: Option<&str>, filename: &str) -> bool {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

    match declared {
        Some(mime) => JPEG_MIME_TYPES.contains(&mime.as_str()),
        None => mime_guess::from_path(filename)
            .iter()
            .any(|m| JPEG_MIME_TYPES.contains(&m.essence_str())),
    }
}

pub fn original_key(filename: &str) -> Result<ObjectKey, StorageError> {
    ObjectKey::new(format!("{ORIGINAL_PREFIX}/{filename}"))
}

pub fn derivative_key(filename: &str) -> Result<ObjectKey, StorageError> {
    ObjectKey::new(format!("{DERIVATIVE_PREFIX}/comp_{filename}"))
}

pub(crate) async fn find_image<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<image::Model, GalleryError> {
    image::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(GalleryError::NotFound("Image"))
}

async fn find_image_by_filename<C: ConnectionTrait>(
    db: &C,
    filename: &str,
) -> Result<Option<image::Model>, DbErr> {
    image::Entity::find()
        .filter(image::Column::Filename.eq(filename))
        .one(db)
        .await
}

impl GalleryService {
    /// Validate an upload, store it with its derivative and record it.
    #[instrument(skip(self, upload, category), fields(filename = field::Empty))]
    pub async fn ingest_image(
        &self,
        upload: Option<UploadedFile>,
        category: Option<String>,
    ) -> Result<image::Model, GalleryError> {
        let upload = upload.ok_or(GalleryError::MissingFile)?;
        let category = category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .ok_or(GalleryError::MissingCategory)?;

        if !is_jpeg(upload.content_type.as_deref(), &upload.name) {
            return Err(GalleryError::InvalidFormat);
        }
        let filename = validate_flat_filename(&upload.name)
            .map_err(|e| GalleryError::InvalidFilename(e.message()))?
            .to_string();
        Span::current().record("filename", filename.as_str());

        if find_image_by_filename(&self.db, &filename).await?.is_some() {
            return Err(GalleryError::DuplicateFilename(filename));
        }

        let original_key =
            original_key(&filename).map_err(|e| GalleryError::Validation(e.to_string()))?;
        let derivative_key =
            derivative_key(&filename).map_err(|e| GalleryError::Validation(e.to_string()))?;

        let spec = self.derivative;
        let bytes = upload.bytes;
        let (bytes, derivative) = tokio::task::spawn_blocking(move || {
            let derivative = generate_derivative(&bytes, &spec);
            (bytes, derivative)
        })
        .await
        .map_err(|e| ProcessingError::Aborted(e.to_string()))?;
        let derivative = derivative?;

        let (original, compressed) = tokio::join!(
            self.store.put(&original_key, &bytes),
            self.store.put(&derivative_key, &derivative),
        );
        let (original, compressed) = match (original, compressed) {
            (Ok(original), Ok(compressed)) => (original, compressed),
            (Ok(stored), Err(e)) | (Err(e), Ok(stored)) => {
                warn!("Storage write failed for {}: {}", filename, e);
                if let Err(cleanup) = self.store.delete(&stored.key).await {
                    warn!("Failed to remove orphaned object {}: {}", stored.key, cleanup);
                }
                return Err(GalleryError::StorageWriteFailed(e));
            }
            (Err(e), Err(other)) => {
                warn!("Storage writes failed for {}: {}; {}", filename, e, other);
                return Err(GalleryError::StorageWriteFailed(e));
            }
        };

        let now = Utc::now();
        let record = image::ActiveModel {
            filename: Set(filename.clone()),
            image_url: Set(original.url),
            compressed_image_url: Set(compressed.url),
            image_key: Set(original.key.to_string()),
            compressed_image_key: Set(compressed.key.to_string()),
            category: Set(category),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match record.insert(&self.db).await {
            Ok(model) => {
                info!("Stored image {} as #{}", model.filename, model.id);
                Ok(model)
            }
            // Lost a race against an upload of the same name. Both uploads wrote
            // the same keys, so the winner's record now serves this upload's
            // bytes (last write wins). Removing them would orphan that record.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::debug!("Duplicate filename caught on insert");
                Err(GalleryError::DuplicateFilename(filename))
            }
            Err(source) => {
                warn!("Failed to record image {}: {}", filename, source);
                let compensation = self.remove_objects(&original.key, &compressed.key).await;
                for e in &compensation {
                    warn!("Compensating delete failed: {}", e);
                }
                Err(GalleryError::MetadataWriteFailed {
                    source,
                    compensation,
                })
            }
        }
    }

    /// Delete both stored objects and then the record of an image.
    #[instrument(skip(self))]
    pub async fn delete_image(&self, id: i32) -> Result<image::Model, GalleryError> {
        let record = find_image(&self.db, id).await?;
        self.delete_record(record).await
    }

    /// Delete every image filed under `title`, one at a time.
    ///
    /// Stops at the first failure; images deleted before it stay deleted.
    /// Returns how many images were removed.
    #[instrument(skip(self))]
    pub async fn delete_images_by_category(&self, title: &str) -> Result<u64, GalleryError> {
        let images = self.images_by_category(title).await?;

        let mut deleted = 0;
        for record in images {
            self.delete_record(record).await?;
            deleted += 1;
        }

        if deleted > 0 {
            info!("Deleted {} images from category '{}'", deleted, title);
        }
        Ok(deleted)
    }

    pub async fn get_image(&self, id: i32) -> Result<image::Model, GalleryError> {
        find_image(&self.db, id).await
    }

    /// All images, newest first.
    pub async fn list_images(&self) -> Result<Vec<image::Model>, GalleryError> {
        Ok(image::Entity::find()
            .order_by_desc(image::Column::CreatedAt)
            .order_by_desc(image::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Images of a category, matched case-insensitively, newest first.
    pub async fn images_by_category(&self, category: &str) -> Result<Vec<image::Model>, GalleryError> {
        Ok(image::Entity::find()
            .filter(image::Column::Category.eq(category.trim().to_lowercase()))
            .order_by_desc(image::Column::CreatedAt)
            .order_by_desc(image::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn delete_record(&self, record: image::Model) -> Result<image::Model, GalleryError> {
        let original =
            ObjectKey::new(record.image_key.as_str()).map_err(GalleryError::StorageDeleteFailed)?;
        let compressed = ObjectKey::new(record.compressed_image_key.as_str())
            .map_err(GalleryError::StorageDeleteFailed)?;

        // A missing object counts as deleted, so a retry after a half-failed
        // delete can finish the job.
        let (a, b) = tokio::join!(self.store.delete(&original), self.store.delete(&compressed));
        tolerate_missing(a).map_err(GalleryError::StorageDeleteFailed)?;
        tolerate_missing(b).map_err(GalleryError::StorageDeleteFailed)?;

        image::Entity::delete_by_id(record.id)
            .exec(&self.db)
            .await
            .map_err(GalleryError::MetadataDeleteFailed)?;

        info!("Deleted image {} (#{})", record.filename, record.id);
        Ok(record)
    }

    /// Best-effort removal of both objects of an image; returns the failures.
    async fn remove_objects(&self, original: &ObjectKey, compressed: &ObjectKey) -> Vec<StorageError> {
        let (a, b) = tokio::join!(self.store.delete(original), self.store.delete(compressed));
        [a, b].into_iter().filter_map(Result::err).collect()
    }
}

fn tolerate_missing(result: Result<(), StorageError>) -> Result<(), StorageError> {
    match result {
        Err(StorageError::NotFound(key)) => {
            warn!("Object {} was already gone", key);
            Ok(())
        }
        other => other,
    }
}
