use common::ProcessingError;
use common::storage::StorageError;
use sea_orm::DbErr;
use thiserror::Error;

/// Coarse failure class of a [`GalleryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    Storage,
    Database,
    Processing,
}

/// Failures of the gallery workflows.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("No image file was provided")]
    MissingFile,
    #[error("No category was provided")]
    MissingCategory,
    #[error("Only JPEG images are accepted")]
    InvalidFormat,
    #[error("{0}")]
    InvalidFilename(&'static str),
    #[error("An image named '{0}' already exists")]
    DuplicateFilename(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Failed to write image to storage: {0}")]
    StorageWriteFailed(#[source] StorageError),
    #[error("Failed to delete image from storage: {0}")]
    StorageDeleteFailed(#[source] StorageError),
    /// Saving the record failed after both objects were stored.
    ///
    /// `compensation` holds the errors of the cleanup deletes, if any failed.
    #[error("Failed to record image metadata: {source}")]
    MetadataWriteFailed {
        source: DbErr,
        compensation: Vec<StorageError>,
    },
    #[error("Failed to delete image metadata: {0}")]
    MetadataDeleteFailed(#[source] DbErr),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl GalleryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFile
            | Self::MissingCategory
            | Self::InvalidFormat
            | Self::InvalidFilename(_)
            | Self::DuplicateFilename(_)
            | Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::StorageWriteFailed(_) | Self::StorageDeleteFailed(_) => ErrorKind::Storage,
            Self::MetadataWriteFailed { .. } | Self::MetadataDeleteFailed(_) | Self::Database(_) => {
                ErrorKind::Database
            }
            Self::Processing(_) => ErrorKind::Processing,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "MISSING_FILE",
            Self::MissingCategory => "MISSING_CATEGORY",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidFilename(_) => "INVALID_FILENAME",
            Self::DuplicateFilename(_) => "DUPLICATE_FILENAME",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::StorageWriteFailed(_) => "STORAGE_WRITE_FAILED",
            Self::StorageDeleteFailed(_) => "STORAGE_DELETE_FAILED",
            Self::MetadataWriteFailed { .. } => "METADATA_WRITE_FAILED",
            Self::MetadataDeleteFailed(_) => "METADATA_DELETE_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Processing(_) => "PROCESSING_FAILED",
        }
    }
}
