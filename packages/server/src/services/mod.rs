pub mod blog;
pub mod category;
pub mod error;
pub mod image;
pub mod scrolling;

use std::sync::Arc;

use common::DerivativeSpec;
use common::storage::ObjectStore;
use sea_orm::DatabaseConnection;

pub use error::{ErrorKind, GalleryError};

/// Gallery and blog workflows over one metadata store and one object store.
#[derive(Clone)]
pub struct GalleryService {
    db: DatabaseConnection,
    store: Arc<dyn ObjectStore>,
    derivative: DerivativeSpec,
}

impl GalleryService {
    pub fn new(db: DatabaseConnection, store: Arc<dyn ObjectStore>, derivative: DerivativeSpec) -> Self {
        Self {
            db,
            store,
            derivative,
        }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}
