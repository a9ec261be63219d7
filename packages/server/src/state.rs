use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::services::GalleryService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub gallery: GalleryService,
}
