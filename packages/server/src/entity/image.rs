use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub filename: String,
    #[sea_orm(unique)]
    pub image_url: String,
    #[sea_orm(unique)]
    pub compressed_image_url: String,

    // Storage keys the URLs above were produced from.
    pub image_key: String,
    pub compressed_image_key: String,

    /// Lowercase category title; not a foreign key.
    pub category: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
