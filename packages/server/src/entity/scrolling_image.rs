use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scrolling_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub image_id: i32,

    #[sea_orm(column_name = "position")]
    pub order: i32,
}

impl ActiveModelBehavior for ActiveModel {}
