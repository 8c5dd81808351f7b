use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Generated; never derived from the source file.
    #[sea_orm(primary_key)]
    pub order_item_id: i32,

    pub order_id: String,
    #[sea_orm(belongs_to, from = "order_id", to = "order_id")]
    pub order: HasOne<super::order::Entity>,

    pub product_id: String,
    #[sea_orm(belongs_to, from = "product_id", to = "product_id")]
    pub product: HasOne<super::product::Entity>,

    pub quantity_sold: i64,
    pub discount: f64,
}

impl ActiveModelBehavior for ActiveModel {}
