use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: String,

    pub customer_id: String,
    #[sea_orm(belongs_to, from = "customer_id", to = "customer_id")]
    pub customer: HasOne<super::customer::Entity>,

    pub date_of_sale: Date,
    pub shipping_cost: f64,
    pub payment_method: String,
    pub region: String,

    #[sea_orm(has_many)]
    pub items: HasMany<super::order_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
