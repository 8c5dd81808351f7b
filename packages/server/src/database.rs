use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::{order, order_item};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("sales_server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Ensure the secondary indexes used by the refresh joins and the date-window
/// filter exist.
///
/// Schema sync only covers primary and foreign keys, so these are created by hand.
/// A failure is logged and skipped; queries stay correct without the indexes.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes: [(&str, IndexCreateStatement); 4] = [
        (
            "idx_orders_customer_id",
            Index::create()
                .if_not_exists()
                .name("idx_orders_customer_id")
                .table(order::Entity)
                .col(order::Column::CustomerId)
                .to_owned(),
        ),
        (
            "idx_orders_date_of_sale",
            Index::create()
                .if_not_exists()
                .name("idx_orders_date_of_sale")
                .table(order::Entity)
                .col(order::Column::DateOfSale)
                .to_owned(),
        ),
        (
            "idx_order_items_order_id",
            Index::create()
                .if_not_exists()
                .name("idx_order_items_order_id")
                .table(order_item::Entity)
                .col(order_item::Column::OrderId)
                .to_owned(),
        ),
        (
            "idx_order_items_product_id",
            Index::create()
                .if_not_exists()
                .name("idx_order_items_product_id")
                .table(order_item::Entity)
                .col(order_item::Column::ProductId)
                .to_owned(),
        ),
    ];

    let backend = db.get_database_backend();
    for (name, stmt) in indexes {
        match db.execute_raw(backend.build(&stmt)).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
