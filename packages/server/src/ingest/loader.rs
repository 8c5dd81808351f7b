use std::collections::HashMap;

use sales_common::SalesBatch;
use sales_common::record::{CustomerRecord, OrderItemRecord, OrderRecord, ProductRecord};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set, TransactionSession, TransactionTrait};
use serde::Serialize;
use tracing::{error, warn};

use crate::entity::{customer, order, order_item, product};

/// Rows written by one successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct LoadSummary {
    /// Customers created; existing identities are left untouched.
    pub customers_inserted: u64,
    /// Products created; existing identities are left untouched.
    pub products_inserted: u64,
    pub orders_inserted: u64,
    pub order_items_inserted: u64,
}

/// Apply a batch atomically.
///
/// Either every row of the batch becomes visible or none does. The transaction is
/// rolled back explicitly on failure; any other early exit drops it uncommitted,
/// which rolls it back as well.
pub async fn load_batch<C>(db: &C, batch: &SalesBatch) -> Result<LoadSummary, DbErr>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    match apply_batch(&txn, batch).await {
        Ok(summary) => {
            txn.commit().await?;
            Ok(summary)
        }
        Err(e) => {
            error!(error = %e, "Load failed, rolling back");
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

async fn apply_batch<C: ConnectionTrait>(
    conn: &C,
    batch: &SalesBatch,
) -> Result<LoadSummary, DbErr> {
    let mut summary = LoadSummary::default();

    for record in &batch.customers {
        if insert_customer_if_absent(conn, record).await? {
            summary.customers_inserted += 1;
        }
    }

    for record in &batch.products {
        if insert_product_if_absent(conn, record).await? {
            summary.products_inserted += 1;
        }
    }

    let mut items_by_order: HashMap<&str, Vec<&OrderItemRecord>> = HashMap::new();
    for item in &batch.order_items {
        items_by_order
            .entry(item.order_id.as_str())
            .or_default()
            .push(item);
    }

    // A repeated order identity fails on the primary key and aborts the batch.
    for record in &batch.orders {
        insert_order(conn, record).await?;
        summary.orders_inserted += 1;

        for item in items_by_order.get(record.order_id.as_str()).into_iter().flatten() {
            insert_order_item(conn, item).await?;
            summary.order_items_inserted += 1;
        }
    }

    Ok(summary)
}

/// First-or-create keyed by customer identity. Returns whether a row was created.
async fn insert_customer_if_absent<C: ConnectionTrait>(
    conn: &C,
    record: &CustomerRecord,
) -> Result<bool, DbErr> {
    let model = customer::ActiveModel {
        customer_id: Set(record.customer_id.clone()),
        customer_name: Set(record.customer_name.clone()),
        customer_email: Set(record.customer_email.clone()),
        customer_address: Set(record.customer_address.clone()),
    };

    let result = customer::Entity::insert(model)
        .on_conflict(
            OnConflict::column(customer::Column::CustomerId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await;

    match result {
        Ok(rows) => Ok(rows > 0),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e),
    }
}

/// First-or-create keyed by product identity. Returns whether a row was created.
async fn insert_product_if_absent<C: ConnectionTrait>(
    conn: &C,
    record: &ProductRecord,
) -> Result<bool, DbErr> {
    let model = product::ActiveModel {
        product_id: Set(record.product_id.clone()),
        product_name: Set(record.product_name.clone()),
        category: Set(record.category.clone()),
        unit_price: Set(record.unit_price),
    };

    let result = product::Entity::insert(model)
        .on_conflict(
            OnConflict::column(product::Column::ProductId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await;

    match result {
        Ok(rows) => Ok(rows > 0),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Plain insert; an existing order identity is a constraint violation.
async fn insert_order<C: ConnectionTrait>(conn: &C, record: &OrderRecord) -> Result<(), DbErr> {
    let model = order::ActiveModel {
        order_id: Set(record.order_id.clone()),
        customer_id: Set(record.customer_id.clone()),
        date_of_sale: Set(record.date_of_sale),
        shipping_cost: Set(record.shipping_cost),
        payment_method: Set(record.payment_method.clone()),
        region: Set(record.region.clone()),
    };

    order::Entity::insert(model)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn insert_order_item<C: ConnectionTrait>(
    conn: &C,
    record: &OrderItemRecord,
) -> Result<(), DbErr> {
    let model = order_item::ActiveModel {
        order_id: Set(record.order_id.clone()),
        product_id: Set(record.product_id.clone()),
        quantity_sold: Set(record.quantity_sold),
        discount: Set(record.discount),
        ..Default::default()
    };

    order_item::Entity::insert(model)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
