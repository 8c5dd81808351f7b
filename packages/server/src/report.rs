//! Top-N product rankings over a date window.
//!
//! Quantity sold is `SUM(order_items.quantity_sold)` over
//! `order_items ⋈ orders ⋈ products`, restricted to orders whose `date_of_sale`
//! lies in the inclusive window. Ties on quantity are broken by product id
//! ascending so results are reproducible across storage backends.

use std::collections::BTreeMap;

use sales_common::ReportWindow;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use serde::Serialize;
use tracing::instrument;

use crate::entity::{order, order_item, product};

/// A ranked product with its aggregated quantity for the window.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct TopProduct {
    #[schema(example = "P123")]
    pub product_id: String,
    #[schema(example = "UltraBoost Running Shoes")]
    pub product_name: String,
    #[schema(example = "Shoes")]
    pub category: String,
    #[schema(example = 180.0)]
    pub unit_price: f64,
    #[schema(example = 42)]
    pub quantity_sold: i64,
}

/// One `(group, product)` aggregate, as returned by the grouped queries.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct GroupedSales {
    pub group_key: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity_sold: i64,
}

impl GroupedSales {
    fn into_parts(self) -> (String, TopProduct) {
        (
            self.group_key,
            TopProduct {
                product_id: self.product_id,
                product_name: self.product_name,
                category: self.category,
                unit_price: self.unit_price,
                quantity_sold: self.quantity_sold,
            },
        )
    }
}

/// Read-only ranking queries.
pub struct ReportService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ReportService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Global top-N by quantity sold.
    #[instrument(skip(self), err)]
    pub async fn top_products_overall(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<TopProduct>, DbErr> {
        sales_in_window(window)
            .order_by_desc(order_item::Column::QuantitySold.sum())
            .order_by_asc(product::Column::ProductId)
            .limit(Some(window.limit))
            .into_model::<TopProduct>()
            .all(self.conn)
            .await
    }

    /// Top-N within each product category.
    #[instrument(skip(self), err)]
    pub async fn top_products_by_category(
        &self,
        window: &ReportWindow,
    ) -> Result<BTreeMap<String, Vec<TopProduct>>, DbErr> {
        let rows = sales_in_window(window)
            .column_as(product::Column::Category, "group_key")
            .group_by(product::Column::Category)
            .order_by_asc(product::Column::Category)
            .order_by_desc(order_item::Column::QuantitySold.sum())
            .order_by_asc(product::Column::ProductId)
            .into_model::<GroupedSales>()
            .all(self.conn)
            .await?;

        Ok(rank_within_groups(rows, window.limit))
    }

    /// Top-N within each order region.
    #[instrument(skip(self), err)]
    pub async fn top_products_by_region(
        &self,
        window: &ReportWindow,
    ) -> Result<BTreeMap<String, Vec<TopProduct>>, DbErr> {
        let rows = sales_in_window(window)
            .column_as(order::Column::Region, "group_key")
            .group_by(order::Column::Region)
            .order_by_asc(order::Column::Region)
            .order_by_desc(order_item::Column::QuantitySold.sum())
            .order_by_asc(product::Column::ProductId)
            .into_model::<GroupedSales>()
            .all(self.conn)
            .await?;

        Ok(rank_within_groups(rows, window.limit))
    }
}

/// Per-product totals for the window, grouped by the product columns.
///
/// Callers add their own grouping key and ordering on top.
fn sales_in_window(window: &ReportWindow) -> Select<order_item::Entity> {
    order_item::Entity::find()
        .select_only()
        .inner_join(order::Entity)
        .inner_join(product::Entity)
        .column(product::Column::ProductId)
        .column(product::Column::ProductName)
        .column(product::Column::Category)
        .column(product::Column::UnitPrice)
        .column_as(order_item::Column::QuantitySold.sum(), "quantity_sold")
        .filter(order::Column::DateOfSale.between(window.start_date, window.end_date))
        .group_by(product::Column::ProductId)
        .group_by(product::Column::ProductName)
        .group_by(product::Column::Category)
        .group_by(product::Column::UnitPrice)
}

/// Truncate each group to its first `limit` rows in a single pass.
///
/// `rows` must already be sorted by group, then by quantity descending; the pass
/// keeps that order and never re-sorts.
pub fn rank_within_groups<I>(rows: I, limit: u64) -> BTreeMap<String, Vec<TopProduct>>
where
    I: IntoIterator<Item = GroupedSales>,
{
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut groups: BTreeMap<String, Vec<TopProduct>> = BTreeMap::new();

    for row in rows {
        let (key, product) = row.into_parts();
        let ranked = groups.entry(key).or_default();
        if ranked.len() < limit {
            ranked.push(product);
        }
    }

    groups
}
