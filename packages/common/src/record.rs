use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::validate::{
    ValidationError, parse_date, parse_discount, parse_price, parse_quantity,
};

/// Minimum number of columns a data row must carry; extra columns are ignored.
pub const MIN_FIELDS: usize = 15;

mod column {
    pub const ORDER_ID: usize = 0;
    pub const PRODUCT_ID: usize = 1;
    pub const CUSTOMER_ID: usize = 2;
    pub const PRODUCT_NAME: usize = 3;
    pub const CATEGORY: usize = 4;
    pub const REGION: usize = 5;
    pub const DATE_OF_SALE: usize = 6;
    pub const QUANTITY_SOLD: usize = 7;
    pub const UNIT_PRICE: usize = 8;
    pub const DISCOUNT: usize = 9;
    pub const SHIPPING_COST: usize = 10;
    pub const PAYMENT_METHOD: usize = 11;
    pub const CUSTOMER_NAME: usize = 12;
    pub const CUSTOMER_EMAIL: usize = 13;
    pub const CUSTOMER_ADDRESS: usize = 14;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub date_of_sale: NaiveDate,
    pub shipping_cost: f64,
    pub payment_method: String,
    pub region: String,
}

/// A line item. Linked to its order and product by identity, never by position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemRecord {
    pub order_id: String,
    pub product_id: String,
    pub quantity_sold: i64,
    pub discount: f64,
}

/// Entities extracted from one valid source row.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleEntities {
    pub product: ProductRecord,
    pub customer: CustomerRecord,
    pub order: OrderRecord,
    pub item: OrderItemRecord,
}

/// Why a single row was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("insufficient fields: expected at least 15, found {0}")]
    TooFewFields(usize),

    #[error("invalid {column}: {source}")]
    InvalidField {
        column: &'static str,
        #[source]
        source: ValidationError,
    },
}

/// Everything a refresh will try to apply, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesBatch {
    pub products: Vec<ProductRecord>,
    pub customers: Vec<CustomerRecord>,
    pub orders: Vec<OrderRecord>,
    pub order_items: Vec<OrderItemRecord>,
    /// Data rows seen, header excluded.
    pub rows_read: usize,
    pub rows_skipped: usize,
}

impl SalesBatch {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn push(&mut self, entities: SaleEntities) {
        self.products.push(entities.product);
        self.customers.push(entities.customer);
        self.orders.push(entities.order);
        self.order_items.push(entities.item);
    }
}

/// Turn raw rows into a [`SalesBatch`].
///
/// Row 0 is the header and is always skipped. Malformed rows are logged with their
/// 0-based index and dropped; they never abort the batch.
pub fn transform_rows(rows: &[StringRecord]) -> SalesBatch {
    let mut batch = SalesBatch::default();

    for (index, record) in rows.iter().enumerate().skip(1) {
        batch.rows_read += 1;
        match transform_row(record) {
            Ok(entities) => batch.push(entities),
            Err(reason) => {
                warn!(row = index, error = %reason, "Skipping record");
                batch.rows_skipped += 1;
            }
        }
    }

    batch
}

/// Map one data row onto its four entities.
pub fn transform_row(record: &StringRecord) -> Result<SaleEntities, RowRejection> {
    if record.len() < MIN_FIELDS {
        return Err(RowRejection::TooFewFields(record.len()));
    }

    let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or_default();
    let checked = |column: &'static str| {
        move |source: ValidationError| RowRejection::InvalidField { column, source }
    };

    let unit_price = parse_price(field(column::UNIT_PRICE)).map_err(checked("unit price"))?;
    let discount = parse_discount(field(column::DISCOUNT)).map_err(checked("discount"))?;
    let shipping_cost =
        parse_price(field(column::SHIPPING_COST)).map_err(checked("shipping cost"))?;
    let quantity_sold =
        parse_quantity(field(column::QUANTITY_SOLD)).map_err(checked("quantity sold"))?;
    let date_of_sale = parse_date(field(column::DATE_OF_SALE)).map_err(checked("date of sale"))?;

    let order_id = field(column::ORDER_ID).to_string();
    let product_id = field(column::PRODUCT_ID).to_string();
    let customer_id = field(column::CUSTOMER_ID).to_string();

    Ok(SaleEntities {
        product: ProductRecord {
            product_id: product_id.clone(),
            product_name: field(column::PRODUCT_NAME).to_string(),
            category: field(column::CATEGORY).to_string(),
            unit_price,
        },
        customer: CustomerRecord {
            customer_id: customer_id.clone(),
            customer_name: field(column::CUSTOMER_NAME).to_string(),
            customer_email: field(column::CUSTOMER_EMAIL).to_string(),
            customer_address: field(column::CUSTOMER_ADDRESS).to_string(),
        },
        order: OrderRecord {
            order_id: order_id.clone(),
            customer_id,
            date_of_sale,
            shipping_cost,
            payment_method: field(column::PAYMENT_METHOD).to_string(),
            region: field(column::REGION).to_string(),
        },
        item: OrderItemRecord {
            order_id,
            product_id,
            quantity_sold,
            discount,
        },
    })
}
