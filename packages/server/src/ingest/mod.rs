mod loader;
mod source;

pub use loader::{LoadSummary, load_batch};
pub use source::read_rows;

use std::path::Path;
use std::time::Instant;

use sales_common::transform_rows;
use sea_orm::TransactionTrait;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::SalesError;

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct RefreshSummary {
    /// Data rows in the source file, header excluded.
    #[schema(example = 1000)]
    pub rows_read: usize,
    /// Rows dropped by field validation.
    #[schema(example = 3)]
    pub rows_skipped: usize,
    pub loaded: LoadSummary,
}

/// Re-read the sales export and apply it to storage in one transaction.
///
/// Reference entities are first-or-create; orders and items are always inserted,
/// so refreshing an unchanged file fails on the order primary key and leaves the
/// store as it was.
#[instrument(skip(db), fields(path = %csv_path.display()))]
pub async fn refresh<C>(db: &C, csv_path: &Path) -> Result<RefreshSummary, SalesError>
where
    C: TransactionTrait,
{
    let started = Instant::now();

    let rows = read_rows(csv_path).await?;
    let batch = transform_rows(&rows);
    let loaded = load_batch(db, &batch).await?;

    let summary = RefreshSummary {
        rows_read: batch.rows_read,
        rows_skipped: batch.rows_skipped,
        loaded,
    };

    info!(
        rows_read = summary.rows_read,
        rows_skipped = summary.rows_skipped,
        customers_inserted = loaded.customers_inserted,
        products_inserted = loaded.products_inserted,
        orders_inserted = loaded.orders_inserted,
        order_items_inserted = loaded.order_items_inserted,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Refresh committed"
    );

    Ok(summary)
}
