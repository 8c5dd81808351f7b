use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::report::TopProductsQuery;
use crate::report::{ReportService, TopProduct};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/overall",
    tag = "Top Products",
    operation_id = "topProductsOverall",
    summary = "Top N products overall",
    description = "Ranks products by total quantity sold on orders dated within [start_date, end_date]. Ties are broken by product ID ascending.",
    params(TopProductsQuery),
    responses(
        (status = 200, description = "Products, highest quantity first", body = Vec<TopProduct>),
        (status = 400, description = "Invalid n, start_date or end_date (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn top_products_overall(
    State(state): State<AppState>,
    Query(query): Query<TopProductsQuery>,
) -> Result<Json<Vec<TopProduct>>, AppError> {
    let window = query.window()?;
    let products = ReportService::new(&state.db)
        .top_products_overall(&window)
        .await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/category",
    tag = "Top Products",
    operation_id = "topProductsByCategory",
    summary = "Top N products per category",
    description = "Ranks products within each category independently; every category lists at most n products.",
    params(TopProductsQuery),
    responses(
        (status = 200, description = "Category name to ranked products", body = BTreeMap<String, Vec<TopProduct>>),
        (status = 400, description = "Invalid n, start_date or end_date (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn top_products_by_category(
    State(state): State<AppState>,
    Query(query): Query<TopProductsQuery>,
) -> Result<Json<BTreeMap<String, Vec<TopProduct>>>, AppError> {
    let window = query.window()?;
    let groups = ReportService::new(&state.db)
        .top_products_by_category(&window)
        .await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/region",
    tag = "Top Products",
    operation_id = "topProductsByRegion",
    summary = "Top N products per region",
    description = "Ranks products within each order region independently; every region lists at most n products.",
    params(TopProductsQuery),
    responses(
        (status = 200, description = "Region name to ranked products", body = BTreeMap<String, Vec<TopProduct>>),
        (status = 400, description = "Invalid n, start_date or end_date (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn top_products_by_region(
    State(state): State<AppState>,
    Query(query): Query<TopProductsQuery>,
) -> Result<Json<BTreeMap<String, Vec<TopProduct>>>, AppError> {
    let window = query.window()?;
    let groups = ReportService::new(&state.db)
        .top_products_by_region(&window)
        .await?;
    Ok(Json(groups))
}
