pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod report;
pub mod routes;
pub mod scheduler;
pub mod state;

use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sales Analytics API",
        version = "1.0.0",
        description = "Ingests the sales CSV export and ranks top-selling products"
    ),
    tags(
        (name = "Refresh", description = "Reloading the sales export into storage"),
        (name = "Top Products", description = "Top-N product rankings over a date window"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    router
        .with_state(state)
        .merge(Scalar::with_url("/scalar", api))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
