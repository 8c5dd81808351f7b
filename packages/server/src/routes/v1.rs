use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::refresh::refresh))
        .nest("/top-products", top_product_routes())
}

fn top_product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::report::top_products_overall))
        .routes(routes!(handlers::report::top_products_by_category))
        .routes(routes!(handlers::report::top_products_by_region))
}
