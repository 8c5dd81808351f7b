use serde::Serialize;

use crate::ingest::RefreshSummary;

#[derive(Serialize, utoipa::ToSchema)]
pub struct RefreshResponse {
    #[schema(example = "Data refreshed successfully.")]
    pub message: String,
    pub summary: RefreshSummary,
}
