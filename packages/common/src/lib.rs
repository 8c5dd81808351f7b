pub mod config;
pub mod params;
pub mod record;
pub mod validate;

pub use config::RefreshConfig;
pub use params::{ReportWindow, validate_report_params};
pub use record::{SalesBatch, transform_rows};
pub use validate::ValidationError;
