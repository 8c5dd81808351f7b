use std::path::PathBuf;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::config::RefreshConfig;
use crate::ingest;

/// Run the periodic refresh as a background task.
///
/// Never returns. A failed cycle is logged and the next one runs on schedule;
/// there is no retry in between.
pub async fn run_refresh_scheduler(db: DatabaseConnection, config: RefreshConfig) {
    let period = Duration::from_secs(config.interval_secs.max(1));
    let csv_path = PathBuf::from(&config.csv_path);

    info!(
        interval_secs = period.as_secs(),
        run_on_startup = config.run_on_startup,
        csv_path = %csv_path.display(),
        "Starting refresh scheduler"
    );

    let first_tick = if config.run_on_startup {
        Instant::now()
    } else {
        Instant::now() + period
    };
    let mut interval = tokio::time::interval_at(first_tick, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match ingest::refresh(&db, &csv_path).await {
            Ok(summary) => info!(
                orders_inserted = summary.loaded.orders_inserted,
                rows_skipped = summary.rows_skipped,
                "Scheduled refresh succeeded"
            ),
            Err(e) => error!(error = %e, kind = ?e.kind(), "Scheduled refresh failed"),
        }
    }
}
