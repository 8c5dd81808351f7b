use serde::Deserialize;

/// Refresh pipeline configuration, shared by the HTTP trigger and the scheduler.
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    /// Path of the sales CSV export. Default: "data/sales_data.csv".
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    /// Whether the periodic refresh runs at all. Default: true.
    #[serde(default = "default_refresh_enabled")]
    pub enabled: bool,
    /// Seconds between scheduled refreshes. Default: 86400 (daily).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Run one refresh immediately on startup instead of waiting a full period.
    /// Default: false.
    #[serde(default)]
    pub run_on_startup: bool,
}

fn default_csv_path() -> String {
    "data/sales_data.csv".into()
}
fn default_refresh_enabled() -> bool {
    true
}
fn default_interval_secs() -> u64 {
    86_400
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            enabled: default_refresh_enabled(),
            interval_secs: default_interval_secs(),
            run_on_startup: false,
        }
    }
}
