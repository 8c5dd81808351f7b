use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, PaginatorTrait, Statement};
use serde_json::Value;
use tempfile::TempDir;

use sales_server::config::{AppConfig, DatabaseConfig, RefreshConfig, ServerConfig};
use sales_server::entity::{customer, order, order_item, product};
use sales_server::state::AppState;

pub mod routes {
    pub const REFRESH: &str = "/api/v1/refresh";
    pub const TOP_OVERALL: &str = "/api/v1/top-products/overall";
    pub const TOP_BY_CATEGORY: &str = "/api/v1/top-products/category";
    pub const TOP_BY_REGION: &str = "/api/v1/top-products/region";

    /// Append the standard report query to a top-products route.
    pub fn with_window(route: &str, n: &str, start_date: &str, end_date: &str) -> String {
        format!("{route}?n={n}&start_date={start_date}&end_date={end_date}")
    }
}

pub const HEADER: &str = "Order ID,Product ID,Customer ID,Product Name,Category,Region,Date of Sale,Quantity Sold,Unit Price,Discount,Shipping Cost,Payment Method,Customer Name,Customer Email,Customer Address";

/// One CSV data line with the given identities and everything else fixed.
pub struct SaleRow<'a> {
    pub order_id: &'a str,
    pub product_id: &'a str,
    pub customer_id: &'a str,
    pub product_name: &'a str,
    pub category: &'a str,
    pub region: &'a str,
    pub date: &'a str,
    pub quantity: u32,
    pub unit_price: &'a str,
}

impl<'a> SaleRow<'a> {
    pub fn new(order_id: &'a str, product_id: &'a str, quantity: u32) -> Self {
        Self {
            order_id,
            product_id,
            customer_id: "C1",
            product_name: "Widget",
            category: "Electronics",
            region: "North America",
            date: "2024-03-15",
            quantity,
            unit_price: "10.00",
        }
    }

    pub fn customer(mut self, customer_id: &'a str) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn product(mut self, name: &'a str, category: &'a str, unit_price: &'a str) -> Self {
        self.product_name = name;
        self.category = category;
        self.unit_price = unit_price;
        self
    }

    pub fn region(mut self, region: &'a str) -> Self {
        self.region = region;
        self
    }

    pub fn date(mut self, date: &'a str) -> Self {
        self.date = date;
        self
    }

    pub fn line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},0.1,5.00,Credit Card,Customer {},{}@example.com,\"1 Main St, Springfield\"",
            self.order_id,
            self.product_id,
            self.customer_id,
            self.product_name,
            self.category,
            self.region,
            self.date,
            self.quantity,
            self.unit_price,
            self.customer_id,
            self.customer_id.to_lowercase(),
        )
    }
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// Row counts of every table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub customers: u64,
    pub products: u64,
    pub orders: u64,
    pub order_items: u64,
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub csv_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("sales.db");
        let csv_path = dir.path().join("sales_data.csv");

        let database = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 5,
            min_connections: 1,
        };
        let db = sales_server::database::init_db(&database)
            .await
            .expect("Failed to initialize database");
        sales_server::database::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database,
            refresh: RefreshConfig {
                csv_path: csv_path.display().to_string(),
                enabled: false,
                ..Default::default()
            },
        };

        let state = AppState {
            config: Arc::new(app_config),
            db: db.clone(),
        };
        let app = sales_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            csv_path,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Replace the export with a header line followed by `rows`.
    pub fn write_csv(&self, rows: &[String]) {
        let mut contents = String::from(HEADER);
        for row in rows {
            contents.push('\n');
            contents.push_str(row);
        }
        contents.push('\n');
        std::fs::write(&self.csv_path, contents).expect("Failed to write CSV");
    }

    /// Write `rows` and trigger a refresh, asserting it succeeds.
    pub async fn load(&self, rows: &[SaleRow<'_>]) -> TestResponse {
        let lines: Vec<String> = rows.iter().map(SaleRow::line).collect();
        self.write_csv(&lines);
        let res = self.post(routes::REFRESH).await;
        assert_eq!(res.status, 200, "Refresh failed: {}", res.text);
        res
    }

    pub async fn counts(&self) -> TableCounts {
        TableCounts {
            customers: customer::Entity::find().count(&self.db).await.unwrap(),
            products: product::Entity::find().count(&self.db).await.unwrap(),
            orders: order::Entity::find().count(&self.db).await.unwrap(),
            order_items: order_item::Entity::find().count(&self.db).await.unwrap(),
        }
    }

    /// Abort any order-item insert for `product_id`, simulating a storage failure
    /// partway through a refresh.
    pub async fn fail_inserts_for_product(&self, product_id: &str) {
        self.db
            .execute_raw(Statement::from_string(
                DbBackend::Sqlite,
                format!(
                    "CREATE TRIGGER fail_item_insert BEFORE INSERT ON order_items \
                     WHEN NEW.product_id = '{product_id}' \
                     BEGIN SELECT RAISE(ABORT, 'injected failure'); END"
                ),
            ))
            .await
            .expect("Failed to create trigger");
    }
}

/// Product ids of a ranked list, in order.
pub fn product_ids(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|p| p["product_id"].as_str().unwrap().to_string())
        .collect()
}
