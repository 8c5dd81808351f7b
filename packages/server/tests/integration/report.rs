use crate::common::{SaleRow, TestApp, product_ids, routes};

const START: &str = "2024-01-01";
const END: &str = "2024-12-31";

mod top_overall {
    use super::*;

    #[tokio::test]
    async fn ranks_by_total_quantity_and_truncates_to_n() {
        let app = TestApp::spawn().await;
        app.load(&[
            SaleRow::new("O1", "P1", 2),
            SaleRow::new("O2", "P1", 3),
            SaleRow::new("O3", "P2", 3),
            SaleRow::new("O4", "P3", 8),
        ])
        .await;

        let res = app
            .get(&routes::with_window(routes::TOP_OVERALL, "2", START, END))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(product_ids(&res.body), ["P3", "P1"]);
        assert_eq!(res.body[0]["quantity_sold"], 8);
        assert_eq!(res.body[1]["quantity_sold"], 5);
        assert_eq!(res.body[1]["product_name"], "Widget");
        assert_eq!(res.body[1]["category"], "Electronics");
    }

    #[tokio::test]
    async fn quantities_beyond_32_bits_are_loaded_and_summed() {
        let app = TestApp::spawn().await;
        app.load(&[
            SaleRow::new("O1", "P1", 3_000_000_000),
            SaleRow::new("O2", "P1", 2),
            SaleRow::new("O3", "P2", 7),
        ])
        .await;

        let res = app
            .get(&routes::with_window(routes::TOP_OVERALL, "5", START, END))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(product_ids(&res.body), ["P1", "P2"]);
        assert_eq!(res.body[0]["quantity_sold"], 3_000_000_002_i64);
    }

    #[tokio::test]
    async fn ties_break_by_product_id() {
        let app = TestApp::spawn().await;
        app.load(&[
            SaleRow::new("O1", "P9", 4),
            SaleRow::new("O2", "P2", 4),
            SaleRow::new("O3", "P5", 4),
        ])
        .await;

        let res = app
            .get(&routes::with_window(routes::TOP_OVERALL, "10", START, END))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(product_ids(&res.body), ["P2", "P5", "P9"]);
    }

    #[tokio::test]
    async fn window_bounds_are_inclusive() {
        let app = TestApp::spawn().await;
        app.load(&[
            SaleRow::new("O1", "P1", 1).date("2024-02-01"),
            SaleRow::new("O2", "P2", 1).date("2024-02-29"),
            SaleRow::new("O3", "P3", 1).date("2024-01-31"),
            SaleRow::new("O4", "P4", 1).date("2024-03-01"),
        ])
        .await;

        let res = app
            .get(&routes::with_window(
                routes::TOP_OVERALL,
                "10",
                "2024-02-01",
                "2024-02-29",
            ))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(product_ids(&res.body), ["P1", "P2"]);
    }

    #[tokio::test]
    async fn empty_window_returns_empty_list() {
        let app = TestApp::spawn().await;
        app.load(&[SaleRow::new("O1", "P1", 1)]).await;

        let res = app
            .get(&routes::with_window(
                routes::TOP_OVERALL,
                "5",
                "2023-01-01",
                "2023-12-31",
            ))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body, serde_json::json!([]));
    }
}

mod top_grouped {
    use super::*;

    #[tokio::test]
    async fn by_category_ranks_each_category_independently() {
        let app = TestApp::spawn().await;
        app.load(&[
            SaleRow::new("O1", "B1", 4).product("Novel", "Books", "15.00"),
            SaleRow::new("O2", "B2", 9).product("Atlas", "Books", "40.00"),
            SaleRow::new("O3", "S1", 2).product("Runner", "Shoes", "80.00"),
            SaleRow::new("O4", "S2", 6).product("Boot", "Shoes", "120.00"),
        ])
        .await;

        let res = app
            .get(&routes::with_window(routes::TOP_BY_CATEGORY, "1", START, END))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let groups = res.body.as_object().expect("expected a JSON object");
        assert_eq!(groups.len(), 2);
        assert_eq!(product_ids(&res.body["Books"]), ["B2"]);
        assert_eq!(product_ids(&res.body["Shoes"]), ["S2"]);
        assert_eq!(res.body["Shoes"][0]["quantity_sold"], 6);
    }

    #[tokio::test]
    async fn by_region_groups_on_the_order_region() {
        let app = TestApp::spawn().await;
        app.load(&[
            SaleRow::new("O1", "P1", 5).region("Europe"),
            SaleRow::new("O2", "P2", 3).region("Europe"),
            SaleRow::new("O3", "P1", 1).region("Asia"),
            SaleRow::new("O4", "P2", 7).region("Asia"),
            SaleRow::new("O5", "P3", 2).region("Asia"),
        ])
        .await;

        let res = app
            .get(&routes::with_window(routes::TOP_BY_REGION, "2", START, END))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(product_ids(&res.body["Europe"]), ["P1", "P2"]);
        assert_eq!(product_ids(&res.body["Asia"]), ["P2", "P3"]);
        assert_eq!(res.body["Asia"][0]["quantity_sold"], 7);
    }
}

mod validation {
    use super::*;

    async fn assert_rejected(app: &TestApp, path: &str, message: &str) {
        let res = app.get(path).await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], message, "{}", res.text);
    }

    #[tokio::test]
    async fn rejects_bad_limits() {
        let app = TestApp::spawn().await;
        let message = "Validation Error: invalid 'n' parameter for total records";

        for n in ["0", "-1", "abc", ""] {
            let path = routes::with_window(routes::TOP_OVERALL, n, START, END);
            assert_rejected(&app, &path, message).await;
        }
    }

    #[tokio::test]
    async fn rejects_malformed_dates_in_order() {
        let app = TestApp::spawn().await;

        let path = routes::with_window(routes::TOP_BY_CATEGORY, "3", "2024/01/01", "bad");
        assert_rejected(&app, &path, "Validation Error: invalid start_date").await;

        let path = routes::with_window(routes::TOP_BY_REGION, "3", START, "2024-13-01");
        assert_rejected(&app, &path, "Validation Error: invalid end_date").await;
    }

    #[tokio::test]
    async fn missing_parameters_are_validation_errors() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::TOP_OVERALL).await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
