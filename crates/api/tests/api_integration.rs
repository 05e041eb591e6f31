//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use api::config::Config;
use api::routes::{AppState, ServiceInfo};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog::{CatalogStore, FulfillmentEngine, InMemoryOrderLedger, Money, Product, ProductId};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup_with_state() -> (axum::Router, Arc<AppState<InMemoryOrderLedger>>) {
    let catalog = CatalogStore::new(vec![
        Product::new("p1", Money::from_major(10), 2),
        Product::new("p2", Money::from_cents(2450), 5).with_name("Wireless Mouse"),
    ])
    .unwrap();
    let engine = FulfillmentEngine::new(catalog, InMemoryOrderLedger::new());
    let state = AppState::new(engine, ServiceInfo::new("development"));
    (api::create_router(state.clone()), state)
}

fn setup() -> axum::Router {
    setup_with_state().0
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    post_raw(uri, serde_json::to_string(&body).unwrap())
}

fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

mod service {
    use super::*;

    #[tokio::test]
    async fn test_descriptor() {
        let app = setup();
        let (status, json) = send(&app, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["service"], ServiceInfo::NAME);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["mode"], "development");
        assert_eq!(json["protocol"], "http");
    }

    #[tokio::test]
    async fn test_descriptor_honours_forwarded_proto() {
        let app = setup();
        let request = Request::builder()
            .uri("/")
            .header("x-forwarded-proto", "HTTPS")
            .body(Body::empty())
            .unwrap();
        let (_, json) = send(&app, request).await;
        assert_eq!(json["protocol"], "https");
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup();
        let (status, json) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }
}

mod products {
    use super::*;

    #[tokio::test]
    async fn test_list_products() {
        let app = setup();
        let (status, json) = send(&app, get("/api/products")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(
            json["data"],
            serde_json::json!([
                { "id": "p1", "price": 10, "stock": 2 },
                { "id": "p2", "name": "Wireless Mouse", "price": 24.5, "stock": 5 },
            ])
        );
    }

    #[tokio::test]
    async fn test_get_product() {
        let app = setup();
        let (status, json) = send(&app, get("/api/products/p1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "id": "p1", "price": 10, "stock": 2 }));
    }

    #[tokio::test]
    async fn test_get_nonexistent_product() {
        let app = setup();
        let (status, json) = send(&app, get("/api/products/nope")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({ "error": "Product not found" }));
    }
}

mod orders {
    use super::*;
    use catalog::OrderLedger;

    #[tokio::test]
    async fn test_create_order() {
        let (app, state) = setup_with_state();
        let (status, json) = send(
            &app,
            post_json("/api/orders", serde_json::json!({ "productId": "p1", "quantity": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        let order = &json["order"];
        assert!(order["id"].as_str().unwrap().starts_with("ORD-"));
        assert_eq!(order["productId"], "p1");
        assert_eq!(order["quantity"], 1);
        assert_eq!(order["total"], 10);
        let created_at = order["createdAt"].as_str().unwrap();
        assert!(created_at.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());

        let product = state
            .engine
            .catalog()
            .get_product(&ProductId::new("p1"))
            .await
            .unwrap();
        assert_eq!(product.stock, 1);
    }

    #[tokio::test]
    async fn test_stock_visible_after_orders() {
        let app = setup();
        for _ in 0..2 {
            let (status, _) = send(
                &app,
                post_json("/api/orders", serde_json::json!({ "productId": "p1", "quantity": 1 })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(
            &app,
            post_json("/api/orders", serde_json::json!({ "productId": "p1", "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({ "error": "Product unavailable" }));

        let (_, json) = send(&app, get("/api/products/p1")).await;
        assert_eq!(json["stock"], 0);
    }

    #[tokio::test]
    async fn test_unknown_product_and_short_stock_look_the_same() {
        let app = setup();
        let (unknown_status, unknown) = send(
            &app,
            post_json(
                "/api/orders",
                serde_json::json!({ "productId": "unknown", "quantity": 1 }),
            ),
        )
        .await;
        let (short_status, short) = send(
            &app,
            post_json("/api/orders", serde_json::json!({ "productId": "p1", "quantity": 5 })),
        )
        .await;

        assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
        assert_eq!(short_status, StatusCode::BAD_REQUEST);
        assert_eq!(unknown, short);
    }

    #[tokio::test]
    async fn test_quantity_beyond_any_stock_is_unavailable() {
        let (app, state) = setup_with_state();
        let bodies = [
            serde_json::json!({ "productId": "p1", "quantity": 5_000_000_000u64 }),
            serde_json::json!({ "productId": "p1", "quantity": 1e30 }),
        ];

        for body in bodies {
            let (status, json) = send(&app, post_json("/api/orders", body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json, serde_json::json!({ "error": "Product unavailable" }));
        }

        let (_, product) = send(&app, get("/api/products/p1")).await;
        assert_eq!(product["stock"], 2);
        assert!(state.engine.ledger().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_payloads() {
        let (app, state) = setup_with_state();
        let bodies = [
            serde_json::json!({ "quantity": 2 }),
            serde_json::json!({ "productId": "p1" }),
            serde_json::json!({ "productId": "", "quantity": 1 }),
            serde_json::json!({ "productId": null, "quantity": 2 }),
            serde_json::json!({ "productId": "p1", "quantity": 0 }),
            serde_json::json!({ "productId": "p1", "quantity": -1 }),
            serde_json::json!({ "productId": "p1", "quantity": 1.5 }),
            serde_json::json!({ "productId": "p1", "quantity": "1" }),
            serde_json::json!({}),
        ];

        for body in bodies {
            let (status, json) = send(&app, post_json("/api/orders", body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json, serde_json::json!({ "error": "Invalid payload" }));
        }

        assert!(state.engine.ledger().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_and_missing_bodies() {
        let app = setup();

        let (status, json) = send(&app, post_raw("/api/orders", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid payload");

        let request = Request::builder()
            .method("POST")
            .uri("/api/orders")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid payload");
    }

    #[tokio::test]
    async fn test_list_and_get_orders() {
        let app = setup();
        let mut created = Vec::new();
        for (product, quantity) in [("p2", 2), ("p1", 1), ("p2", 1)] {
            let (_, json) = send(
                &app,
                post_json(
                    "/api/orders",
                    serde_json::json!({ "productId": product, "quantity": quantity }),
                ),
            )
            .await;
            created.push(json["order"].clone());
        }

        let (status, json) = send(&app, get("/api/orders")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::Value::Array(created.clone()));
        assert_eq!(json["data"][0]["total"], 49);

        let id = created[1]["id"].as_str().unwrap();
        let (status, json) = send(&app, get(&format!("/api/orders/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, created[1]);

        let (status, json) = send(&app, get("/api/orders/ORD-0-0")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Order not found");
    }
}

mod application {
    use super::*;

    fn setup_app(config: &Config) -> axum::Router {
        let (_, state) = setup_with_state();
        api::create_app(state, get_metrics_handle(), config)
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = setup_app(&Config::default());
        let request = Request::builder()
            .uri("/api/products")
            .header("origin", "https://shop.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_body_limit_rejects_large_payloads() {
        let config = Config {
            max_request_bytes: 64,
            ..Config::default()
        };
        let app = setup_app(&config);
        let padding = "x".repeat(256);
        let (status, json) = send(
            &app,
            post_json(
                "/api/orders",
                serde_json::json!({ "productId": "p1", "quantity": 1, "note": padding }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"], "Payload too large");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = setup_app(&Config::default());
        send(
            &app,
            post_json("/api/orders", serde_json::json!({ "productId": "p1", "quantity": 1 })),
        )
        .await;

        let response = app.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
