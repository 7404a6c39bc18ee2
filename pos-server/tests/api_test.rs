//! HTTP API 集成测试 (内存数据库 + oneshot 请求)
//!
//! 覆盖路由、错误码映射和完整的点餐流程。

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pos_server::{Config, Server, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let config = Config::default();
    let state = ServerState::initialize_in_memory(&config).await.unwrap();
    Server::build_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json_body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder.body(Body::from(json_body.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_table(app: &Router, number: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/tables",
        Some(json!({ "number": number, "capacity": 4, "area": null, "note": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn create_dish(app: &Router, name: &str, price: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/dishes",
        Some(json!({ "name": name, "price": price, "image": null, "description": null, "stock": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn table_crud_over_http() {
    let app = app().await;
    let table = create_table(&app, "A1").await;
    let id = table["id"].as_str().unwrap().to_string();
    assert_eq!(table["status"], "available");

    // 重复桌号 → 409
    let (status, body) = send(
        &app,
        "POST",
        "/api/tables",
        Some(json!({ "number": "A1", "capacity": 2, "area": null, "note": null })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // 更新
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/tables/{}", id),
        Some(json!({ "capacity": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 6);

    // 列表带 has_orders 标注
    let (status, body) = send(&app, "GET", "/api/tables", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["has_orders"], false);

    // 删除后 404
    let (status, _) = send(&app, "DELETE", &format!("/api/tables/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "GET", &format!("/api/tables/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn dine_in_order_lifecycle() {
    let app = app().await;
    let table = create_table(&app, "A1").await;
    let table_id = table["id"].as_str().unwrap().to_string();
    let dish = create_dish(&app, "Fried Rice", "15.00").await;
    let dish_id = dish["id"].as_str().unwrap().to_string();

    // 下单 (带操作员头)
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Operator", "alice")
        .body(Body::from(
            json!({
                "table_id": table_id,
                "items": [ { "dish_id": dish_id, "quantity": 2 } ]
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let detail: Value = serde_json::from_slice(&bytes).unwrap();
    let order_id = detail["order"]["id"].as_str().unwrap().to_string();
    assert_eq!(detail["order"]["status"], "pending");
    assert_eq!(detail["order"]["created_by"], "alice");
    assert_eq!(detail["items"].as_array().unwrap().len(), 1);

    // 桌台翻为 occupied
    let (_, table) = send(&app, "GET", &format!("/api/tables/{}", table_id), None).await;
    assert_eq!(table["status"], "occupied");

    // 推进到 completed 并全额支付
    for target in ["confirmed", "preparing", "ready"] {
        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/api/orders/{}/status", order_id),
            Some(json!({ "status": target })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/orders/{}/status", order_id),
        Some(json!({ "status": "completed", "pay_method": "cash", "paid_amount": "30.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["is_paid"], true);

    // 桌台释放
    let (_, table) = send(&app, "GET", &format!("/api/tables/{}", table_id), None).await;
    assert_eq!(table["status"], "available");

    // 终态后再迁移 → 422
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/orders/{}/status", order_id),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn takeout_order_skips_table() {
    let app = app().await;
    let dish = create_dish(&app, "Soup", "8.00").await;
    let dish_id = dish["id"].as_str().unwrap().to_string();

    let (status, detail) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "table_id": "takeout",
            "items": [ { "dish_id": dish_id, "quantity": 1 } ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(detail["table"].is_null());
    assert_eq!(detail["order"]["total_price"], "8.00");
}

#[tokio::test]
async fn order_with_unknown_dish_returns_404() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "table_id": "takeout",
            "items": [ { "dish_id": "dish:missing", "quantity": 1 } ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn cancel_after_confirm_rejected() {
    let app = app().await;
    let dish = create_dish(&app, "Soup", "8.00").await;
    let dish_id = dish["id"].as_str().unwrap().to_string();
    let (_, detail) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "table_id": "takeout",
            "items": [ { "dish_id": dish_id, "quantity": 1 } ]
        })),
    )
    .await;
    let order_id = detail["order"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/orders/{}/status", order_id),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/orders/{}/cancel", order_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn order_list_filters_and_paginates() {
    let app = app().await;
    let dish = create_dish(&app, "Soup", "8.00").await;
    let dish_id = dish["id"].as_str().unwrap().to_string();

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/orders",
            Some(json!({
                "table_id": "takeout",
                "items": [ { "dish_id": dish_id, "quantity": 1 } ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/api/orders?page=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);

    let (status, body) = send(&app, "GET", "/api/orders?status=completed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 0);

    // 非法日期 → 400
    let (status, body) = send(&app, "GET", "/api/orders?start_date=01-01-2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}
