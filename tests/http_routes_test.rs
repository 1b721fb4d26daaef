// ==========================================
// HTTP 路由测试
// ==========================================
// 职责: 通过 axum Router 验证对外接口
// - 路径、方法、状态码
// - 响应字段名（batchId / material_type_name 等）
// - 错误体 {"error", "code"}
// ==========================================

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use dyeing_tracker::app::{router, AppState};
use dyeing_tracker::logging;
use serde_json::{json, Value};
use tower::ServiceExt;

// ==========================================
// 测试辅助函数
// ==========================================

fn test_router() -> Router {
    logging::init_test();
    let state = AppState::in_memory().expect("无法创建内存AppState");
    router(Arc::new(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("构建请求失败");

    let response = app.clone().oneshot(request).await.expect("请求失败");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("读取响应体失败");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("响应体不是 JSON")
    };
    (status, value)
}

async fn post_name(app: &Router, uri: &str, name: &str) -> i64 {
    let (status, body) = send(app, Method::POST, uri, Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::OK, "{}: {}", uri, body);
    body["id"].as_i64().expect("缺少 id")
}

/// 预置公司/材质/去向，返回 (company_id, material_type_id, destination_id)
async fn seed(app: &Router) -> (i64, i64, i64) {
    let company_id = post_name(app, "/api/companies", "Shree Textiles").await;
    let material_type_id = post_name(app, "/api/material-types", "Rayon").await;
    let destination_id = post_name(app, "/api/destinations", "Finishing Unit 2").await;
    (company_id, material_type_id, destination_id)
}

async fn create_batch(app: &Router, company_id: i64, material_type_id: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/batch",
        Some(json!({
            "company_id": company_id,
            "lot_number": "LOT-H01",
            "received_through_type": "direct",
            "items": [
                { "material_type_id": material_type_id, "color": "Indigo", "number_of_rolls": 4 },
                { "material_type_id": material_type_id, "color": "Saffron" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Batch created successfully");
    assert!(body["in_time"].as_str().expect("缺少 in_time").ends_with("+05:30"));
    body["batchId"].as_i64().expect("缺少 batchId")
}

// ==========================================
// 基础资料
// ==========================================

#[tokio::test]
async fn test_registry_routes_新增与列表() {
    let app = test_router();

    for uri in ["/api/companies", "/api/mediators", "/api/material-types", "/api/destinations"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.is_array(), "{}", uri);
    }

    let ravi = json!({ "name": " Ravi " });
    let (status, body) = send(&app, Method::POST, "/api/mediators", Some(ravi)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ravi");
    assert!(body["id"].is_i64());

    let (status, body) = send(&app, Method::GET, "/api/mediators", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn test_registry_routes_重复与缺失名称() {
    let app = test_router();
    post_name(&app, "/api/companies", "Laxmi Mills").await;

    let duplicate = json!({ "name": "Laxmi Mills" });
    let (status, body) = send(&app, Method::POST, "/api/companies", Some(duplicate)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Company already exists");
    assert_eq!(body["code"], "DUPLICATE_NAME");

    let (status, body) = send(&app, Method::POST, "/api/destinations", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Destination name required");
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, Method::GET, "/api/companies", None).await;
    assert_eq!(status, StatusCode::OK);
}

// ==========================================
// 批次流程
// ==========================================

#[tokio::test]
async fn test_batch_routes_完整流程() {
    let app = test_router();
    let (company_id, material_type_id, destination_id) = seed(&app).await;
    let batch_id = create_batch(&app, company_id, material_type_id).await;

    // 详情
    let (status, body) = send(&app, Method::GET, &format!("/api/batch/{}", batch_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], batch_id);
    assert_eq!(body["company_name"], "Shree Textiles");
    assert_eq!(body["status"], "OPEN");
    assert_eq!(body["out_time"], Value::Null);
    let items = body["items"].as_array().expect("缺少 items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["material_type_name"], "Rayon");
    assert_eq!(items[0]["material_name"], "Rayon");

    // 明细
    let items_uri = format!("/api/batch/{}/items", batch_id);
    let (status, body) = send(&app, Method::GET, &items_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let rolls: Vec<i64> = body
        .as_array()
        .expect("明细不是数组")
        .iter()
        .filter_map(|i| i["number_of_rolls"].as_i64())
        .collect();
    assert_eq!(rolls.iter().sum::<i64>(), 5);

    // 在厂列表
    let (_, body) = send(&app, Method::GET, "/api/batches/open", None).await;
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));

    // 修改
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/batch/{}", batch_id),
        Some(json!({
            "company_id": company_id,
            "lot_number": "LOT-H01-B",
            "received_through_type": "direct",
            "items": [
                { "material_type_id": material_type_id, "color": "Black", "number_of_rolls": 2 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Batch updated successfully");

    // 出厂
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/batch/{}/exit", batch_id),
        Some(json!({
            "destination_id": destination_id,
            "notes": "sent by lorry",
            "transport_type": "external",
            "vehicle_registration": "mh12ab1234"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Batch exited successfully");
    assert_eq!(body["destination_id"], destination_id);
    assert_eq!(body["transport_type"], "external");
    assert_eq!(body["vehicle_registration"], "MH12AB1234");
    assert!(body["out_time"].as_str().expect("缺少 out_time").ends_with("+05:30"));

    // 再次出厂 / 修改 / 删除 均 404
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/batch/{}/exit", batch_id),
        Some(json!({ "destination_id": destination_id, "transport_type": "internal" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Batch not found or already exited");
    assert_eq!(body["code"], "NOT_FOUND_OR_ALREADY_EXITED");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/batch/{}", batch_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 全部列表包含已出厂批次
    let (_, body) = send(&app, Method::GET, "/api/batches", None).await;
    let all = body.as_array().expect("列表不是数组");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["status"], "CLOSED");
    assert_eq!(all[0]["destination_name"], "Finishing Unit 2");
    assert_eq!(all[0]["lot_number"], "LOT-H01-B");

    let (_, body) = send(&app, Method::GET, "/api/batches/open", None).await;
    assert_eq!(body.as_array().map(|a| a.len()), Some(0));
}

#[tokio::test]
async fn test_batch_routes_校验错误() {
    let app = test_router();
    let (company_id, material_type_id, _) = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/batch",
        Some(json!({
            "company_id": company_id,
            "lot_number": "LOT-H02",
            "received_through_type": "mediator",
            "items": [{ "material_type_id": material_type_id, "color": "Grey" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Mediator is required when received through mediator");

    let batch_id = create_batch(&app, company_id, material_type_id).await;
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/batch/{}/exit", batch_id),
        Some(json!({
            "destination_id": 1,
            "transport_type": "external",
            "vehicle_registration": "ZZ"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a valid vehicle registration number");

    // 非 JSON 请求体
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/batch")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("构建请求失败");
    let response = app.clone().oneshot(request).await.expect("请求失败");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_routes_数字字符串id() {
    let app = test_router();
    let (company_id, material_type_id, destination_id) = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/batch",
        Some(json!({
            "company_id": company_id.to_string(),
            "lot_number": "LOT-H03",
            "received_through_type": "direct",
            "items": [{
                "material_type_id": material_type_id.to_string(),
                "color": "Olive",
                "number_of_rolls": "3"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let batch_id = body["batchId"].as_i64().expect("缺少 batchId");

    let (_, body) = send(&app, Method::GET, &format!("/api/batch/{}", batch_id), None).await;
    assert_eq!(body["company_id"], company_id);
    assert_eq!(body["items"][0]["number_of_rolls"], 3);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/batch/{}/exit", batch_id),
        Some(json!({ "destination_id": destination_id.to_string(), "transport_type": "internal" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["destination_id"], destination_id);
    assert_eq!(body["vehicle_registration"], Value::Null);

    // 非数字字符串仍是请求体错误
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/batch",
        Some(json!({ "company_id": "acme", "lot_number": "LOT-H04" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_batch_routes_不存在与非法id() {
    let app = test_router();

    let (status, body) = send(&app, Method::GET, "/api/batch/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = send(&app, Method::GET, "/api/batch/999/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, Method::DELETE, "/api/batch/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/batch/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, Method::GET, "/api/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}
