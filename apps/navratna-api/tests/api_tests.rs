//! HTTP-level tests for the Navratna API.
//!
//! Each test builds the full router over a fresh in-memory database and
//! drives it with `tower::ServiceExt::oneshot`.

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use navratna_api::{build_router, AppState, Config};
use navratna_db::{Database, DbConfig};

const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

// =============================================================================
// Helpers
// =============================================================================

async fn setup_with(vars: &[(&str, &str)]) -> Router {
    let mut env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    env.insert("NAVRATNA_DB_PATH".to_string(), ":memory:".to_string());

    let config = Config::from_lookup(|name| env.get(name).cloned()).unwrap();
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db, config))
}

async fn setup() -> Router {
    setup_with(&[]).await
}

async fn send(app: &Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(path);
    let body = match body {
        Some(json_body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json_body.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, Method::GET, path, None).await
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, path, Some(body)).await
}

fn stone_body(code: &str, gem: &str) -> Value {
    json!({
        "stoneCode": code,
        "gemType": gem,
        "carat": 5.0,
        "origin": "Burma",
        "color": "Pigeon Blood",
        "clarity": "VS",
        "qualityGrade": "AA",
        "purchasePricePaise": 60_000_00,
        "sellingPricePaise": 1_00_250_00,
        "tags": ["jyotish"]
    })
}

async fn create_stone(app: &Router, code: &str, gem: &str) -> String {
    let (status, stone) = post(app, "/api/inventory", stone_body(code, gem)).await;
    assert_eq!(status, StatusCode::CREATED, "{stone}");
    stone["id"].as_str().unwrap().to_string()
}

async fn create_client(app: &Router, name: &str) -> String {
    let (status, client) = post(
        app,
        "/api/clients",
        json!({
            "name": name,
            "clientType": "Astrologer",
            "phone": "9829012345",
            "city": "Jaipur"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{client}");
    client["id"].as_str().unwrap().to_string()
}

async fn create_sale(app: &Router, client_id: &str, stone_id: &str) -> (StatusCode, Value) {
    post(
        app,
        "/api/sales",
        json!({
            "clientId": client_id,
            "inventoryId": stone_id,
            "saleDate": "2026-10-15",
            "totalAmountPaise": 1_00_250_00,
            "amountPaidPaise": 0
        }),
    )
    .await
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = setup().await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SERVING");
    assert_eq!(body["module"], "navratna-api");
    assert_eq!(body["database"], true);
}

// =============================================================================
// Inventory
// =============================================================================

#[tokio::test]
async fn test_inventory_crud_round_trip() {
    let app = setup().await;
    let id = create_stone(&app, "RUB-0001", "Ruby").await;

    let (status, stone) = get(&app, &format!("/api/inventory/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stone["stoneCode"], "RUB-0001");
    assert_eq!(stone["status"], "In Stock");
    assert_eq!(stone["qualityGrade"], "AA");
    assert_eq!(stone["tags"], json!(["jyotish"]));

    let mut edit = stone_body("RUB-0001", "Ruby");
    edit["sellingPricePaise"] = json!(1_10_000_00);
    edit["status"] = json!("Reserved");
    let (status, updated) = send(&app, Method::PUT, &format!("/api/inventory/{id}"), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["sellingPricePaise"], 1_10_000_00);
    assert_eq!(updated["status"], "Reserved");

    let (status, list) = get(&app, "/api/inventory?q=ruby").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/inventory/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, &format!("/api/inventory/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_inventory_validation_errors() {
    let app = setup().await;

    let mut blank = stone_body("RUB-0002", "Ruby");
    blank["stoneCode"] = json!("   ");
    let (status, body) = post(&app, "/api/inventory", blank).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Missing purchase price never reaches the handler.
    let (status, body) = post(
        &app,
        "/api/inventory",
        json!({ "stoneCode": "RUB-0003", "gemType": "Ruby", "carat": 1.0, "origin": "Burma" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let mut sold = stone_body("RUB-0004", "Ruby");
    sold["status"] = json!("Sold");
    let (status, _) = post(&app, "/api/inventory", sold).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/inventory/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_stone_code_conflicts() {
    let app = setup().await;
    create_stone(&app, "EMR-0001", "Emerald").await;

    let (status, body) = post(&app, "/api/inventory", stone_body("EMR-0001", "Emerald")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let app = setup().await;

    for path in [
        format!("/api/inventory/{MISSING_ID}"),
        format!("/api/clients/{MISSING_ID}"),
        format!("/api/suppliers/{MISSING_ID}"),
        format!("/api/sales/{MISSING_ID}"),
        format!("/api/certifications/{MISSING_ID}"),
        format!("/api/consultations/{MISSING_ID}"),
        format!("/api/tasks/{MISSING_ID}"),
    ] {
        let (status, body) = get(&app, &path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn test_sale_marks_stone_sold() {
    let app = setup().await;
    let stone_id = create_stone(&app, "RUB-0010", "Ruby").await;
    let client_id = create_client(&app, "Pandit Sharma").await;

    let (status, sale) = create_sale(&app, &client_id, &stone_id).await;
    assert_eq!(status, StatusCode::CREATED, "{sale}");
    assert_eq!(sale["invoiceNumber"], "NR/2026-27/0001");
    assert_eq!(sale["profitPaise"], 1_00_250_00 - 60_000_00);
    assert_eq!(sale["paymentStatus"], "Unpaid");

    let (_, stone) = get(&app, &format!("/api/inventory/{stone_id}")).await;
    assert_eq!(stone["status"], "Sold");

    // A manual edit cannot put a sold stone back on the shelf.
    let (status, stone) = send(
        &app,
        Method::PUT,
        &format!("/api/inventory/{stone_id}"),
        Some(stone_body("RUB-0010", "Ruby")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stone["status"], "Sold");

    let (status, body) = create_sale(&app, &client_id, &stone_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, sales) = get(&app, &format!("/api/clients/{client_id}/sales")).await;
    assert_eq!(sales.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_sale_with_unknown_references() {
    let app = setup().await;
    let client_id = create_client(&app, "Pandit Sharma").await;

    let (status, body) = create_sale(&app, &client_id, MISSING_ID).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_deleting_sale_restores_stock() {
    let app = setup().await;
    let stone_id = create_stone(&app, "RUB-0020", "Ruby").await;
    let client_id = create_client(&app, "Shri Ram Mandir").await;
    let (_, sale) = create_sale(&app, &client_id, &stone_id).await;
    let sale_id = sale["id"].as_str().unwrap();

    // The stone and client are pinned while the sale exists.
    let (status, _) = send(&app, Method::DELETE, &format!("/api/inventory/{stone_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, stone) = get(&app, &format!("/api/inventory/{stone_id}")).await;
    assert_eq!(stone["status"], "In Stock");
}

#[tokio::test]
async fn test_sale_invoice() {
    let app = setup_with(&[("NAVRATNA_UPI_ID", "navratna@okaxis")]).await;
    let stone_id = create_stone(&app, "RUB-0030", "Ruby").await;
    let client_id = create_client(&app, "Pandit Sharma").await;
    let (_, sale) = create_sale(&app, &client_id, &stone_id).await;
    let sale_id = sale["id"].as_str().unwrap();

    let (status, invoice) = get(&app, &format!("/api/sales/{sale_id}/invoice")).await;
    assert_eq!(status, StatusCode::OK, "{invoice}");
    assert_eq!(invoice["financialYear"], "2026-27");
    assert_eq!(invoice["totals"]["taxablePaise"], 1_00_000_00);
    assert_eq!(invoice["totals"]["interState"], false);
    assert_eq!(invoice["totals"]["cgstPaise"], 125_00);
    assert_eq!(invoice["totals"]["sgstPaise"], 125_00);
    assert_eq!(invoice["totals"]["amountPayablePaise"], 1_00_250_00);
    assert_eq!(invoice["balanceDuePaise"], 1_00_250_00);
    assert!(invoice["upiUri"].as_str().unwrap().starts_with("upi://pay?"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/sales/{sale_id}/invoice.html"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("NR/2026-27/0001"));
    assert!(html.contains("Pandit Sharma"));
}

// =============================================================================
// Certifications
// =============================================================================

#[tokio::test]
async fn test_certification_advance() {
    let app = setup().await;
    let stone_id = create_stone(&app, "EMR-0010", "Emerald").await;

    let (status, cert) = post(
        &app,
        "/api/certifications",
        json!({ "inventoryId": stone_id, "lab": "GRS", "submittedDate": "2026-10-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{cert}");
    assert_eq!(cert["status"], "Pending");
    let advance = format!("/api/certifications/{}/advance", cert["id"].as_str().unwrap());

    let (_, cert) = post(&app, &advance, json!({})).await;
    assert_eq!(cert["status"], "In Progress");
    let (_, cert) = post(&app, &advance, json!({})).await;
    assert_eq!(cert["status"], "Received");

    // Certifying needs a certificate number.
    let (status, _) = post(&app, &advance, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cert) = post(&app, &advance, json!({ "certificateNumber": "GRS2026-104233" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cert["status"], "Certified");

    let (_, stone) = get(&app, &format!("/api/inventory/{stone_id}")).await;
    assert_eq!(stone["certificationLab"], "GRS");

    let (status, body) = post(&app, &advance, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "BUSINESS_RULE");

    let (_, history) = get(&app, &format!("/api/inventory/{stone_id}/certifications")).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

// =============================================================================
// Tools
// =============================================================================

#[tokio::test]
async fn test_calculators() {
    let app = setup().await;

    let (status, valuation) = post(
        &app,
        "/api/calculators/valuation",
        json!({ "gemType": "Ruby", "carat": 2.0, "qualityGrade": "A", "origin": "Unknown" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{valuation}");
    assert_eq!(valuation["estimatedValuePaise"], 1_29_600_00);

    let (status, margin) = post(
        &app,
        "/api/calculators/margin",
        json!({ "purchasePricePaise": 7_500_00, "sellingPricePaise": 10_000_00 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(margin["profitPaise"], 2_500_00);
    assert_eq!(margin["marginBps"], 2_500);
    assert_eq!(margin["markupBps"], 3_333);

    let (status, body) = post(
        &app,
        "/api/calculators/valuation",
        json!({ "gemType": "Kryptonite", "carat": 1.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_quality_compare_with_inventory() {
    let app = setup().await;
    let id = create_stone(&app, "RUB-0040", "Ruby").await;

    let (status, report) = post(
        &app,
        "/api/calculators/quality-compare",
        json!({ "inventoryIds": [id] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{report}");

    let (status, _) = post(
        &app,
        "/api/calculators/quality-compare",
        json!({ "inventoryIds": [MISSING_ID] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zodiac_recommendation() {
    let app = setup().await;

    let (status, rec) = get(&app, "/api/astrological/zodiac/Leo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rec["planet"], "Sun");
    assert_eq!(rec["primaryStone"], "Ruby");

    let (status, _) = get(&app, "/api/astrological/zodiac/Ophiuchus").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create_stone(&app, "RUB-0050", "Ruby").await;
    let (status, body) = post(&app, "/api/astrological/recommend", json!({ "zodiacSign": "simha" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"][0]["id"], id.as_str());

    let (status, _) = post(&app, "/api/astrological/recommend", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tax_endpoints() {
    let app = setup().await;

    let (status, codes) = get(&app, "/api/tax/hsn").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(codes.as_array().unwrap().len(), 6);

    let (status, gst) = post(
        &app,
        "/api/tax/gst",
        json!({ "amountPaise": 1_00_000_00, "hsnCode": "7113", "buyerStateCode": "29" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gst["interState"], true);
    assert_eq!(gst["igstPaise"], 3_000_00);

    let (status, calendar) = get(&app, "/api/tax/calendar?year=2026&month=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calendar["returns"][0]["dueDate"], "2026-10-11");
    assert_eq!(calendar["returns"][1]["dueDate"], "2026-10-20");

    let (status, _) = get(&app, "/api/tax/calendar?month=13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard() {
    let app = setup().await;
    let stone_id = create_stone(&app, "RUB-0060", "Ruby").await;
    create_stone(&app, "EMR-0060", "Emerald").await;
    let client_id = create_client(&app, "Pandit Sharma").await;
    create_sale(&app, &client_id, &stone_id).await;

    let (status, dashboard) = get(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK, "{dashboard}");
    assert_eq!(dashboard["stock"]["totalCount"], 2);
    assert_eq!(dashboard["stock"]["soldCount"], 1);
    assert_eq!(dashboard["salesAllTime"]["saleCount"], 1);
    assert_eq!(dashboard["receivables"]["openSales"], 1);
    assert_eq!(dashboard["receivables"]["outstandingPaise"], 1_00_250_00);
}
