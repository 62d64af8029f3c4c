#![cfg(feature = "server")]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use belegzuordnung::api::{router, AppState};
use belegzuordnung::Settings;

fn app() -> Router {
    router(AppState::new(Settings::default()))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_client_list_filters_and_summary() {
    let (status, body) = get(app(), "/api/clients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["clients"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"]["summary"]["at_risk"], 3);

    let (_, body) = get(app(), "/api/clients?status=at-risk").await;
    let clients = body["data"]["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 3);
    assert!(clients.iter().all(|c| c["status"] == "at-risk"));

    let (status, body) = get(app(), "/api/clients?sort=alphabet").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("alphabet"));
}

#[tokio::test]
async fn test_client_detail_and_unknown_client() {
    let (status, body) = get(app(), "/api/clients/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["client"]["id"], "1");
    assert_eq!(body["data"]["matching_path"], "/clients/1/matching");

    let (status, body) = get(app(), "/api/clients/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_matching_view() {
    let (status, body) = get(app(), "/api/clients/1/matching").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], "4 of 15 transactions matched");
    assert_eq!(body["data"]["total"], 15);
    assert_eq!(body["data"]["waiting"], 0);

    let (_, body) = get(app(), "/api/clients/1/matching?status=unmatched").await;
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_request_receipts() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/clients/1/matching/requests",
        Some(json!({ "transaction_ids": ["t14", "t2"], "note": "Danke!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["transaction_ids"], json!(["t2", "t14"]));
    assert!(body["data"]["request"]["message"]
        .as_str()
        .unwrap()
        .contains("Danke!"));

    // nothing selected: no request, no error
    let (status, body) = send(
        app(),
        "POST",
        "/api/clients/1/matching/requests",
        Some(json!({ "transaction_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());

    let (status, _) = send(
        app(),
        "POST",
        "/api/clients/1/matching/requests",
        Some(json!({ "transaction_ids": ["t99"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inbox_kpis_and_date_range() {
    let (status, body) = get(app(), "/api/inbox").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kpis"]["total_open"], 12);
    assert_eq!(body["data"]["kpis"]["unmatched"], 6);
    assert_eq!(body["data"]["kpis"]["waiting"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 13);

    let (_, body) = get(app(), "/api/inbox?range=last-month").await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let (_, body) = get(app(), "/api/inbox?search=nothing-like-this").await;
    assert_eq!(
        body["data"]["empty_message"],
        "No items found matching your filters."
    );
}

#[tokio::test]
async fn test_role_gating_follows_persona() {
    let app = app();

    let (status, _) = get(app.clone(), "/api/mandant/dashboard").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app.clone(),
        "PUT",
        "/api/role",
        Some(json!({ "role": "client" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current"]["role"], "client");
    assert_eq!(body["data"]["start_path"], "/mandant/dashboard");

    let (status, body) = get(app.clone(), "/api/mandant/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["welcome"]
        .as_str()
        .unwrap()
        .starts_with("Willkommen"));

    let (status, _) = get(app.clone(), "/api/clients").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = get(app, "/api/navigation").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
}

async fn client_app() -> Router {
    let app = app();
    send(
        app.clone(),
        "PUT",
        "/api/role",
        Some(json!({ "role": "client" })),
    )
    .await;
    app
}

#[tokio::test]
async fn test_mandant_transactions_period_filter() {
    let app = client_app().await;

    let (status, body) = get(
        app.clone(),
        "/api/mandant/transactions?month=Februar&year=2024",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["period"], "Filter aktiv: Februar 2024");
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 2);

    let (_, body) = get(app.clone(), "/api/mandant/transactions?status=all").await;
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 10);
    assert!(body["data"].get("period").is_none());

    let (status, _) = get(app, "/api/mandant/transactions?status=irgendwas").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_for_open_transaction_only() {
    let app = client_app().await;

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/mandant/transactions/1/upload",
        Some(json!({ "filename": "rechnung.pdf", "note": "Teil 1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["transaction"]["status"], "eingereicht");
    assert_eq!(body["data"]["transaction"]["attachments"], json!(["rechnung.pdf"]));
    assert_eq!(body["data"]["notice"]["title"], "Beleg hochgeladen");

    // already done
    let (status, _) = send(
        app.clone(),
        "POST",
        "/api/mandant/transactions/4/upload",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app,
        "POST",
        "/api/mandant/transactions/999/upload",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_receipts_list_and_upload() {
    let app = client_app().await;

    let (_, body) = get(app.clone(), "/api/mandant/receipts").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 7);

    let (_, body) = get(app.clone(), "/api/mandant/receipts?status=ohne-zuordnung").await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["r4", "r6"]);

    let (status, body) = send(
        app,
        "POST",
        "/api/mandant/receipts",
        Some(json!({ "filenames": ["scan.pdf", "foto.PNG", "notizen.txt"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["added"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["added"][0]["id"], "r8");
    assert_eq!(body["data"]["skipped"], json!(["notizen.txt"]));
}

#[tokio::test]
async fn test_route_resolution() {
    let (status, body) = get(app(), "/api/route?path=/clients/2/matching").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["path"], "/clients/2/matching");

    let (status, _) = get(app(), "/api/route?path=/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app(), "/api/route?path=/mandant/belege").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
