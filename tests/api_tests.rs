use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use splitledger::api::{create_router, AppState};
use splitledger::store::MemoryStore;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    create_router(AppState::new(MemoryStore::new()))
}

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_user(app: &axum::Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_group(app: &axum::Router, name: &str, member_ids: &[String]) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/groups",
        Some(json!({ "name": name, "member_ids": member_ids })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("healthy"));
}

#[tokio::test]
async fn test_user_crud_over_http() {
    let app = test_app();
    let id = create_user(&app, "Alice").await;

    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Alice"));
    assert_eq!(body["data"]["total_owed"], json!("0"));

    let (status, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_blank_user_name_is_bad_request() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_individual_transaction_updates_both_users() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "coffee",
            "price": 10,
            "buyer_id": alice,
            "borrower_id": bob,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["buyer_name"], json!("Alice"));
    assert_eq!(body["data"]["borrower_name"], json!("Bob"));
    assert_eq!(body["data"]["status"], json!("ACTIVE"));

    let (_, alice_body) = send(&app, Method::GET, &format!("/users/{alice}"), None).await;
    assert_eq!(alice_body["data"]["total_owed"], json!("5"));
    assert_eq!(alice_body["data"]["outstanding"][&bob], json!("5"));

    let (_, bob_body) = send(&app, Method::GET, &format!("/users/{bob}"), None).await;
    assert_eq!(bob_body["data"]["total_owed"], json!("-5"));
}

#[tokio::test]
async fn test_group_transaction_round_trip() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let carol = create_user(&app, "Carol").await;
    let group = create_group(
        &app,
        "flat",
        &[alice.clone(), bob.clone(), carol.clone()],
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "groceries",
            "price": 90,
            "buyer_id": alice,
            "group_id": group,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["group_name"], json!("flat"));
    let tx_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, alice_body) = send(&app, Method::GET, &format!("/users/{alice}"), None).await;
    assert_eq!(alice_body["data"]["total_owed"], json!("60"));

    let (status, _) = send(&app, Method::DELETE, &format!("/transactions/{tx_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, alice_body) = send(&app, Method::GET, &format!("/users/{alice}"), None).await;
    assert_eq!(alice_body["data"]["total_owed"], json!("0"));
}

#[tokio::test]
async fn test_patch_transaction_price() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "lamp",
            "price": 40,
            "buyer_id": alice,
            "borrower_id": bob,
        })),
    )
    .await;
    let tx_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/transactions/{tx_id}"),
        Some(json!({ "price": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], json!("100"));

    let (_, alice_body) = send(&app, Method::GET, &format!("/users/{alice}"), None).await;
    assert_eq!(alice_body["data"]["total_owed"], json!("50"));
}

#[tokio::test]
async fn test_transaction_with_both_counterparties_is_unprocessable() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let group = create_group(&app, "pair", &[alice.clone(), bob.clone()]).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "ambiguous",
            "price": 10,
            "buyer_id": alice,
            "borrower_id": bob,
            "group_id": group,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("MALFORMED_TRANSACTION"));
}

#[tokio::test]
async fn test_transaction_against_empty_group_is_unprocessable() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let group = create_group(&app, "empty", &[]).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "banner",
            "price": 30,
            "buyer_id": alice,
            "group_id": group,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("EMPTY_GROUP"));
}

#[tokio::test]
async fn test_unknown_buyer_is_unprocessable() {
    let app = test_app();
    let bob = create_user(&app, "Bob").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "phantom",
            "price": 10,
            "buyer_id": uuid::Uuid::new_v4(),
            "borrower_id": bob,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("UNKNOWN_USER"));
}

#[tokio::test]
async fn test_deleted_group_shows_as_deleted_in_listing() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let group = create_group(&app, "temp", &[alice.clone(), bob.clone()]).await;

    send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "boat",
            "price": 40,
            "buyer_id": alice,
            "group_id": group,
        })),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, &format!("/groups/{group}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["group_name"], json!("deleted"));
}

#[tokio::test]
async fn test_group_members_resolve_names() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let group = create_group(&app, "duo", &[alice.clone(), bob.clone()]).await;

    let (status, body) = send(&app, Method::GET, &format!("/groups/{group}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let members = body["data"]["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    let names: Vec<&str> = members
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Alice"));
    assert!(names.contains(&"Bob"));
}

#[tokio::test]
async fn test_group_with_unknown_member_is_unprocessable() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/groups",
        Some(json!({
            "name": "mixed",
            "member_ids": [alice, uuid::Uuid::new_v4()],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("UNKNOWN_USER"));
}

#[tokio::test]
async fn test_negative_price_is_bad_request() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "refund",
            "price": -5,
            "buyer_id": alice,
            "borrower_id": bob,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_buyer_delete_refused_while_referenced() {
    let app = test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({
            "item": "desk",
            "price": 80,
            "buyer_id": alice,
            "borrower_id": bob,
        })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{alice}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}
