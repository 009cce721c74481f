mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = res.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Token {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = send_json(
        app,
        post(
            "/api/users",
            None,
            json!({
                "email": format!("{}@example.com", username),
                "username": username,
                "first_name": "Test",
                "last_name": "User",
                "password": PASSWORD,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        app,
        post(
            "/api/auth/token/login",
            None,
            json!({"email": format!("{}@example.com", username), "password": PASSWORD}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["auth_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_is_public() {
    let state = test_state().await;
    let app = foodgram::app(state);

    let (status, body) = send_json(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn registration_reports_field_errors_and_duplicates() {
    let state = test_state().await;
    let app = foodgram::app(state);

    let (status, body) = send_json(
        &app,
        post("/api/users", None, json!({"email": "not-an-email", "username": "x", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    register_and_login(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        post(
            "/api/users",
            None,
            json!({
                "email": "alice@example.com",
                "username": "alice",
                "first_name": "A",
                "last_name": "B",
                "password": PASSWORD,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "username"]);
}

#[tokio::test]
async fn bad_credentials_are_a_bad_request() {
    let state = test_state().await;
    let app = foodgram::app(state);
    register_and_login(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        post("/api/auth/token/login", None, json!({"email": "alice@example.com", "password": "wrong-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn auth_header_rules() {
    let state = test_state().await;
    let app = foodgram::app(state);
    let token = register_and_login(&app, "alice").await;

    let (status, _) = send_json(&app, get("/api/users/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(&app, get("/api/recipes", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(&app, get("/api/users/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["is_subscribed"], false);
}

#[tokio::test]
async fn recipe_lifecycle_over_http() {
    let state = test_state().await;
    let salt = create_ingredient(&state.db, "salt", "g").await;
    let lunch = create_tag(&state.db, "Lunch", "lunch").await;
    let app = foodgram::app(state);

    let token = register_and_login(&app, "chef").await;

    let payload = json!({
        "ingredients": [{"id": salt.id, "amount": 5}],
        "tags": [lunch.id],
        "image": "data:image/png;base64,AAAA",
        "name": "Soup",
        "text": "Boil water.",
        "cooking_time": 15
    });

    let (status, _) = send_json(&app, post("/api/recipes", None, payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(&app, post("/api/recipes", Some(&token), payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["ingredients"][0]["amount"], 5);

    let (status, body) = send_json(&app, get("/api/recipes?tags=lunch&tags=dinner", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meta"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["is_favorited"], false);

    let (status, _) = send_json(&app, get("/api/recipes?author=me", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/recipes/{}/shopping_cart", id);
    let (status, body) = send_json(&app, get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Soup");

    let (status, _) = send_json(&app, get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(get("/api/recipes/download_shopping_cart", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("shopping_list.txt"));
    let text = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&text[..], b"Salt - 5 g\n");

    let (status, body) = send(&app, delete(&uri, &token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send(&app, delete(&uri, &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let other = register_and_login(&app, "stranger").await;
    let (status, _) = send(&app, delete(&format!("/api/recipes/{}", id), &other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, delete(&format!("/api/recipes/{}", id), &token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, get(&format!("/api/recipes/{}", id), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_recipe_payload_is_rejected() {
    let state = test_state().await;
    let app = foodgram::app(state);
    let token = register_and_login(&app, "chef").await;

    let (status, body) = send_json(
        &app,
        post(
            "/api/recipes",
            Some(&token),
            json!({"ingredients": [], "tags": [], "image": "x", "name": "Soup", "text": "t", "cooking_time": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let req = Request::builder()
        .method("POST")
        .uri("/api/recipes")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn subscribe_over_http() {
    let state = test_state().await;
    let app = foodgram::app(state);
    let author_token = register_and_login(&app, "chef").await;
    let fan_token = register_and_login(&app, "fan").await;

    let (_, me) = send_json(&app, get("/api/users/me", Some(&author_token))).await;
    let author_id = me["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/users/{}/subscribe", author_id);
    let (status, body) = send_json(&app, get(&uri, Some(&fan_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_subscribed"], true);
    assert_eq!(body["data"]["recipes_count"], 0);

    let (status, body) = send_json(&app, get(&uri, Some(&author_token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SELF_FOLLOW");

    let (status, body) = send_json(&app, get("/api/users?page=1", Some(&fan_token))).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] == author_id)
        .cloned()
        .unwrap();
    assert_eq!(listed["is_subscribed"], true);

    let (status, body) = send_json(&app, get("/api/users/subscriptions", Some(&fan_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meta"]["total"], 1);

    let (status, _) = send(&app, delete(&uri, &fan_token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn set_password_checks_the_current_one() {
    let state = test_state().await;
    let app = foodgram::app(state);
    let token = register_and_login(&app, "alice").await;

    let (status, _) = send_json(
        &app,
        post(
            "/api/users/set_password",
            Some(&token),
            json!({"current_password": "nope-nope", "new_password": "brand-new-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post(
            "/api/users/set_password",
            Some(&token),
            json!({"current_password": PASSWORD, "new_password": "brand-new-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(
        &app,
        post(
            "/api/auth/token/login",
            None,
            json!({"email": "alice@example.com", "password": "brand-new-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn catalog_reads_are_public() {
    let state = test_state().await;
    create_ingredient(&state.db, "Grape", "pcs").await;
    create_ingredient(&state.db, "Apple", "pcs").await;
    create_tag(&state.db, "Lunch", "lunch").await;
    let app = foodgram::app(state);

    let (status, body) = send_json(&app, get("/api/ingredients?name=ap", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Apple");
    assert_eq!(body["data"][1]["name"], "Grape");

    let (status, body) = send_json(&app, get("/api/tags/lunch", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["color"], "#112233");

    let (status, _) = send_json(&app, get("/api/tags/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let token = register_and_login(&app, "cook").await;
    let (status, _) = send_json(&app, post("/api/tags", Some(&token), json!({"name": "Brunch"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
