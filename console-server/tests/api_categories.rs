//! 分类接口集成测试
//!
//! 通过 `build_app` + `oneshot` 驱动完整路由，后端为带演示数据的内存存储。

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use console_server::api::SESSION_HEADER;
use console_server::db::{MemoryBlobStore, MemoryDocumentStore};
use console_server::{Config, ServerState, build_app};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::store::{CATEGORIES, DocumentStore, TranslationError, Translator};
use tower::ServiceExt;

struct NoTranslator;

#[async_trait]
impl Translator for NoTranslator {
    async fn translate_batch(
        &self,
        _texts: &[String],
        _target_lang: &str,
        _source_lang: &str,
    ) -> Result<Vec<String>, TranslationError> {
        Err(TranslationError::NotConfigured)
    }
}

fn app_with_store() -> (Router, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::with_demo_data());
    let state = ServerState::with_collaborators(
        Config::default(),
        store.clone(),
        Arc::new(MemoryBlobStore::default()),
        Arc::new(NoTranslator),
    );
    (build_app(state), store)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn ids(body: &Value) -> Vec<String> {
    body["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

fn orders(body: &Value) -> Vec<u64> {
    body["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["displayOrder"].as_u64().unwrap())
        .collect()
}

async fn stored_order(store: &MemoryDocumentStore, id: &str) -> u64 {
    let doc = store.get(CATEGORIES, id).await.unwrap().unwrap();
    doc.data["displayOrder"].as_u64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with_store();
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_list_returns_clean_working_copy() {
    let (app, _) = app_with_store();
    let (status, body) = send(&app, Method::GET, "/api/categories", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["state"], "clean");
    assert_eq!(body["data"]["dense"], true);
    assert_eq!(body["data"]["stats"]["total"], 3);
    assert_eq!(ids(&body), vec!["classics", "tiki", "summer"]);
    assert_eq!(orders(&body), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_move_then_commit_writes_changed_entries() {
    let (app, store) = app_with_store();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories/summer/move",
        Some("tab-1"),
        Some(json!({"position": 1, "from": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "dirty");
    assert_eq!(ids(&body), vec!["summer", "classics", "tiki"]);
    assert_eq!(orders(&body), vec![1, 2, 3]);

    // Nothing reaches the store before commit
    assert_eq!(stored_order(&store, "summer").await, 3);

    let (status, body) =
        send(&app, Method::POST, "/api/categories/commit", Some("tab-1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["written"], 3);
    assert_eq!(body["data"]["state"], "clean");

    assert_eq!(stored_order(&store, "summer").await, 1);
    assert_eq!(stored_order(&store, "classics").await, 2);
    assert_eq!(stored_order(&store, "tiki").await, 3);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let (app, _) = app_with_store();

    send(
        &app,
        Method::PUT,
        "/api/categories/order",
        Some("tab-a"),
        Some(json!({"ids": ["tiki", "summer", "classics"]})),
    )
    .await;

    let (_, other) = send(&app, Method::GET, "/api/categories", Some("tab-b"), None).await;
    assert_eq!(other["data"]["state"], "clean");
    assert_eq!(ids(&other), vec!["classics", "tiki", "summer"]);

    let (_, mine) = send(&app, Method::GET, "/api/categories", Some("tab-a"), None).await;
    assert_eq!(mine["data"]["state"], "dirty");
    assert_eq!(ids(&mine), vec!["tiki", "summer", "classics"]);
}

#[tokio::test]
async fn test_stale_move_is_conflict() {
    let (app, _) = app_with_store();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories/tiki/move",
        None,
        Some(json!({"position": 1, "from": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_ne!(body["code"], 0);
}

#[tokio::test]
async fn test_move_out_of_range_is_bad_request() {
    let (app, _) = app_with_store();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/categories/tiki/move",
        None,
        Some(json!({"position": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_restores_synced_order() {
    let (app, _) = app_with_store();
    send(
        &app,
        Method::POST,
        "/api/categories/classics/move",
        None,
        Some(json!({"position": 3})),
    )
    .await;

    let (status, body) = send(&app, Method::POST, "/api/categories/cancel", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "clean");
    assert_eq!(ids(&body), vec!["classics", "tiki", "summer"]);
}

#[tokio::test]
async fn test_create_at_position_shifts_siblings() {
    let (app, store) = app_with_store();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        None,
        Some(json!({"title": "Sours", "displayOrder": 2, "colorCode": "Red&White"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["displayOrder"], 2);

    assert_eq!(stored_order(&store, "classics").await, 1);
    assert_eq!(stored_order(&store, "tiki").await, 3);
    assert_eq!(stored_order(&store, "summer").await, 4);

    let (_, list) = send(&app, Method::GET, "/api/categories", None, None).await;
    assert_eq!(orders(&list), vec![1, 2, 3, 4]);
    assert_eq!(list["data"]["categories"][1]["title"], "Sours");
}

#[tokio::test]
async fn test_create_rejects_blank_title() {
    let (app, store) = app_with_store();
    let (status, _) =
        send(&app, Method::POST, "/api/categories", None, Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.count(CATEGORIES), 3);
}

#[tokio::test]
async fn test_update_position_and_delete() {
    let (app, store) = app_with_store();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/categories/classics",
        None,
        Some(json!({"displayOrder": 3, "visible": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["displayOrder"], 3);
    assert_eq!(body["data"]["visible"], false);
    assert_eq!(stored_order(&store, "tiki").await, 1);
    assert_eq!(stored_order(&store, "summer").await, 2);

    let (status, body) = send(&app, Method::DELETE, "/api/categories/tiki", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shifted"], 2);
    assert_eq!(stored_order(&store, "summer").await, 1);
    assert_eq!(stored_order(&store, "classics").await, 2);

    let (status, _) = send(&app, Method::DELETE, "/api/categories/tiki", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_normalize_repairs_gaps() {
    let (app, store) = app_with_store();
    store
        .update(CATEGORIES, "summer", json!({"displayOrder": 7}))
        .await
        .unwrap();

    let (status, body) = send(&app, Method::POST, "/api/categories/normalize", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], 1);
    assert_eq!(stored_order(&store, "summer").await, 3);
}

#[tokio::test]
async fn test_cocktail_list_flow() {
    let (app, store) = app_with_store();

    let (status, body) =
        send(&app, Method::GET, "/api/categories/summer/cocktails", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cocktails"], json!(["mojito"]));

    let (_, available) =
        send(&app, Method::GET, "/api/categories/summer/cocktails/available", None, None).await;
    let available: Vec<&str> = available["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert!(available.contains(&"negroni"));
    assert!(!available.contains(&"mojito"));
    assert!(!available.contains(&"espresso-martini"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/categories/summer/cocktails",
        None,
        Some(json!({"cocktailId": "espresso-martini"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories/summer/cocktails",
        None,
        Some(json!({"cocktailId": "daiquiri"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "dirty");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/categories/summer/cocktails",
        None,
        Some(json!({"cocktailId": "daiquiri"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/categories/summer/cocktails/daiquiri/move",
        None,
        Some(json!({"index": 0})),
    )
    .await;
    assert_eq!(body["data"]["cocktails"], json!(["daiquiri", "mojito"]));

    let (status, body) =
        send(&app, Method::POST, "/api/categories/summer/cocktails/commit", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "clean");

    let doc = store.get(CATEGORIES, "summer").await.unwrap().unwrap();
    assert_eq!(doc.data["cocktails"], json!(["daiquiri", "mojito"]));

    let (_, body) =
        send(&app, Method::DELETE, "/api/categories/summer/cocktails/mojito", None, None).await;
    assert_eq!(body["data"]["cocktails"], json!(["daiquiri"]));
    let (_, body) =
        send(&app, Method::POST, "/api/categories/summer/cocktails/cancel", None, None).await;
    assert_eq!(body["data"]["cocktails"], json!(["daiquiri", "mojito"]));
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let (app, _) = app_with_store();
    let (status, body) =
        send(&app, Method::GET, "/api/categories/nope/cocktails", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["category_id"], "nope");
}
