// mixo-client/tests/http_adapters.rs
// Adapters against in-process fake backends

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use mixo_client::{ClientConfig, DeeplTranslator, HttpBlobStore, HttpDocumentStore};
use parking_lot::Mutex;
use serde_json::{Value, json};
use shared::store::{BlobStore, DocumentStore, StoreError, TranslationError, Translator, WriteOp};
use tokio::sync::mpsc;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// ========== Fake document store ==========

type Docs = Arc<Mutex<HashMap<(String, String), Value>>>;

async fn list_docs(
    State(docs): State<Docs>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let docs = docs.lock();
    let mut out: Vec<(String, Value)> = docs
        .iter()
        .filter(|((c, _), _)| *c == collection)
        .map(|((_, id), v)| (id.clone(), v.clone()))
        .collect();
    if let Some(field) = params.get("orderBy") {
        out.sort_by_key(|(_, v)| v[field].as_u64().unwrap_or(u64::MAX));
    }
    let documents: Vec<Value> = out
        .into_iter()
        .map(|(id, data)| json!({"id": id, "data": data}))
        .collect();
    Json(json!({ "documents": documents }))
}

async fn add_doc(
    State(docs): State<Docs>,
    Path(collection): Path<String>,
    Json(data): Json<Value>,
) -> Json<Value> {
    let mut docs = docs.lock();
    let id = format!("doc{}", docs.len() + 1);
    docs.insert((collection, id.clone()), data);
    Json(json!({ "id": id }))
}

async fn get_doc(
    State(docs): State<Docs>,
    Path((collection, id)): Path<(String, String)>,
) -> axum::response::Response {
    match docs.lock().get(&(collection, id.clone())) {
        Some(data) => Json(json!({"id": id, "data": data})).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(t), Some(p)) = (target.as_object_mut(), patch.as_object()) {
        for (k, v) in p {
            t.insert(k.clone(), v.clone());
        }
    }
}

async fn patch_doc(
    State(docs): State<Docs>,
    Path((collection, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> StatusCode {
    match docs.lock().get_mut(&(collection, id)) {
        Some(data) => {
            merge(data, &patch);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_doc(
    State(docs): State<Docs>,
    Path((collection, id)): Path<(String, String)>,
) -> StatusCode {
    docs.lock().remove(&(collection, id));
    StatusCode::NO_CONTENT
}

async fn batch(State(docs): State<Docs>, Json(body): Json<Value>) -> StatusCode {
    let writes = body["writes"].as_array().cloned().unwrap_or_default();
    if writes.iter().any(|w| w["id"] == "boom") {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let mut docs = docs.lock();
    for w in writes {
        let key = (
            w["collection"].as_str().unwrap().to_string(),
            w["id"].as_str().unwrap().to_string(),
        );
        match w["op"].as_str() {
            Some("update") => {
                if let Some(data) = docs.get_mut(&key) {
                    merge(data, &w["data"]);
                }
            }
            Some("delete") => {
                docs.remove(&key);
            }
            _ => return StatusCode::BAD_REQUEST,
        }
    }
    StatusCode::OK
}

fn document_app() -> Router {
    let docs: Docs = Arc::default();
    Router::new()
        .route("/collections/{c}/documents", get(list_docs).post(add_doc))
        .route(
            "/collections/{c}/documents/{id}",
            get(get_doc).patch(patch_doc).delete(delete_doc),
        )
        .route("/batch", post(batch))
        .with_state(docs)
}

#[tokio::test]
async fn test_document_store_crud_and_batch() {
    let base = spawn(document_app()).await;
    let store = HttpDocumentStore::new(&ClientConfig::new(base).with_token("t")).unwrap();

    let a = store
        .add("categories", json!({"title": "A", "displayOrder": 2}))
        .await
        .unwrap();
    let b = store
        .add("categories", json!({"title": "B", "displayOrder": 1}))
        .await
        .unwrap();

    let listed = store.query("categories", Some("displayOrder")).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec![b.as_str(), a.as_str()]);

    store
        .batch_write(vec![
            WriteOp::update("categories", &a, json!({"displayOrder": 1})),
            WriteOp::delete("categories", &b),
        ])
        .await
        .unwrap();

    let doc = store.get("categories", &a).await.unwrap().unwrap();
    assert_eq!(doc.data["displayOrder"], 1);
    assert_eq!(doc.data["title"], "A");
    assert!(store.get("categories", &b).await.unwrap().is_none());

    store.update("categories", &a, json!({"visible": false})).await.unwrap();
    let doc = store.get("categories", &a).await.unwrap().unwrap();
    assert_eq!(doc.data["visible"], false);

    store.delete("categories", &a).await.unwrap();
    assert!(store.query("categories", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_document_store_batch_failure_is_rejected() {
    let base = spawn(document_app()).await;
    let store = HttpDocumentStore::new(&ClientConfig::new(base)).unwrap();

    let err = store
        .batch_write(vec![WriteOp::delete("categories", "boom")])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}

#[tokio::test]
async fn test_document_store_update_missing() {
    let base = spawn(document_app()).await;
    let store = HttpDocumentStore::new(&ClientConfig::new(base)).unwrap();

    let err = store
        .update("categories", "nope", json!({"title": "x"}))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_document_store_unreachable() {
    let store =
        HttpDocumentStore::new(&ClientConfig::new("http://127.0.0.1:9").with_timeout(500)).unwrap();
    let err = store.query("categories", None).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

// ========== Fake object storage ==========

async fn put_object(Path(path): Path<String>, body: Bytes) -> Json<Value> {
    Json(json!({ "url": format!("https://cdn.test/{}?size={}", path, body.len()) }))
}

#[tokio::test]
async fn test_blob_upload_reports_progress() {
    let app = Router::new().route("/objects/{*path}", put(put_object));
    let base = spawn(app).await;
    let store = HttpBlobStore::new(&ClientConfig::new(base)).unwrap();

    let (tx, mut rx) = mpsc::channel(64);
    let url = store
        .upload(
            "category/category_1_abc.png",
            vec![0u8; 100_000],
            "image/png",
            Some(tx),
        )
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.test/category/category_1_abc.png?size=100000");

    let mut last = None;
    while let Ok(p) = rx.try_recv() {
        last = Some(p);
    }
    let last = last.unwrap();
    assert_eq!(last.transferred, 100_000);
    assert_eq!(last.total, 100_000);
}

// ========== Fake DeepL ==========

async fn fake_deepl(body: String) -> axum::response::Response {
    let mut texts = Vec::new();
    let mut target = String::new();
    let mut key = String::new();
    for pair in body.split('&') {
        if let Some((k, v)) = pair.split_once('=') {
            match k {
                "text" => texts.push(v.to_string()),
                "target_lang" => target = v.to_string(),
                "auth_key" => key = v.to_string(),
                _ => {}
            }
        }
    }
    if key == "throttled" {
        return StatusCode::from_u16(456).unwrap().into_response();
    }
    let translations: Vec<Value> = texts
        .iter()
        .map(|t| json!({"detected_source_language": "FR", "text": format!("{t}-{target}")}))
        .collect();
    Json(json!({ "translations": translations })).into_response()
}

#[tokio::test]
async fn test_deepl_batch_keeps_order() {
    let base = spawn(Router::new().route("/v2/translate", post(fake_deepl))).await;
    let translator =
        DeeplTranslator::new(format!("{base}/v2/translate"), Some("key".into()), 5_000).unwrap();

    let out = translator
        .translate_batch(&["Bonjour".to_string(), "Merci".to_string()], "en", "fr")
        .await
        .unwrap();
    assert_eq!(out, vec!["Bonjour-EN".to_string(), "Merci-EN".to_string()]);
}

#[tokio::test]
async fn test_deepl_quota_is_rate_limited() {
    let base = spawn(Router::new().route("/v2/translate", post(fake_deepl))).await;
    let translator =
        DeeplTranslator::new(format!("{base}/v2/translate"), Some("throttled".into()), 5_000)
            .unwrap();

    let err = translator
        .translate_batch(&["Salut".to_string()], "DE", "FR")
        .await
        .unwrap_err();
    assert_eq!(err, TranslationError::RateLimited);
}
