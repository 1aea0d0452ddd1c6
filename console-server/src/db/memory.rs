//! In-process collaborators for development and tests
//!
//! [`MemoryDocumentStore`] keeps every collection in a `BTreeMap` behind a
//! `parking_lot::RwLock`. Batches are validated before anything is written, so
//! a rejected batch leaves the store untouched. Every successful write is
//! announced on a broadcast channel, which makes this store a live source for
//! the refresh listener.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::{Value, json};
use shared::store::{
    BlobStore, CATEGORIES, COCKTAILS, ChangeEvent, Document, DocumentStore, StoreError,
    StoreResult, UploadProgress, WriteOp,
};
use shared::util::{now_millis, random_base36};
use tokio::sync::{broadcast, mpsc};

const CHANGE_CHANNEL_CAPACITY: usize = 64;
const ID_LEN: usize = 20;

type Collection = BTreeMap<String, Value>;

pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            collections: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Store pre-filled with a few categories and cocktails
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let now = now_millis();

        let cocktails = [
            ("negroni", "Negroni", true),
            ("daiquiri", "Daiquiri", true),
            ("mojito", "Mojito", true),
            ("zombie", "Zombie", true),
            ("mai-tai", "Mai Tai", true),
            ("espresso-martini", "Espresso Martini", false),
        ];
        for (id, name, validated) in cocktails {
            store.insert(
                COCKTAILS,
                id,
                json!({"name": name, "Validated": validated, "createdAt": now}),
            );
        }

        let categories = [
            ("classics", "Classics", "Red&White", vec!["negroni", "daiquiri"]),
            ("tiki", "Tiki", "Orange&White", vec!["zombie", "mai-tai"]),
            ("summer", "Summer", "Blue&White", vec!["mojito"]),
        ];
        for (i, (id, title, color, list)) in categories.into_iter().enumerate() {
            store.insert(
                CATEGORIES,
                id,
                json!({
                    "title": title,
                    "displayOrder": i + 1,
                    "visible": true,
                    "colorCode": color,
                    "cocktails": list,
                    "createdAt": now,
                    "updatedAt": now,
                }),
            );
        }
        store
    }

    /// Insert or replace a document under a known id, without notifying watchers
    pub fn insert(&self, collection: &str, id: &str, data: Value) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn notify(&self, collection: &str) {
        // No receivers is fine
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
        });
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shallow merge of `patch`'s fields into `target`
fn merge_fields(target: &mut Value, patch: Value) -> StoreResult<()> {
    let Value::Object(fields) = patch else {
        return Err(StoreError::InvalidDocument("update data must be an object".into()));
    };
    match target {
        Value::Object(existing) => {
            existing.extend(fields);
            Ok(())
        }
        _ => {
            *target = Value::Object(fields);
            Ok(())
        }
    }
}

/// Sort key for `order_by`: numbers ascending, missing fields last, ties by id
fn sort_documents(docs: &mut [Document], order_by: &str) {
    docs.sort_by(|a, b| {
        let ka = a.data.get(order_by).and_then(Value::as_f64);
        let kb = b.data.get(order_by).and_then(Value::as_f64);
        let by_key = match (ka, kb) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        by_key.then_with(|| a.id.cmp(&b.id))
    });
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(&self, collection: &str, order_by: Option<&str>) -> StoreResult<Vec<Document>> {
        let mut docs: Vec<Document> = self
            .collections
            .read()
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(field) = order_by {
            sort_documents(&mut docs, field);
        }
        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn add(&self, collection: &str, data: Value) -> StoreResult<String> {
        if !data.is_object() {
            return Err(StoreError::InvalidDocument("document must be an object".into()));
        }
        let id = {
            let mut collections = self.collections.write();
            let docs = collections.entry(collection.to_string()).or_default();
            let mut id = random_base36(ID_LEN);
            while docs.contains_key(&id) {
                id = random_base36(ID_LEN);
            }
            docs.insert(id.clone(), data);
            id
        };
        self.notify(collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        {
            let mut collections = self.collections.write();
            let doc = collections
                .get_mut(collection)
                .and_then(|c| c.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            merge_fields(doc, data)?;
        }
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let removed = self
            .collections
            .write()
            .get_mut(collection)
            .and_then(|c| c.remove(id));
        if removed.is_some() {
            self.notify(collection);
        }
        Ok(())
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        let mut touched: Vec<String> = Vec::new();
        {
            let mut collections = self.collections.write();

            for op in &ops {
                if let WriteOp::Update {
                    collection,
                    id,
                    data,
                } = op
                {
                    if !data.is_object() {
                        return Err(StoreError::Rejected(format!(
                            "update of {}/{} is not an object",
                            collection, id
                        )));
                    }
                    let exists = collections
                        .get(collection)
                        .is_some_and(|c| c.contains_key(id));
                    let deleted_earlier = ops.iter().any(|o| match o {
                        WriteOp::Delete { collection: c, id: i } => c == collection && i == id,
                        _ => false,
                    });
                    if !exists || deleted_earlier {
                        return Err(StoreError::Rejected(format!(
                            "no document {}/{} to update",
                            collection, id
                        )));
                    }
                }
            }

            for op in ops {
                match op {
                    WriteOp::Update {
                        collection,
                        id,
                        data,
                    } => {
                        if let Some(doc) =
                            collections.get_mut(&collection).and_then(|c| c.get_mut(&id))
                        {
                            merge_fields(doc, data)?;
                        }
                        touched.push(collection);
                    }
                    WriteOp::Delete { collection, id } => {
                        if let Some(c) = collections.get_mut(&collection) {
                            c.remove(&id);
                        }
                        touched.push(collection);
                    }
                }
            }
        }

        touched.sort();
        touched.dedup();
        for collection in &touched {
            self.notify(collection);
        }
        Ok(())
    }

    fn watch(&self) -> Option<broadcast::Receiver<ChangeEvent>> {
        Some(self.changes.subscribe())
    }
}

// =============================================================================
// Blobs
// =============================================================================

const BLOB_CHUNK_SIZE: usize = 64 * 1024;

/// Uploaded object
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object storage kept in a `DashMap`
pub struct MemoryBlobStore {
    base_url: String,
    blobs: DashMap<String, StoredBlob>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blobs: DashMap::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<StoredBlob> {
        self.blobs.get(path).map(|b| b.clone())
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://blobs")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<mpsc::Sender<UploadProgress>>,
    ) -> StoreResult<String> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(StoreError::Rejected("empty object path".into()));
        }

        let total = bytes.len() as u64;
        if let Some(tx) = &progress {
            let mut transferred = 0u64;
            for chunk in bytes.chunks(BLOB_CHUNK_SIZE) {
                transferred += chunk.len() as u64;
                let _ = tx.send(UploadProgress { transferred, total }).await;
            }
            if bytes.is_empty() {
                let _ = tx.send(UploadProgress { transferred: 0, total: 0 }).await;
            }
        }

        self.blobs.insert(
            path.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{}/{}", self.base_url, path))
    }
}
