//! REST document store adapter
//!
//! Wire layout:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | query     | `GET  /collections/{c}/documents?orderBy={field}` |
//! | get       | `GET  /collections/{c}/documents/{id}` |
//! | add       | `POST /collections/{c}/documents` |
//! | update    | `PATCH /collections/{c}/documents/{id}` |
//! | delete    | `DELETE /collections/{c}/documents/{id}` |
//! | batch     | `POST /batch` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::store::{Document, DocumentStore, StoreError, StoreResult, WriteOp};

use crate::{ClientConfig, ClientResult, HttpClient};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireDocument {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DocumentList {
    pub documents: Vec<WireDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Created {
    pub id: String,
}

/// One write of `POST /batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum WireWrite {
    Update {
        collection: String,
        id: String,
        data: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

impl From<WriteOp> for WireWrite {
    fn from(op: WriteOp) -> Self {
        match op {
            WriteOp::Update {
                collection,
                id,
                data,
            } => WireWrite::Update {
                collection,
                id,
                data,
            },
            WriteOp::Delete { collection, id } => WireWrite::Delete { collection, id },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRequest {
    pub writes: Vec<WireWrite>,
}

impl From<WireDocument> for Document {
    fn from(doc: WireDocument) -> Self {
        Document::new(doc.id, doc.data)
    }
}

/// [`DocumentStore`] over the REST document API
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    http: HttpClient,
}

impl HttpDocumentStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    fn documents_path(collection: &str) -> String {
        format!("collections/{}/documents", collection)
    }

    fn document_path(collection: &str, id: &str) -> String {
        format!("collections/{}/documents/{}", collection, id)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn query(&self, collection: &str, order_by: Option<&str>) -> StoreResult<Vec<Document>> {
        let mut path = Self::documents_path(collection);
        if let Some(field) = order_by {
            path.push_str("?orderBy=");
            path.push_str(field);
        }
        let list: DocumentList = self.http.get(&path).await?;
        Ok(list.documents.into_iter().map(Document::from).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let doc: Option<WireDocument> = self
            .http
            .get_optional(&Self::document_path(collection, id))
            .await?;
        Ok(doc.map(Document::from))
    }

    async fn add(&self, collection: &str, data: Value) -> StoreResult<String> {
        let created: Created = self.http.post(&Self::documents_path(collection), &data).await?;
        Ok(created.id)
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        self.http
            .patch(&Self::document_path(collection, id), &data)
            .await
            .map_err(|e| match e {
                crate::ClientError::NotFound(_) => StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                },
                other => other.into(),
            })
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.http
            .delete(&Self::document_path(collection, id))
            .await
            .map_err(Into::into)
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        let count = ops.len();
        let body = BatchRequest {
            writes: ops.into_iter().map(WireWrite::from).collect(),
        };
        let response = self
            .http
            .request(reqwest::Method::POST, "batch")
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        HttpClient::check_status(response).await.map_err(|e| {
            tracing::warn!(writes = count, error = %e, "Batch write failed");
            StoreError::Rejected(e.to_string())
        })?;
        tracing::debug!(writes = count, "Batch write committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_wire_format() {
        let body = BatchRequest {
            writes: vec![
                WriteOp::update("categories", "a", json!({"displayOrder": 2})).into(),
                WriteOp::delete("categories", "b").into(),
            ],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "writes": [
                    {
                        "op": "update",
                        "collection": "categories",
                        "id": "a",
                        "data": {"displayOrder": 2}
                    },
                    {"op": "delete", "collection": "categories", "id": "b"}
                ]
            })
        );
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            HttpDocumentStore::documents_path("cocktails"),
            "collections/cocktails/documents"
        );
        assert_eq!(
            HttpDocumentStore::document_path("categories", "x1"),
            "collections/categories/documents/x1"
        );
    }
}
