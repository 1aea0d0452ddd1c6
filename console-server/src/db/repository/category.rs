//! Category Repository

use std::sync::Arc;

use serde_json::{Value, json};
use shared::models::Category;
use shared::ordering::OrderChange;
use shared::store::{CATEGORIES, DocumentStore, WriteOp};
use shared::util::now_millis;
use shared::{AppError, AppResult};

use super::{decode_all, patch};

#[derive(Clone)]
pub struct CategoryRepository {
    store: Arc<dyn DocumentStore>,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// All categories ordered by `displayOrder`
    pub async fn find_all(&self) -> AppResult<Vec<Category>> {
        let docs = self.store.query(CATEGORIES, Some("displayOrder")).await?;
        Ok(decode_all(CATEGORIES, docs))
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>> {
        match self.store.get(CATEGORIES, id).await? {
            Some(doc) => Ok(Some(doc.into_model()?)),
            None => Ok(None),
        }
    }

    /// Add a category document and return its id
    pub async fn add(&self, data: Value) -> AppResult<String> {
        Ok(self.store.add(CATEGORIES, data).await?)
    }

    /// One write per change, stamping `updatedAt`
    pub fn order_writes(&self, changes: &[OrderChange]) -> Vec<WriteOp> {
        let now = now_millis();
        changes
            .iter()
            .map(|c| {
                WriteOp::update(
                    CATEGORIES,
                    c.id.clone(),
                    patch([("displayOrder", json!(c.to)), ("updatedAt", json!(now))]),
                )
            })
            .collect()
    }

    pub fn update_write(&self, id: &str, data: Value) -> WriteOp {
        WriteOp::update(CATEGORIES, id, data)
    }

    pub fn delete_write(&self, id: &str) -> WriteOp {
        WriteOp::delete(CATEGORIES, id)
    }

    /// Commit writes as one batch; any failure is a commit failure
    pub async fn batch(&self, ops: Vec<WriteOp>) -> AppResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        let count = ops.len();
        self.store.batch_write(ops).await.map_err(|e| {
            tracing::error!(writes = count, error = %e, "Category batch commit failed");
            AppError::store_commit(e.to_string()).with_detail("writes", count)
        })?;
        tracing::debug!(writes = count, "Category batch committed");
        Ok(())
    }

    /// Replace a category's cocktail list
    pub async fn set_cocktails(&self, id: &str, cocktails: &[String]) -> AppResult<()> {
        let data = patch([
            ("cocktails", json!(cocktails)),
            ("updatedAt", json!(now_millis())),
        ]);
        self.store.update(CATEGORIES, id, data).await.map_err(|e| {
            tracing::error!(category_id = %id, error = %e, "Cocktail list commit failed");
            AppError::store_commit(e.to_string()).with_detail("category_id", id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use shared::ErrorCode;

    fn repo() -> (Arc<MemoryDocumentStore>, CategoryRepository) {
        let store = Arc::new(MemoryDocumentStore::new());
        store.insert(CATEGORIES, "a", json!({"title": "A", "displayOrder": 1}));
        store.insert(CATEGORIES, "b", json!({"title": "B", "displayOrder": 2}));
        store.insert(CATEGORIES, "broken", json!({"displayOrder": "x"}));
        (store.clone(), CategoryRepository::new(store))
    }

    #[tokio::test]
    async fn test_find_all_skips_malformed() {
        let (_, repo) = repo();
        let all = repo.find_all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_order_writes_commit() {
        let (_, repo) = repo();
        let ops = repo.order_writes(&[OrderChange::new("a", 1, 2), OrderChange::new("b", 2, 1)]);
        assert_eq!(ops.len(), 2);
        repo.batch(ops).await.unwrap();

        let a = repo.find_by_id("a").await.unwrap().unwrap();
        assert_eq!(a.display_order, 2);
        assert!(a.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_batch_failure_is_commit_error() {
        let (_, repo) = repo();
        let ops = repo.order_writes(&[OrderChange::new("ghost", 1, 2)]);
        let err = repo.batch(ops).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreCommitFailed);
    }

    #[tokio::test]
    async fn test_set_cocktails() {
        let (_, repo) = repo();
        repo.set_cocktails("a", &["x".into(), "y".into()]).await.unwrap();
        let a = repo.find_by_id("a").await.unwrap().unwrap();
        assert_eq!(a.cocktails, vec!["x", "y"]);

        let err = repo.set_cocktails("ghost", &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreCommitFailed);
    }
}
