//! Category lifecycle commands and buffer glue
//!
//! Direct commands (create / update / delete / normalize) plan against the
//! authoritative list, write one batch and then push the re-queried list to all
//! session buffers. Drag-and-drop edits go through the per-session buffers and
//! reach the store only on commit.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::{Map, Value, json};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryStats, CategoryUpdate, Cocktail};
use shared::ordering::{self, OrderChange};
use shared::store::Document;
use shared::util::now_millis;
use shared::{AppError, AppResult};

use super::buffer::{BufferSnapshot, CommitOutcome};
use super::cocktail_list::CocktailListSnapshot;
use super::sessions::SessionBuffers;
use super::staging::BufferState;
use crate::db::repository::{CategoryRepository, CocktailRepository};
use crate::utils::validation::{
    MAX_TITLE_LEN, MAX_URL_LEN, validate_color_code, validate_optional_text,
    validate_required_text,
};

/// `GET /api/categories` payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListView {
    pub state: BufferState,
    pub dirty: bool,
    /// Whether the working copy is a dense `1..=N` sequence
    pub dense: bool,
    pub stats: CategoryStats,
    pub categories: Vec<Category>,
}

impl From<BufferSnapshot> for CategoryListView {
    fn from(snapshot: BufferSnapshot) -> Self {
        Self {
            state: snapshot.state,
            dirty: snapshot.dirty,
            dense: ordering::is_dense(&snapshot.categories),
            stats: CategoryStats::from_categories(&snapshot.categories),
            categories: snapshot.categories,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitView {
    pub written: usize,
    #[serde(flatten)]
    pub list: CategoryListView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub id: String,
    /// Siblings moved down to close the gap
    pub shifted: usize,
}

pub struct CatalogService {
    categories: CategoryRepository,
    cocktails: CocktailRepository,
    sessions: SessionBuffers,
    loaded: AtomicBool,
}

impl CatalogService {
    pub fn new(categories: CategoryRepository, cocktails: CocktailRepository) -> Self {
        Self {
            sessions: SessionBuffers::new(categories.clone()),
            categories,
            cocktails,
            loaded: AtomicBool::new(false),
        }
    }

    pub fn sessions(&self) -> &SessionBuffers {
        &self.sessions
    }

    // ==================== Snapshots ====================

    /// Re-query the store and push the list to every session buffer
    pub async fn refresh(&self) -> AppResult<Vec<Category>> {
        let list = self.categories.find_all().await?;
        if !ordering::is_dense(&list) {
            tracing::warn!(count = list.len(), "Persisted display order is not dense");
        }
        self.sessions.broadcast(list.clone());
        self.loaded.store(true, Ordering::Release);
        Ok(list)
    }

    /// Refresh after a write that already succeeded; failures are only logged
    async fn refresh_after_write(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(
                error = %e,
                "Refresh after write failed, buffers keep the previous snapshot"
            );
        }
    }

    async fn ensure_loaded(&self) -> AppResult<()> {
        if !self.loaded.load(Ordering::Acquire) {
            self.refresh().await?;
        }
        Ok(())
    }

    pub async fn list(&self, session: &str) -> AppResult<CategoryListView> {
        self.ensure_loaded().await?;
        Ok(self.sessions.order_buffer(session).snapshot().into())
    }

    pub async fn stats(&self) -> AppResult<CategoryStats> {
        self.ensure_loaded().await?;
        Ok(CategoryStats::from_categories(&self.sessions.latest()))
    }

    // ==================== Direct commands ====================

    /// Create a category at `displayOrder` (append when absent), shifting the siblings
    /// at or after it.
    ///
    /// Shifts are written first; if adding the document then fails they are reverted.
    pub async fn create_category(&self, input: CategoryCreate) -> AppResult<Category> {
        let title = input.title.trim().to_string();
        validate_required_text(&title, "title", MAX_TITLE_LEN)?;
        let color_code = input.color_code.unwrap_or_default();
        validate_color_code(&color_code)?;
        validate_optional_text(&input.image_url, "imageUrl", MAX_URL_LEN)?;

        let existing = self.categories.find_all().await?;
        let target = input
            .display_order
            .unwrap_or_else(|| ordering::next_position(&existing));
        let plan = ordering::plan_insert(&existing, target)?;

        let now = now_millis();
        let mut data = json!({
            "title": title,
            "displayOrder": plan.position,
            "visible": input.visible.unwrap_or(true),
            "colorCode": color_code,
            "cocktails": input.cocktails,
            "createdAt": now,
            "updatedAt": now,
        });
        if let Some(url) = input.image_url.filter(|u| !u.trim().is_empty()) {
            data["imageUrl"] = json!(url);
        }

        self.categories
            .batch(self.categories.order_writes(&plan.shifts))
            .await?;

        let id = match self.categories.add(data.clone()).await {
            Ok(id) => id,
            Err(e) => {
                self.revert_shifts(&plan.shifts).await;
                return Err(e);
            }
        };

        tracing::info!(
            category_id = %id,
            position = plan.position,
            shifted = plan.shifts.len(),
            "Category created"
        );
        self.refresh_after_write().await;
        Ok(Document::new(id, data).into_model()?)
    }

    async fn revert_shifts(&self, shifts: &[OrderChange]) {
        if shifts.is_empty() {
            return;
        }
        let reverted: Vec<OrderChange> = shifts.iter().map(OrderChange::reversed).collect();
        match self.categories.batch(self.categories.order_writes(&reverted)).await {
            Ok(()) => tracing::warn!(
                shifts = reverted.len(),
                "Reverted insert shifts after failed create"
            ),
            Err(e) => tracing::error!(
                error = %e,
                "Could not revert insert shifts, display order needs normalizing"
            ),
        }
    }

    /// Edit fields; a new `displayOrder` moves the category with the same shifts as a drag
    pub async fn update_category(&self, id: &str, input: CategoryUpdate) -> AppResult<Category> {
        if let Some(title) = &input.title {
            validate_required_text(title.trim(), "title", MAX_TITLE_LEN)?;
        }
        if let Some(code) = &input.color_code {
            validate_color_code(code)?;
        }
        validate_optional_text(&input.image_url, "imageUrl", MAX_URL_LEN)?;

        let existing = self.categories.find_all().await?;
        let current = existing
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::category_not_found(id))?;

        let mut fields = Map::new();
        if let Some(title) = input.title {
            fields.insert("title".into(), json!(title.trim()));
        }
        if let Some(visible) = input.visible {
            fields.insert("visible".into(), json!(visible));
        }
        if let Some(code) = input.color_code {
            fields.insert("colorCode".into(), json!(code));
        }
        if let Some(url) = input.image_url {
            fields.insert("imageUrl".into(), json!(url));
        }

        let mut ops = Vec::new();
        if let Some(position) = input.display_order
            && position != current.display_order
        {
            let plan = ordering::plan_move(&existing, id, current.display_order, position)?;
            ops.extend(self.categories.order_writes(&plan.shifts));
            fields.insert("displayOrder".into(), json!(position));
            tracing::debug!(
                category_id = %id,
                from = current.display_order,
                to = position,
                shifted = plan.shifts.len(),
                "Position change planned"
            );
        }

        if fields.is_empty() {
            return Ok(current);
        }
        fields.insert("updatedAt".into(), json!(now_millis()));
        ops.push(self.categories.update_write(id, Value::Object(fields)));

        self.categories.batch(ops).await?;
        tracing::info!(category_id = %id, "Category updated");

        self.refresh_after_write().await;
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))
    }

    /// Delete a category and close the gap in one batch
    pub async fn delete_category(&self, id: &str) -> AppResult<DeleteOutcome> {
        let existing = self.categories.find_all().await?;
        let plan = ordering::plan_delete(&existing, id)?;

        let mut ops = vec![self.categories.delete_write(id)];
        ops.extend(self.categories.order_writes(&plan.shifts));
        self.categories.batch(ops).await?;

        tracing::info!(
            category_id = %id,
            position = plan.position,
            shifted = plan.shifts.len(),
            "Category deleted"
        );
        self.refresh_after_write().await;
        Ok(DeleteOutcome {
            id: plan.id,
            shifted: plan.shifts.len(),
        })
    }

    /// Repair gaps and duplicates in the persisted order. Returns the number of rewritten entries.
    pub async fn normalize_order(&self) -> AppResult<usize> {
        let existing = self.categories.find_all().await?;
        let changes = ordering::plan_normalize(&existing);
        if changes.is_empty() {
            return Ok(0);
        }
        self.categories
            .batch(self.categories.order_writes(&changes))
            .await?;
        tracing::info!(changes = changes.len(), "Display order normalized");
        self.refresh_after_write().await;
        Ok(changes.len())
    }

    // ==================== Buffered reorder ====================

    pub async fn local_move(
        &self,
        session: &str,
        category_id: &str,
        position: u32,
        expected_from: Option<u32>,
    ) -> AppResult<CategoryListView> {
        self.ensure_loaded().await?;
        let snapshot = self
            .sessions
            .order_buffer(session)
            .apply_local_move(category_id, position, expected_from)?;
        Ok(snapshot.into())
    }

    pub async fn local_order(
        &self,
        session: &str,
        ordered_ids: &[String],
    ) -> AppResult<CategoryListView> {
        self.ensure_loaded().await?;
        let snapshot = self
            .sessions
            .order_buffer(session)
            .apply_local_order(ordered_ids)?;
        Ok(snapshot.into())
    }

    pub async fn commit(&self, session: &str) -> AppResult<CommitView> {
        self.ensure_loaded().await?;
        let buffer = self.sessions.order_buffer(session);
        let CommitOutcome { written } = buffer.commit().await?;
        if written > 0 {
            self.refresh_after_write().await;
        }
        Ok(CommitView {
            written,
            list: buffer.snapshot().into(),
        })
    }

    pub async fn cancel(&self, session: &str) -> AppResult<CategoryListView> {
        self.ensure_loaded().await?;
        Ok(self.sessions.order_buffer(session).cancel()?.into())
    }

    // ==================== Cocktail lists ====================

    async fn category(&self, id: &str) -> AppResult<Category> {
        self.ensure_loaded().await?;
        if let Some(category) = self.sessions.latest_category(id) {
            return Ok(category);
        }
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))
    }

    pub async fn cocktail_list(
        &self,
        session: &str,
        category_id: &str,
    ) -> AppResult<CocktailListSnapshot> {
        let category = self.category(category_id).await?;
        Ok(self.sessions.cocktail_buffer(session, &category).snapshot())
    }

    /// Validated cocktails not yet in the session's working list
    pub async fn available_cocktails(
        &self,
        session: &str,
        category_id: &str,
    ) -> AppResult<Vec<Cocktail>> {
        let listed = self.cocktail_list(session, category_id).await?.cocktails;
        let all = self.cocktails.find_validated().await?;
        Ok(all.into_iter().filter(|c| !listed.contains(&c.id)).collect())
    }

    pub async fn add_cocktail(
        &self,
        session: &str,
        category_id: &str,
        cocktail_id: &str,
    ) -> AppResult<CocktailListSnapshot> {
        let category = self.category(category_id).await?;
        let cocktail = self
            .cocktails
            .find_by_id(cocktail_id)
            .await?
            .ok_or_else(|| AppError::cocktail_not_found(cocktail_id))?;
        if !cocktail.validated {
            return Err(AppError::new(ErrorCode::CocktailNotValidated)
                .with_detail("cocktail_id", cocktail_id));
        }
        self.sessions.cocktail_buffer(session, &category).add(cocktail_id)
    }

    pub async fn remove_cocktail(
        &self,
        session: &str,
        category_id: &str,
        cocktail_id: &str,
    ) -> AppResult<CocktailListSnapshot> {
        let category = self.category(category_id).await?;
        self.sessions.cocktail_buffer(session, &category).remove(cocktail_id)
    }

    pub async fn move_cocktail(
        &self,
        session: &str,
        category_id: &str,
        cocktail_id: &str,
        index: usize,
    ) -> AppResult<CocktailListSnapshot> {
        let category = self.category(category_id).await?;
        self.sessions
            .cocktail_buffer(session, &category)
            .move_to(cocktail_id, index)
    }

    pub async fn commit_cocktails(
        &self,
        session: &str,
        category_id: &str,
    ) -> AppResult<CocktailListSnapshot> {
        let category = self.category(category_id).await?;
        let buffer = self.sessions.cocktail_buffer(session, &category);
        if buffer.commit().await?.is_some() {
            self.refresh_after_write().await;
        }
        Ok(buffer.snapshot())
    }

    pub async fn cancel_cocktails(
        &self,
        session: &str,
        category_id: &str,
    ) -> AppResult<CocktailListSnapshot> {
        let category = self.category(category_id).await?;
        self.sessions.cocktail_buffer(session, &category).cancel()
    }
}
