//! Pending-change buffer for the category order
//!
//! One buffer per dashboard session. Drag-and-drop edits are applied to the
//! working copy through the pure planners in `shared::ordering`; `commit` sends the
//! difference to the store as a single batch.

use parking_lot::Mutex;
use serde::Serialize;
use shared::models::Category;
use shared::ordering::{self, OrderingError};
use shared::AppResult;

use super::staging::{BufferState, CommitGuard, Staged};
use crate::db::repository::CategoryRepository;

/// What the list view renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferSnapshot {
    pub state: BufferState,
    pub dirty: bool,
    pub categories: Vec<Category>,
}

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    /// Documents written by the batch (0 when there was nothing to commit)
    pub written: usize,
}

pub struct PendingChangeBuffer {
    repo: CategoryRepository,
    inner: Mutex<Staged<Vec<Category>>>,
}

impl PendingChangeBuffer {
    pub fn new(repo: CategoryRepository, snapshot: Vec<Category>) -> Self {
        Self {
            repo,
            inner: Mutex::new(Staged::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        let inner = self.inner.lock();
        BufferSnapshot {
            state: inner.state(),
            dirty: inner.is_dirty(),
            categories: inner.working().clone(),
        }
    }

    pub fn state(&self) -> BufferState {
        self.inner.lock().state()
    }

    pub fn on_remote_update(&self, snapshot: Vec<Category>) {
        let replaced = self.inner.lock().on_remote_update(snapshot);
        if !replaced {
            tracing::debug!("Remote snapshot held back, local reorder pending");
        }
    }

    /// Move one category to `new_position` in the working copy.
    ///
    /// When `expected_from` is given it must match the entry's current position.
    pub fn apply_local_move(
        &self,
        category_id: &str,
        new_position: u32,
        expected_from: Option<u32>,
    ) -> AppResult<BufferSnapshot> {
        self.inner.lock().edit(|working: &mut Vec<Category>| {
            let current = working
                .iter()
                .find(|c| c.id == category_id)
                .map(|c| c.display_order)
                .ok_or_else(|| OrderingError::NotFound(category_id.to_string()))?;
            let old = expected_from.unwrap_or(current);
            let plan = ordering::plan_move(working, category_id, old, new_position)?;
            ordering::apply_plan(working, &plan.changes());
            Ok::<_, OrderingError>(())
        })?;
        tracing::debug!(category_id, position = new_position, "Local move applied");
        Ok(self.snapshot())
    }

    /// Replace the working order with a whole permutation of its ids
    pub fn apply_local_order(&self, ordered_ids: &[String]) -> AppResult<BufferSnapshot> {
        self.inner.lock().edit(|working: &mut Vec<Category>| {
            let changes = ordering::plan_reorder(working, ordered_ids)?;
            ordering::apply_plan(working, &changes);
            Ok::<_, OrderingError>(())
        })?;
        Ok(self.snapshot())
    }

    /// Write the working order to the store as one batch.
    ///
    /// A second call while a batch is in flight fails with `CommitInProgress` and
    /// issues no write. On failure the working copy is kept for a retry.
    pub async fn commit(&self) -> AppResult<CommitOutcome> {
        let Some((guard, synced, working)) = CommitGuard::begin(&self.inner)? else {
            return Ok(CommitOutcome { written: 0 });
        };

        let diff = ordering::diff_positions(&synced, &working);
        if !diff.unknown.is_empty() {
            tracing::warn!(
                unknown = ?diff.unknown,
                "Skipping categories missing from the synced snapshot"
            );
        }
        let written = diff.changes.len();
        let result = self.repo.batch(self.repo.order_writes(&diff.changes)).await;

        guard.finish(result.is_ok());
        match result {
            Ok(()) => {
                tracing::info!(changes = written, "Category order committed");
                Ok(CommitOutcome { written })
            }
            Err(e) => Err(e),
        }
    }

    pub fn cancel(&self) -> AppResult<BufferSnapshot> {
        self.inner.lock().cancel()?;
        Ok(self.snapshot())
    }
}
