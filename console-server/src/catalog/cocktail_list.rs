//! Pending-change buffer for one category's cocktail list
//!
//! Same Clean / Dirty / Committing discipline as the category order, over the
//! `cocktails` id sequence of a single category document.

use parking_lot::Mutex;
use serde::Serialize;
use shared::error::ErrorCode;
use shared::ordering::array_move;
use shared::{AppError, AppResult};

use super::staging::{BufferState, CommitGuard, Staged};
use crate::db::repository::CategoryRepository;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CocktailListSnapshot {
    pub category_id: String,
    pub state: BufferState,
    pub dirty: bool,
    pub cocktails: Vec<String>,
}

pub struct CocktailListBuffer {
    category_id: String,
    repo: CategoryRepository,
    inner: Mutex<Staged<Vec<String>>>,
}

impl CocktailListBuffer {
    pub fn new(
        repo: CategoryRepository,
        category_id: impl Into<String>,
        cocktails: Vec<String>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            repo,
            inner: Mutex::new(Staged::new(cocktails)),
        }
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn snapshot(&self) -> CocktailListSnapshot {
        let inner = self.inner.lock();
        CocktailListSnapshot {
            category_id: self.category_id.clone(),
            state: inner.state(),
            dirty: inner.is_dirty(),
            cocktails: inner.working().clone(),
        }
    }

    pub fn state(&self) -> BufferState {
        self.inner.lock().state()
    }

    pub fn on_remote_update(&self, cocktails: Vec<String>) {
        self.inner.lock().on_remote_update(cocktails);
    }

    /// Append a cocktail. The caller checks that it exists and is validated.
    pub fn add(&self, cocktail_id: &str) -> AppResult<CocktailListSnapshot> {
        self.inner.lock().edit(|list: &mut Vec<String>| {
            if list.iter().any(|id| id == cocktail_id) {
                return Err(AppError::new(ErrorCode::CocktailAlreadyInCategory)
                    .with_detail("cocktail_id", cocktail_id)
                    .with_detail("category_id", self.category_id.as_str()));
            }
            list.push(cocktail_id.to_string());
            Ok(())
        })?;
        Ok(self.snapshot())
    }

    pub fn remove(&self, cocktail_id: &str) -> AppResult<CocktailListSnapshot> {
        self.inner.lock().edit(|list: &mut Vec<String>| {
            let index = list
                .iter()
                .position(|id| id == cocktail_id)
                .ok_or_else(|| AppError::cocktail_not_found(cocktail_id))?;
            list.remove(index);
            Ok::<_, AppError>(())
        })?;
        Ok(self.snapshot())
    }

    /// Move a cocktail to zero-based `index` with array-move semantics
    pub fn move_to(&self, cocktail_id: &str, index: usize) -> AppResult<CocktailListSnapshot> {
        self.inner.lock().edit(|list: &mut Vec<String>| {
            let from = list
                .iter()
                .position(|id| id == cocktail_id)
                .ok_or_else(|| AppError::cocktail_not_found(cocktail_id))?;
            if !array_move(list, from, index) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidPosition,
                    format!("Index {} is outside 0..{}", index, list.len()),
                )
                .with_detail("index", index)
                .with_detail("len", list.len()));
            }
            Ok(())
        })?;
        Ok(self.snapshot())
    }

    /// Persist the working list with a single document update.
    ///
    /// Returns the committed list length, `None` when there was nothing to commit.
    pub async fn commit(&self) -> AppResult<Option<usize>> {
        let Some((guard, _, working)) = CommitGuard::begin(&self.inner)? else {
            return Ok(None);
        };

        let result = self.repo.set_cocktails(&self.category_id, &working).await;
        guard.finish(result.is_ok());
        result?;

        tracing::info!(
            category_id = %self.category_id,
            cocktails = working.len(),
            "Cocktail list committed"
        );
        Ok(Some(working.len()))
    }

    pub fn cancel(&self) -> AppResult<CocktailListSnapshot> {
        self.inner.lock().cancel()?;
        Ok(self.snapshot())
    }
}
