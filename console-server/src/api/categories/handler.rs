//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::api::session::SessionId;
use crate::catalog::{CategoryListView, CocktailListSnapshot, CommitView, DeleteOutcome};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};
use shared::models::{
    Category, CategoryCreate, CategoryStats, CategoryUpdate, Cocktail, CocktailAdd, CocktailMove,
};

type Reply<T> = AppResult<Json<ApiResponse<T>>>;

/// Body of `POST /api/categories/{id}/move`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// 目标位置 (1 起)
    pub position: u32,
    /// 客户端看到的当前位置, 不一致时返回 StalePosition
    #[serde(default)]
    pub from: Option<u32>,
}

/// Body of `PUT /api/categories/order`
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub changed: usize,
}

/// GET /api/categories - 当前会话的工作副本
pub async fn list(State(state): State<ServerState>, session: SessionId) -> Reply<CategoryListView> {
    Ok(ok(state.catalog.list(session.as_str()).await?))
}

/// GET /api/categories/stats
pub async fn stats(State(state): State<ServerState>) -> Reply<CategoryStats> {
    Ok(ok(state.catalog.stats().await?))
}

/// GET /api/categories/:id - 最新快照中的分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    session: SessionId,
    Path(id): Path<String>,
) -> Reply<Category> {
    let view = state.catalog.list(session.as_str()).await?;
    let category = view
        .categories
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::category_not_found(&id))?;
    Ok(ok(category))
}

/// POST /api/categories - 创建分类 (可指定位置)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> Reply<Category> {
    let category = state.catalog.create_category(payload).await?;
    Ok(ok_with_message("Category created", category))
}

/// PUT /api/categories/:id - 更新分类 (包括位置变更)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> Reply<Category> {
    Ok(ok(state.catalog.update_category(&id, payload).await?))
}

/// DELETE /api/categories/:id - 删除分类并压缩序号
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Reply<DeleteOutcome> {
    let outcome = state.catalog.delete_category(&id).await?;
    Ok(ok_with_message("Category deleted", outcome))
}

/// POST /api/categories/normalize
pub async fn normalize(State(state): State<ServerState>) -> Reply<NormalizeResponse> {
    let changed = state.catalog.normalize_order().await?;
    Ok(ok(NormalizeResponse { changed }))
}

// ==================== Buffered reorder ====================

/// POST /api/categories/:id/move - 本地移动, 不写存储
pub async fn move_category(
    State(state): State<ServerState>,
    session: SessionId,
    Path(id): Path<String>,
    Json(payload): Json<MoveRequest>,
) -> Reply<CategoryListView> {
    let view = state
        .catalog
        .local_move(session.as_str(), &id, payload.position, payload.from)
        .await?;
    Ok(ok(view))
}

/// PUT /api/categories/order - 拖拽后的完整顺序
pub async fn reorder(
    State(state): State<ServerState>,
    session: SessionId,
    Json(payload): Json<OrderRequest>,
) -> Reply<CategoryListView> {
    Ok(ok(state.catalog.local_order(session.as_str(), &payload.ids).await?))
}

/// POST /api/categories/commit
pub async fn commit(State(state): State<ServerState>, session: SessionId) -> Reply<CommitView> {
    let view = state.catalog.commit(session.as_str()).await?;
    let message = format!("{} categories updated", view.written);
    Ok(ok_with_message(message, view))
}

/// POST /api/categories/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    session: SessionId,
) -> Reply<CategoryListView> {
    Ok(ok(state.catalog.cancel(session.as_str()).await?))
}

// ==================== Cocktail lists ====================

/// GET /api/categories/:id/cocktails
pub async fn list_cocktails(
    State(state): State<ServerState>,
    session: SessionId,
    Path(id): Path<String>,
) -> Reply<CocktailListSnapshot> {
    Ok(ok(state.catalog.cocktail_list(session.as_str(), &id).await?))
}

/// GET /api/categories/:id/cocktails/available
pub async fn available_cocktails(
    State(state): State<ServerState>,
    session: SessionId,
    Path(id): Path<String>,
) -> Reply<Vec<Cocktail>> {
    Ok(ok(state.catalog.available_cocktails(session.as_str(), &id).await?))
}

/// POST /api/categories/:id/cocktails
pub async fn add_cocktail(
    State(state): State<ServerState>,
    session: SessionId,
    Path(id): Path<String>,
    Json(payload): Json<CocktailAdd>,
) -> Reply<CocktailListSnapshot> {
    let snapshot = state
        .catalog
        .add_cocktail(session.as_str(), &id, &payload.cocktail_id)
        .await?;
    Ok(ok(snapshot))
}

/// DELETE /api/categories/:id/cocktails/:cocktail_id
pub async fn remove_cocktail(
    State(state): State<ServerState>,
    session: SessionId,
    Path((id, cocktail_id)): Path<(String, String)>,
) -> Reply<CocktailListSnapshot> {
    let snapshot = state
        .catalog
        .remove_cocktail(session.as_str(), &id, &cocktail_id)
        .await?;
    Ok(ok(snapshot))
}

/// POST /api/categories/:id/cocktails/:cocktail_id/move
pub async fn move_cocktail(
    State(state): State<ServerState>,
    session: SessionId,
    Path((id, cocktail_id)): Path<(String, String)>,
    Json(payload): Json<CocktailMove>,
) -> Reply<CocktailListSnapshot> {
    let snapshot = state
        .catalog
        .move_cocktail(session.as_str(), &id, &cocktail_id, payload.index)
        .await?;
    Ok(ok(snapshot))
}

/// POST /api/categories/:id/cocktails/commit
pub async fn commit_cocktails(
    State(state): State<ServerState>,
    session: SessionId,
    Path(id): Path<String>,
) -> Reply<CocktailListSnapshot> {
    Ok(ok(state.catalog.commit_cocktails(session.as_str(), &id).await?))
}

/// POST /api/categories/:id/cocktails/cancel
pub async fn cancel_cocktails(
    State(state): State<ServerState>,
    session: SessionId,
    Path(id): Path<String>,
) -> Reply<CocktailListSnapshot> {
    Ok(ok(state.catalog.cancel_cocktails(session.as_str(), &id).await?))
}
