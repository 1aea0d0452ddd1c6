//! Category API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/categories | GET, POST | 会话工作副本 / 创建 |
//! | /api/categories/order | PUT | 整体拖拽排序 (本地) |
//! | /api/categories/commit | POST | 提交排序 |
//! | /api/categories/cancel | POST | 放弃排序 |
//! | /api/categories/normalize | POST | 修复不连续序号 |
//! | /api/categories/{id} | GET, PUT, DELETE | 单个分类 |
//! | /api/categories/{id}/move | POST | 单项移动 (本地) |
//! | /api/categories/{id}/cocktails | GET, POST | 鸡尾酒列表 / 追加 |
//! | /api/categories/{id}/cocktails/available | GET | 可追加的鸡尾酒 |
//! | /api/categories/{id}/cocktails/commit | POST | 提交列表 |
//! | /api/categories/{id}/cocktails/cancel | POST | 放弃列表修改 |
//! | /api/categories/{id}/cocktails/{cocktail_id} | DELETE | 移除 |
//! | /api/categories/{id}/cocktails/{cocktail_id}/move | POST | 调整位置 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Buffer operations (must be before /{id} to avoid path conflicts)
        .route("/order", put(handler::reorder))
        .route("/commit", post(handler::commit))
        .route("/cancel", post(handler::cancel))
        .route("/normalize", post(handler::normalize))
        .route("/stats", get(handler::stats))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/move", post(handler::move_category))
        // Cocktail list routes
        .route(
            "/{id}/cocktails",
            get(handler::list_cocktails).post(handler::add_cocktail),
        )
        .route("/{id}/cocktails/available", get(handler::available_cocktails))
        .route("/{id}/cocktails/commit", post(handler::commit_cocktails))
        .route("/{id}/cocktails/cancel", post(handler::cancel_cocktails))
        .route("/{id}/cocktails/{cocktail_id}", delete(handler::remove_cocktail))
        .route("/{id}/cocktails/{cocktail_id}/move", post(handler::move_cocktail))
}
