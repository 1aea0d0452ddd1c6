//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`categories`] - 分类管理、排序缓冲区、鸡尾酒列表
//! - [`translations`] - 翻译接口
//! - [`upload`] - 分类图片上传
//! - [`session`] - `X-Console-Session` 会话识别

pub mod categories;
pub mod health;
pub mod session;
pub mod translations;
pub mod upload;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub use session::{SESSION_HEADER, SessionId};

/// 组装完整的应用路由
pub fn build_app(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(translations::router())
        .merge(upload::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
