//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/health | GET | 简单健康检查 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "uptime_seconds": 42,
//!   "store": "memory",
//!   "categories_loaded": 3
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy)
    status: &'static str,
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    /// 存储后端
    store: String,
    /// 当前快照中的分类数
    categories_loaded: usize,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime().as_secs(),
        store: state.config.store_backend.to_string(),
        categories_loaded: state.catalog.sessions().latest().len(),
    })
}
