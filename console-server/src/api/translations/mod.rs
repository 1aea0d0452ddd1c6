//! Translation API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/translations/languages | GET | 支持的目标语言 |
//! | /api/translations/skeleton | GET | 新语言的基础结构 |
//! | /api/translations/translate | POST | 翻译 / 补全翻译树 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/translations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/languages", get(handler::languages))
        .route("/skeleton", get(handler::skeleton))
        .route("/translate", post(handler::translate))
}
