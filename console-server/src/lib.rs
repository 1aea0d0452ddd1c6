//! Mixo Console Server - 鸡尾酒目录管理后台
//!
//! # 架构概述
//!
//! - **分类排序** (`catalog`): 按会话隔离的待提交缓冲区，提交时一次批量写入
//! - **存储** (`db`): 文档库 / 对象存储的仓储层，开发环境使用内存实现
//! - **翻译** (`translation`): 嵌套翻译树的分批翻译与补全
//! - **HTTP API** (`api`): 控制台前端使用的 RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! console-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── catalog/       # 排序缓冲区、鸡尾酒列表、分类命令
//! ├── translation/   # 翻译管道
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验、响应助手
//! └── db/            # 仓储层和内存存储
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod translation;
pub mod utils;

// Re-export 公共类型
pub use api::build_app;
pub use catalog::{CatalogService, PendingChangeBuffer};
pub use core::{Config, Server, ServerState};
pub use translation::TranslationPipeline;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __  ____
   /  |/  (_)  ______
  / /|_/ / / |/_/ __ \
 / /  / / />  </ /_/ /
/_/  /_/_/_/|_|\____/   console
    "#
    );
}
