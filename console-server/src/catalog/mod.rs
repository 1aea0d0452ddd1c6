//! 分类目录 - 排序缓冲区与提交
//!
//! # 模块结构
//!
//! - [`staging`] - Clean / Dirty / Committing 状态机
//! - [`buffer`] - 分类排序的待提交缓冲区
//! - [`cocktail_list`] - 分类内鸡尾酒列表的待提交缓冲区
//! - [`sessions`] - 按会话隔离的缓冲区
//! - [`service`] - 分类生命周期命令 ([`CatalogService`])
//! - [`refresh`] - 快照刷新后台任务

pub mod buffer;
pub mod cocktail_list;
pub mod refresh;
pub mod service;
pub mod sessions;
pub mod staging;

pub use buffer::{BufferSnapshot, CommitOutcome, PendingChangeBuffer};
pub use cocktail_list::{CocktailListBuffer, CocktailListSnapshot};
pub use service::{CatalogService, CategoryListView, CommitView, DeleteOutcome};
pub use sessions::{DEFAULT_SESSION, SessionBuffers};
pub use staging::{BufferState, Staged};
