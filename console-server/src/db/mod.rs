//! 数据访问层
//!
//! - [`memory`] - 开发环境使用的进程内文档库 / 对象存储
//! - [`repository`] - 基于 [`DocumentStore`](shared::store::DocumentStore) 的仓储

pub mod memory;
pub mod repository;

pub use memory::{MemoryBlobStore, MemoryDocumentStore};
