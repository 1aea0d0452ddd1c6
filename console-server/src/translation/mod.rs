//! 翻译管道
//!
//! - [`languages`] - 支持的目标语言
//! - [`tree`] - 嵌套 JSON 翻译树的遍历与合并
//! - [`pipeline`] - 分批调用翻译服务 ([`TranslationPipeline`])

pub mod languages;
pub mod pipeline;
pub mod tree;

pub use languages::{SUPPORTED_LANGUAGES, validate_language};
pub use pipeline::TranslationPipeline;
