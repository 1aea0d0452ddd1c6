use std::sync::Arc;
use std::time::{Duration, Instant};

use mixo_client::{ClientConfig, DeeplTranslator, HttpBlobStore, HttpDocumentStore};
use shared::store::{BlobStore, DocumentStore, Translator};

use crate::catalog::{CatalogService, refresh};
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result, StoreBackend};
use crate::db::repository::{CategoryRepository, CocktailRepository};
use crate::db::{MemoryBlobStore, MemoryDocumentStore};
use crate::translation::TranslationPipeline;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，可以直接作为 axum 的 `State`。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn DocumentStore> | 文档库 |
/// | blobs | Arc<dyn BlobStore> | 对象存储 |
/// | catalog | Arc<CatalogService> | 分类命令与会话缓冲区 |
/// | translation | Arc<TranslationPipeline> | 翻译管道 |
/// | started_at | Instant | 启动时间 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub catalog: Arc<CatalogService>,
    pub translation: Arc<TranslationPipeline>,
    pub started_at: Instant,
}

impl ServerState {
    /// 按配置创建外部协作方并组装状态
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;

        let backends: (Arc<dyn DocumentStore>, Arc<dyn BlobStore>) = match config.store_backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store with demo data, changes are lost on restart");
                (
                    Arc::new(MemoryDocumentStore::with_demo_data()),
                    Arc::new(MemoryBlobStore::default()),
                )
            }
            StoreBackend::Http => {
                let documents = ClientConfig::new(&config.document_store_url)
                    .with_optional_token(config.store_token.clone())
                    .with_timeout(config.request_timeout_ms);
                let objects = ClientConfig::new(&config.blob_store_url)
                    .with_optional_token(config.store_token.clone())
                    .with_timeout(config.request_timeout_ms);
                (
                    Arc::new(HttpDocumentStore::new(&documents)?),
                    Arc::new(HttpBlobStore::new(&objects)?),
                )
            }
        };

        let translator = DeeplTranslator::new(
            &config.deepl_api_url,
            config.deepl_api_key.clone(),
            config.request_timeout_ms,
        )?;
        if !translator.is_configured() {
            tracing::warn!("DEEPL_API_KEY not set, translations will fall back to source texts");
        }

        let (store, blobs) = backends;
        let state = Self::with_collaborators(config.clone(), store, blobs, Arc::new(translator));
        if let Err(e) = state.catalog.refresh().await {
            tracing::warn!(error = %e, "Initial category load failed, will retry on first request");
        }
        Ok(state)
    }

    /// 使用给定的协作方组装状态 (测试和嵌入使用)
    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let catalog = CatalogService::new(
            CategoryRepository::new(store.clone()),
            CocktailRepository::new(store.clone()),
        );
        let translation = TranslationPipeline::new(
            translator,
            config.translation_batch_size,
            Duration::from_millis(config.translation_batch_delay_ms),
        );
        Self {
            config,
            store,
            blobs,
            catalog: Arc::new(catalog),
            translation: Arc::new(translation),
            started_at: Instant::now(),
        }
    }

    /// 启动后台任务 (变更监听 + 定时刷新与闲置会话回收)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        refresh::register(
            &mut tasks,
            self.catalog.clone(),
            &self.store,
            Duration::from_secs(self.config.refresh_interval_secs.max(1)),
            Duration::from_secs(self.config.session_idle_secs),
        );
        tasks.log_summary();
        tasks
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
