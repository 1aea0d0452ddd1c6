//! Keeping session buffers in step with the store
//!
//! - Listener: follows the store's change feed when it has one
//! - Periodic: re-queries on a fixed interval for stores without a feed, then
//!   evicts sessions idle longer than `session_idle`

use std::sync::Arc;
use std::time::Duration;

use shared::store::{CATEGORIES, ChangeEvent, DocumentStore};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use super::service::CatalogService;
use crate::core::tasks::{BackgroundTasks, TaskKind};

/// Register the refresh tasks on `tasks`
pub fn register(
    tasks: &mut BackgroundTasks,
    catalog: Arc<CatalogService>,
    store: &Arc<dyn DocumentStore>,
    interval: Duration,
    session_idle: Duration,
) {
    if let Some(changes) = store.watch() {
        let token = tasks.shutdown_token();
        let catalog = catalog.clone();
        tasks.spawn(
            "category_change_listener",
            TaskKind::Listener,
            listen(catalog, changes, token),
        );
    }

    let token = tasks.shutdown_token();
    tasks.spawn(
        "category_snapshot_refresh",
        TaskKind::Periodic,
        refresh_periodically(catalog, interval, session_idle, token),
    );
}

fn is_category_change(event: &ChangeEvent) -> bool {
    event.collection == CATEGORIES
}

async fn listen(
    catalog: Arc<CatalogService>,
    mut changes: broadcast::Receiver<ChangeEvent>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            event = changes.recv() => match event {
                Ok(event) if is_category_change(&event) => refresh(&catalog).await,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Change feed lagged, refreshing");
                    refresh(&catalog).await;
                }
                Err(RecvError::Closed) => {
                    tracing::warn!("Store change feed closed");
                    token.cancelled().await;
                    break;
                }
            }
        }
    }
}

async fn refresh_periodically(
    catalog: Arc<CatalogService>,
    interval: Duration,
    session_idle: Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; startup already loaded a snapshot
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                refresh(&catalog).await;
                catalog.sessions().evict_idle(session_idle);
            }
        }
    }
}

async fn refresh(catalog: &CatalogService) {
    match catalog.refresh().await {
        Ok(list) => tracing::trace!(count = list.len(), "Category snapshot refreshed"),
        Err(e) => tracing::warn!(error = %e, "Category snapshot refresh failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use crate::db::repository::{CategoryRepository, CocktailRepository};
    use serde_json::json;

    #[tokio::test]
    async fn test_listener_pushes_store_changes() {
        let memory = Arc::new(MemoryDocumentStore::new());
        memory.insert(CATEGORIES, "a", json!({"title": "A", "displayOrder": 1}));
        let store: Arc<dyn DocumentStore> = memory.clone();
        let catalog = Arc::new(CatalogService::new(
            CategoryRepository::new(store.clone()),
            CocktailRepository::new(store.clone()),
        ));
        catalog.refresh().await.unwrap();

        let mut tasks = BackgroundTasks::new();
        let hour = Duration::from_secs(3600);
        register(&mut tasks, catalog.clone(), &store, hour, hour);
        assert_eq!(tasks.count_by_kind(), (1, 1));

        store
            .add(CATEGORIES, json!({"title": "B", "displayOrder": 2}))
            .await
            .unwrap();

        let mut seen = 0;
        for _ in 0..50 {
            seen = catalog.sessions().latest().len();
            if seen == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(seen, 2);

        tasks.shutdown().await;
    }

    #[tokio::test]
    async fn test_periodic_refresh_evicts_idle_sessions() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let catalog = Arc::new(CatalogService::new(
            CategoryRepository::new(store.clone()),
            CocktailRepository::new(store.clone()),
        ));
        catalog.sessions().order_buffer("tab-1");
        assert_eq!(catalog.sessions().session_count(), 1);

        let token = CancellationToken::new();
        let task = tokio::spawn(refresh_periodically(
            catalog.clone(),
            Duration::from_millis(5),
            Duration::ZERO,
            token.clone(),
        ));

        let mut remaining = 1;
        for _ in 0..50 {
            remaining = catalog.sessions().session_count();
            if remaining == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(remaining, 0);

        token.cancel();
        task.await.unwrap();
    }
}
