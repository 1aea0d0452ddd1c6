//! Buffers keyed by dashboard session
//!
//! Each browser tab gets its own pending-change buffers so one admin's unsaved
//! drag does not leak into another's view. Remote snapshots fan out to all of them.
//! Sessions left idle with nothing pending are evicted by [`SessionBuffers::evict_idle`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::RwLock;
use shared::models::Category;

use super::buffer::PendingChangeBuffer;
use super::cocktail_list::CocktailListBuffer;
use super::staging::BufferState;
use crate::db::repository::CategoryRepository;

/// Session used when a request carries no session header
pub const DEFAULT_SESSION: &str = "default";

pub struct SessionBuffers {
    repo: CategoryRepository,
    latest: RwLock<Vec<Category>>,
    orders: DashMap<String, Arc<PendingChangeBuffer>>,
    cocktail_lists: DashMap<(String, String), Arc<CocktailListBuffer>>,
    last_seen: DashMap<String, Instant>,
}

impl SessionBuffers {
    pub fn new(repo: CategoryRepository) -> Self {
        Self {
            repo,
            latest: RwLock::new(Vec::new()),
            orders: DashMap::new(),
            cocktail_lists: DashMap::new(),
            last_seen: DashMap::new(),
        }
    }

    /// Last snapshot received from the store
    pub fn latest(&self) -> Vec<Category> {
        self.latest.read().clone()
    }

    pub fn latest_category(&self, id: &str) -> Option<Category> {
        self.latest.read().iter().find(|c| c.id == id).cloned()
    }

    /// The session's order buffer, created from the latest snapshot on first use
    pub fn order_buffer(&self, session: &str) -> Arc<PendingChangeBuffer> {
        self.touch(session);
        self.orders
            .entry(session.to_string())
            .or_insert_with(|| {
                tracing::debug!(session, "Creating order buffer");
                Arc::new(PendingChangeBuffer::new(self.repo.clone(), self.latest()))
            })
            .clone()
    }

    /// The session's cocktail list buffer for `category`
    pub fn cocktail_buffer(&self, session: &str, category: &Category) -> Arc<CocktailListBuffer> {
        self.touch(session);
        self.cocktail_lists
            .entry((session.to_string(), category.id.clone()))
            .or_insert_with(|| {
                Arc::new(CocktailListBuffer::new(
                    self.repo.clone(),
                    category.id.clone(),
                    category.cocktails.clone(),
                ))
            })
            .clone()
    }

    /// Push a fresh store snapshot to every buffer
    pub fn broadcast(&self, snapshot: Vec<Category>) {
        *self.latest.write() = snapshot.clone();

        for entry in self.orders.iter() {
            entry.value().on_remote_update(snapshot.clone());
        }

        self.cocktail_lists.retain(|(_, category_id), buffer| {
            match snapshot.iter().find(|c| &c.id == category_id) {
                Some(category) => {
                    buffer.on_remote_update(category.cocktails.clone());
                    true
                }
                None => {
                    tracing::debug!(
                        category_id = %category_id,
                        "Dropping cocktail list of deleted category"
                    );
                    false
                }
            }
        });
    }

    pub fn session_count(&self) -> usize {
        self.last_seen.len()
    }

    fn touch(&self, session: &str) {
        self.last_seen.insert(session.to_string(), Instant::now());
    }

    /// Drop the buffers of sessions unused for at least `idle` that hold no local edits.
    ///
    /// Returns the number of evicted sessions.
    pub fn evict_idle(&self, idle: Duration) -> usize {
        let stale: Vec<String> = self
            .last_seen
            .iter()
            .filter(|entry| entry.value().elapsed() >= idle)
            .map(|entry| entry.key().clone())
            .collect();

        let mut evicted = 0;
        for session in stale {
            if self.has_pending_edits(&session) {
                continue;
            }
            // Skip sessions that came back since the scan
            if self
                .last_seen
                .remove_if(&session, |_, seen| seen.elapsed() >= idle)
                .is_none()
            {
                continue;
            }
            self.orders.remove(&session);
            self.cocktail_lists.retain(|(owner, _), _| owner != &session);
            evicted += 1;
        }

        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.last_seen.len(), "Evicted idle sessions");
        }
        evicted
    }

    fn has_pending_edits(&self, session: &str) -> bool {
        let order_pending = self
            .orders
            .get(session)
            .is_some_and(|buffer| buffer.state() != BufferState::Clean);
        order_pending
            || self.cocktail_lists.iter().any(|entry| {
                entry.key().0 == session && entry.value().state() != BufferState::Clean
            })
    }
}
