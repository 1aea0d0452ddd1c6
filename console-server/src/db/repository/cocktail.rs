//! Cocktail Repository (read-only)

use std::sync::Arc;

use shared::AppResult;
use shared::models::Cocktail;
use shared::store::{COCKTAILS, DocumentStore};

use super::decode_all;

#[derive(Clone)]
pub struct CocktailRepository {
    store: Arc<dyn DocumentStore>,
}

impl CocktailRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Cocktail>> {
        match self.store.get(COCKTAILS, id).await? {
            Some(doc) => Ok(Some(doc.into_model()?)),
            None => Ok(None),
        }
    }

    /// Cocktails that passed moderation, newest first
    pub async fn find_validated(&self) -> AppResult<Vec<Cocktail>> {
        let docs = self.store.query(COCKTAILS, None).await?;
        let mut cocktails: Vec<Cocktail> = decode_all::<Cocktail>(COCKTAILS, docs)
            .into_iter()
            .filter(|c| c.validated)
            .collect();
        cocktails.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(cocktails)
    }
}
