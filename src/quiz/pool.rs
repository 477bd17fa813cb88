use std::sync::Arc;

use crate::error::StorageError;
use crate::quiz::catalog::QuizCatalog;
use crate::quiz::QuizSnapshot;

/// Turns the whole catalog into a fresh pool of snapshots.
#[derive(Clone)]
pub struct PoolLoader {
    catalog: Arc<dyn QuizCatalog>,
}

impl PoolLoader {
    pub fn new(catalog: Arc<dyn QuizCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<dyn QuizCatalog> {
        &self.catalog
    }

    pub async fn load_all(&self) -> Result<Vec<QuizSnapshot>, StorageError> {
        let records = self.catalog.list_all().await.map_err(|err| {
            log::error!("Failed to load the quiz pool: {}", err);
            err
        })?;

        let pool: Vec<QuizSnapshot> = records.into_iter().map(QuizSnapshot::from).collect();
        log::debug!("Loaded a pool of {} quizzes", pool.len());
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::catalog::JsonCatalog;
    use crate::quiz::QuizRecord;

    #[tokio::test]
    async fn pool_follows_storage_order() {
        let loader = PoolLoader::new(Arc::new(vec![
            QuizRecord::new(5, "Capital of Spain", "Madrid"),
            QuizRecord::new(3, "Capital of France", "Paris"),
        ]));
        let ids: Vec<_> = loader.load_all().await.unwrap().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![5, 3]);
    }

    #[tokio::test]
    async fn unreachable_storage_is_reported() {
        let loader = PoolLoader::new(Arc::new(JsonCatalog::new(
            std::env::temp_dir().join("quiz-pool-missing.json"),
        )));
        assert!(matches!(
            loader.load_all().await,
            Err(StorageError::Unavailable(_))
        ));
    }
}
