use std::collections::HashSet;
use std::path::PathBuf;

use futures::future::{BoxFuture, FutureExt};

use crate::error::StorageError;
use crate::quiz::{QuizId, QuizRecord};

/// Read access to the stored quizzes.
pub trait QuizCatalog: Send + Sync {
    /// Every quiz, in storage order.
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<QuizRecord>, StorageError>>;

    fn find(&self, id: QuizId) -> BoxFuture<'_, Result<QuizRecord, StorageError>> {
        async move {
            self.list_all()
                .await?
                .into_iter()
                .find(|quiz| quiz.id == id)
                .ok_or(StorageError::NotFound(id))
        }
        .boxed()
    }
}

/// Catalog kept in a JSON file holding an array of `{id, question, answer}`.
/// The file is read on every call, so edits show up at the next pool reload.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuizCatalog for JsonCatalog {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<QuizRecord>, StorageError>> {
        async move {
            let bytes = tokio::fs::read(&self.path).await?;
            let quizzes: Vec<QuizRecord> = serde_json::from_slice(&bytes)?;
            ensure_unique_ids(&quizzes)?;
            Ok(quizzes)
        }
        .boxed()
    }
}

/// Ids are the catalog's primary key, a file repeating one is rejected whole.
fn ensure_unique_ids(quizzes: &[QuizRecord]) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(quizzes.len());
    match quizzes.iter().find(|quiz| !seen.insert(quiz.id)) {
        Some(quiz) => Err(StorageError::DuplicateId(quiz.id)),
        None => Ok(()),
    }
}

impl QuizCatalog for Vec<QuizRecord> {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<QuizRecord>, StorageError>> {
        futures::future::ready(Ok(self.clone())).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn json_catalog_keeps_file_order() {
        let path = fixture(
            "catalog-order",
            r#"[{"id":2,"question":"3+3","answer":"6"},{"id":1,"question":"2+2","answer":"4"}]"#,
        );
        let quizzes = JsonCatalog::new(&path).list_all().await.unwrap();
        assert_eq!(
            quizzes,
            vec![QuizRecord::new(2, "3+3", "6"), QuizRecord::new(1, "2+2", "4")]
        );
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let catalog = JsonCatalog::new(std::env::temp_dir().join("no-such-quiz-catalog.json"));
        let result = catalog.list_all().await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn garbage_file_is_malformed() {
        let path = fixture("catalog-garbage", "{ not json");
        let result = JsonCatalog::new(&path).list_all().await;
        assert!(matches!(result, Err(StorageError::Malformed(_))));
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn repeated_id_is_rejected() {
        let path = fixture(
            "catalog-duplicate",
            r#"[{"id":1,"question":"2+2","answer":"x"},{"id":2,"question":"3+3","answer":"6"},{"id":1,"question":"2+2","answer":"y"}]"#,
        );
        let catalog = JsonCatalog::new(&path);
        assert!(matches!(
            catalog.list_all().await,
            Err(StorageError::DuplicateId(1))
        ));
        assert!(matches!(catalog.find(2).await, Err(StorageError::DuplicateId(1))));
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn find_by_id() {
        let catalog = vec![QuizRecord::new(1, "2+2", "4"), QuizRecord::new(2, "3+3", "6")];
        assert_eq!(catalog.find(2).await.unwrap().answer, "6");
        assert!(matches!(catalog.find(9).await, Err(StorageError::NotFound(9))));
    }
}
