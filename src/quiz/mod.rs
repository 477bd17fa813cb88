pub mod catalog;
pub mod pool;
pub mod selector;

pub type QuizId = i64;

/// A quiz as the storage collaborator hands it out.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizRecord {
    pub id: QuizId,
    pub question: String,
    pub answer: String,
}

impl QuizRecord {
    pub fn new(id: QuizId, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Copy of a quiz taken when the pool is loaded. Later edits to the catalog
/// don't reach a pool that is already in play.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizSnapshot {
    pub id: QuizId,
    pub question: String,
    pub answer: String,
}

impl From<QuizRecord> for QuizSnapshot {
    fn from(record: QuizRecord) -> Self {
        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
        }
    }
}

/// Lower-cases and trims surrounding whitespace. Nothing else: no accent
/// folding, inner whitespace is kept as is.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

pub fn is_correct(submitted: &str, expected: &str) -> bool {
    normalize_answer(submitted) == normalize_answer(expected)
}
