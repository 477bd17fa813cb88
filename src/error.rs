use thiserror::Error;

use crate::quiz::QuizId;

/// Failures of the quiz storage collaborator.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("the quiz catalog could not be read")]
    Unavailable(#[from] std::io::Error),
    #[error("the quiz catalog is malformed")]
    Malformed(#[from] serde_json::Error),
    #[error("there is no quiz with id={0}")]
    NotFound(QuizId),
    #[error("the quiz catalog lists id={0} more than once")]
    DuplicateId(QuizId),
}

/// The only failure the round controller lets through. Wrong answers,
/// exhausted pools and empty catalogs are ordinary outcomes.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("the quiz storage is unavailable")]
    StorageUnavailable(#[from] StorageError),
    #[error("selector drew index {index} from a pool of {pool_size}")]
    IndexOutOfRange { index: usize, pool_size: usize },
}

#[derive(Error, Debug)]
#[error("session store failed: {0}")]
pub struct SessionError(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    Empty(&'static str),
    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),
}

/// Everything that can fail while playing a round on behalf of a chat.
#[derive(Error, Debug)]
pub enum PlayError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
