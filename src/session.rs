use std::fmt::Display;

use teloxide::dispatching::dialogue::{Dialogue, Storage};

use crate::error::{PlayError, SessionError, StorageError};
use crate::game::{GameState, Presentation, Resolution, RoundController};
use crate::quiz::{QuizId, QuizRecord};

/// What a chat keeps between updates. The controller owns `game_state`;
/// `quiz_id` remembers which quiz the next answer is checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub game_state: Option<GameState>,
    pub quiz_id: Option<QuizId>,
}

/// Result of checking an answer against the presented quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    pub quiz: QuizRecord,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// No quiz was presented, so there is nothing to check against.
    NothingPresented,
    /// The presented quiz left the catalog before it was answered. The round
    /// is dropped and the game is left as it was.
    QuizGone(QuizId),
    Checked(Checked),
}

/// Loads a chat's session, runs one controller operation on it and writes
/// it back before returning.
pub struct GameSession<S>
where
    S: ?Sized,
{
    dialogue: Dialogue<Session, S>,
}

impl<S> GameSession<S>
where
    S: ?Sized + Storage<Session> + Send + Sync + 'static,
    S::Error: Display,
{
    pub fn new(dialogue: Dialogue<Session, S>) -> Self {
        Self { dialogue }
    }

    pub async fn load(&self) -> Result<Session, SessionError> {
        self.dialogue
            .get_or_default()
            .await
            .map_err(|err| SessionError(err.to_string()))
    }

    async fn store(&self, session: Session) -> Result<(), SessionError> {
        self.dialogue
            .update(session)
            .await
            .map_err(|err| SessionError(err.to_string()))
    }

    pub async fn present_next_round(
        &self,
        controller: &RoundController,
    ) -> Result<Presentation, PlayError> {
        let mut session = self.load().await?;
        let mut state = session.game_state.take().unwrap_or_default();

        // nothing is written back if the pool can't be loaded
        let presentation = controller.present_next_round(&mut state).await?;

        session.quiz_id = match &presentation {
            Presentation::Round(round) => Some(round.quiz.id),
            Presentation::EmptyCatalog => None,
        };
        session.game_state = Some(state);
        self.store(session).await?;
        Ok(presentation)
    }

    /// Checks `answer` against the quiz presented last in this chat.
    pub async fn resolve_round(
        &self,
        controller: &RoundController,
        answer: &str,
    ) -> Result<Check, PlayError> {
        let mut session = self.load().await?;
        let Some(quiz_id) = session.quiz_id else {
            return Ok(Check::NothingPresented);
        };

        // any other storage failure leaves the session untouched
        let quiz = match controller.pool().catalog().find(quiz_id).await {
            Ok(quiz) => quiz,
            Err(StorageError::NotFound(_)) => {
                log::warn!(
                    "Chat {} answered quiz {}, which is no longer in the catalog",
                    self.dialogue.chat_id().0,
                    quiz_id
                );
                session.quiz_id = None;
                self.store(session).await?;
                return Ok(Check::QuizGone(quiz_id));
            }
            Err(err) => return Err(err.into()),
        };

        let mut state = match session.game_state.take() {
            Some(state) => state,
            None => {
                log::warn!(
                    "Chat {} answered quiz {} without a stored game, starting from defaults",
                    self.dialogue.chat_id().0,
                    quiz_id
                );
                GameState::default()
            }
        };
        let resolution = controller.resolve_round(&mut state, answer, &quiz.answer);

        session.game_state = Some(state);
        session.quiz_id = None;
        self.store(session).await?;
        Ok(Check::Checked(Checked { quiz, resolution }))
    }

    /// Current game, without touching it.
    pub async fn peek(&self) -> Result<GameState, SessionError> {
        Ok(self.load().await?.game_state.unwrap_or_default())
    }
}
