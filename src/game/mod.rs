//! Random play: a pool of quizzes is worked through in random order, one round
//! at a time. A wrong answer, or clearing the pool, starts a new game on the
//! next round.
//!
//! The controller only ever sees a `GameState` value; loading and saving it is
//! the caller's job (see `crate::session`). Rounds of one session are assumed to
//! run one at a time. Two requests racing on the same session can lose a score
//! update or retire the wrong quiz, since the retired quiz is found by the index
//! drawn when it was presented.

use std::sync::Arc;

use crate::error::GameError;
use crate::quiz::pool::PoolLoader;
use crate::quiz::selector::RandomSelector;
use crate::quiz::{is_correct, QuizSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameState {
    pub score: u32,
    pub last_result: bool,
    pub remaining_quizzes: Vec<QuizSnapshot>,
    pub current_index: usize,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            // a fresh session counts as "keep going"
            last_result: true,
            remaining_quizzes: Vec::new(),
            current_index: 0,
        }
    }
}

impl GameState {
    fn needs_reset(&self) -> bool {
        !self.last_result || self.remaining_quizzes.is_empty()
    }

    /// The quiz drawn by the last presented round, if it is still in the pool.
    pub fn current_quiz(&self) -> Option<&QuizSnapshot> {
        self.remaining_quizzes.get(self.current_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub quiz: QuizSnapshot,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Round(Round),
    /// The catalog has no quizzes at all, so there is nothing to draw from.
    EmptyCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub correct: bool,
    pub score: u32,
    pub quizzes_remaining: usize,
}

impl Resolution {
    pub fn pool_cleared(&self) -> bool {
        self.quizzes_remaining == 0
    }
}

#[derive(Clone)]
pub struct RoundController {
    pool: PoolLoader,
    selector: Arc<dyn RandomSelector>,
}

impl RoundController {
    pub fn new(pool: PoolLoader, selector: Arc<dyn RandomSelector>) -> Self {
        Self { pool, selector }
    }

    pub fn pool(&self) -> &PoolLoader {
        &self.pool
    }

    /// Draws the next quiz, reloading the pool first when the last answer was
    /// wrong or the pool ran out. If the catalog can't be read, `state` is left
    /// exactly as it was.
    pub async fn present_next_round(&self, state: &mut GameState) -> Result<Presentation, GameError> {
        if state.needs_reset() {
            let pool = self.pool.load_all().await?;
            log::debug!(
                "Starting a new game (last answer correct: {}, pool was {} quizzes)",
                state.last_result,
                state.remaining_quizzes.len()
            );
            state.remaining_quizzes = pool;
            state.score = 0;
        }

        if state.remaining_quizzes.is_empty() {
            log::warn!("The quiz catalog is empty, nothing to play");
            return Ok(Presentation::EmptyCatalog);
        }

        let pool_size = state.remaining_quizzes.len();
        let index = self.selector.pick(pool_size);
        let Some(quiz) = state.remaining_quizzes.get(index).cloned() else {
            log::error!("Selector drew index {} from a pool of {}", index, pool_size);
            return Err(GameError::IndexOutOfRange { index, pool_size });
        };
        state.current_index = index;
        log::debug!("Drew quiz #{} of {}", index, pool_size);

        Ok(Presentation::Round(Round {
            quiz,
            score: state.score,
        }))
    }

    /// Scores `submitted` against `expected`. A correct answer retires the quiz
    /// at the index drawn by the last `present_next_round`; a wrong one wipes
    /// the score and leaves the pool alone.
    pub fn resolve_round(&self, state: &mut GameState, submitted: &str, expected: &str) -> Resolution {
        let correct = is_correct(submitted, expected);

        state.last_result = correct;
        if correct {
            state.score += 1;
            // an empty pool here means no round was ever presented
            if state.current_index < state.remaining_quizzes.len() {
                state.remaining_quizzes.remove(state.current_index);
            }
        } else {
            state.score = 0;
        }

        let resolution = Resolution {
            correct,
            score: state.score,
            quizzes_remaining: state.remaining_quizzes.len(),
        };
        log::debug!(
            "Resolved round: correct={} score={} remaining={}",
            resolution.correct,
            resolution.score,
            resolution.quizzes_remaining
        );
        resolution
    }
}
