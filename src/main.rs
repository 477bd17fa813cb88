mod config;
mod error;
mod game;
mod quiz;
mod session;

use std::sync::Arc;

use config::Config;
use dotenv::dotenv;
use game::{Presentation, RoundController};
use quiz::{catalog::JsonCatalog, pool::PoolLoader, selector::ThreadRngSelector};
use session::{Check, Checked, GameSession, Session};
use teloxide::{
    dispatching::{
        dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
        UpdateHandler,
    },
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, ParseMode},
    utils::{command::BotCommands, html},
};

type QuizDialogue = Dialogue<Session, ErasedStorage<Session>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type SessionStorage = std::sync::Arc<ErasedStorage<Session>>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "show this text.")]
    Help,
    #[command(description = "show this text.")]
    Start,
    #[command(description = "play a random quiz.")]
    Random,
    #[command(description = "answer the current quiz.")]
    Check(String),
    #[command(description = "show your score.")]
    Score,
}

#[tokio::main]
async fn main() {
    // .env has to be loaded before the logger reads RUST_LOG
    let dotenv_loaded = dotenv().is_ok();
    pretty_env_logger::init();
    log::info!("Starting quiz roulette bot...");
    if !dotenv_loaded {
        log::debug!("No .env file found, using the process environment only");
    }

    let config = Config::from_env().expect("Invalid configuration");
    log::info!("Configuration loaded: {:?}", config);

    let bot = Bot::from_env();

    log::info!("Opening session storage at {}", config.session_db_path);
    let storage: SessionStorage = SqliteStorage::open(&config.session_db_path, Json)
        .await
        .expect("Failed to open the session storage")
        .erase();

    log::info!("Serving quizzes from {}", config.catalog_path.display());
    let catalog = Arc::new(JsonCatalog::new(config.catalog_path));
    let controller = RoundController::new(PoolLoader::new(catalog), Arc::new(ThreadRngSelector));

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register the command list: {}", err);
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![storage, controller])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .enter_dialogue::<Message, ErasedStorage<Session>, Session>()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::filter(|msg: Message| msg.text().is_some_and(looks_like_command)).endpoint(idle))
        .branch(dptree::filter(|session: Session| session.quiz_id.is_some()).endpoint(receive_answer))
        .branch(dptree::endpoint(idle))
}

/// Unknown commands end up here too; they are never taken as an answer.
fn looks_like_command(text: &str) -> bool {
    text.starts_with('/')
}

const PLAY_AGAIN: &str = "/random";

fn play_again_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(PLAY_AGAIN)]])
}

async fn handle_command(
    bot: Bot,
    dialogue: QuizDialogue,
    controller: RoundController,
    msg: Message,
    cmd: Command,
) -> HandlerResult {
    match cmd {
        Command::Help | Command::Start => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Random => present_round(bot, dialogue, controller, msg).await?,
        Command::Check(answer) => check_answer(bot, dialogue, controller, msg, answer).await?,
        Command::Score => {
            let state = GameSession::new(dialogue).peek().await?;
            bot.send_message(
                msg.chat.id,
                format!(
                    "Score: {}\nQuizzes left in this game: {}",
                    state.score,
                    state.remaining_quizzes.len()
                ),
            )
            .await?;
        }
    }
    Ok(())
}

async fn present_round(
    bot: Bot,
    dialogue: QuizDialogue,
    controller: RoundController,
    msg: Message,
) -> HandlerResult {
    let presentation = GameSession::new(dialogue)
        .present_next_round(&controller)
        .await?;

    match presentation {
        Presentation::Round(round) => {
            let text = format!(
                "<b>{}</b>\n\nScore: {}\n<tg-spoiler>Answer: {}</tg-spoiler>",
                html::escape(&round.quiz.question),
                round.score,
                html::escape(&round.quiz.answer)
            );
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Presentation::EmptyCatalog => {
            bot.send_message(msg.chat.id, "There are no quizzes yet, come back later!")
                .await?;
        }
    }
    Ok(())
}

async fn receive_answer(
    bot: Bot,
    dialogue: QuizDialogue,
    controller: RoundController,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(answer) => {
            let answer = answer.to_string();
            check_answer(bot, dialogue, controller, msg, answer).await
        }
        None => {
            bot.send_message(msg.chat.id, "Please answer with text")
                .await?;
            Ok(())
        }
    }
}

async fn check_answer(
    bot: Bot,
    dialogue: QuizDialogue,
    controller: RoundController,
    msg: Message,
    answer: String,
) -> HandlerResult {
    let checked = GameSession::new(dialogue)
        .resolve_round(&controller, &answer)
        .await?;

    let Checked { quiz, resolution } = match checked {
        Check::Checked(checked) => checked,
        Check::NothingPresented => {
            bot.send_message(msg.chat.id, "There is no quiz to answer. Send /random to get one!")
                .reply_markup(play_again_keyboard())
                .await?;
            return Ok(());
        }
        Check::QuizGone(_) => {
            bot.send_message(
                msg.chat.id,
                "That quiz has been removed in the meantime. Send /random for another one!",
            )
            .reply_markup(play_again_keyboard())
            .await?;
            return Ok(());
        }
    };

    if resolution.pool_cleared() {
        bot.send_message(
            msg.chat.id,
            format!(
                "You answered every quiz! Final score: {}\nSend /random to start over.",
                resolution.score
            ),
        )
        .reply_markup(play_again_keyboard())
        .await?;
        return Ok(());
    }

    let verdict = if resolution.correct {
        format!("Correct! \"{}\" is the answer.", html::escape(answer.trim()))
    } else {
        format!(
            "Wrong! The answer to <i>{}</i> is not \"{}\".",
            html::escape(&quiz.question),
            html::escape(answer.trim())
        )
    };
    bot.send_message(
        msg.chat.id,
        format!("{}\nScore: {}", verdict, resolution.score),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(play_again_keyboard())
    .await?;
    Ok(())
}

async fn idle(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Send /random to play a random quiz!")
        .reply_markup(play_again_keyboard())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_text_is_not_an_answer() {
        assert!(looks_like_command("/foo"));
        assert!(looks_like_command("/check@quiz_bot 4"));
        assert!(!looks_like_command("4"));
        assert!(!looks_like_command(" 1/2"));
    }
}
