//! # trivia-quiz
//!
//! A terminal trivia quiz backed by the Open Trivia Database.
//!
//! Log in with any username and password, answer ten multiple-choice
//! questions against a five minute countdown, and see your score. The user
//! and the quiz in progress are saved after every change, so quitting and
//! relaunching resumes where you left off.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_quiz::{Config, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::resolve(None, None, None, false)?;
//!     trivia_quiz::run(&config).await
//! }
//! ```
//!
//! The session logic is usable without a terminal:
//!
//! ```rust
//! use trivia_quiz::{ManualTicker, MemoryStorage, Screen, SessionStore};
//!
//! let mut store = SessionStore::new(MemoryStorage::new(), ManualTicker::new());
//! store.login("alice", "pw").unwrap();
//! assert_eq!(store.screen(), Screen::Home);
//! ```

mod app;
mod config;
mod data;
mod engine;
mod error;
mod models;
mod store;
pub mod terminal;
mod timer;
mod ui;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc;

pub use app::{App, Command, LoginField, LoginForm, View};
pub use config::{default_data_dir, Config, DEFAULT_LOG_LEVEL, LOG_ENV};
pub use data::{
    check_questions, decode_entities, load_json, FetchError, FileStorage, MemoryStorage,
    OpenTriviaClient, RawQuestion, Storage, StorageError, TriviaResponse, TriviaSource,
    DEFAULT_ENDPOINT,
};
pub use engine::{build_question, build_questions, compute_summary, shuffle_answers, Grade, Summary};
pub use error::QuizError;
pub use models::{
    format_seconds, Answer, Difficulty, Question, QuizSession, Screen, SessionInvariantError, User,
    ANSWER_COUNT, QUESTION_COUNT, TIME_LIMIT_SECS,
};
pub use store::{
    AnswerOutcome, EndReason, FetchRequest, LoginError, SessionError, SessionStore, Snapshot,
    EMPTY_CREDENTIALS_MESSAGE, FETCH_FAILED_MESSAGE, QUIZ_STATE_KEY, USER_KEY,
};
pub use timer::{IntervalTicker, ManualTicker, Tick, Ticker, TICK_PERIOD};

type FetchResult = (FetchRequest, Result<Vec<RawQuestion>, FetchError>);

/// Run the quiz in the terminal until the user quits.
///
/// Saved state lives in `config.data_dir` unless `config.ephemeral` is set.
pub async fn run(config: &Config) -> Result<(), QuizError> {
    let client = OpenTriviaClient::new(config.endpoint.clone());

    if config.ephemeral {
        run_with_storage(MemoryStorage::new(), client).await
    } else {
        run_with_storage(FileStorage::new(&config.data_dir), client).await
    }
}

async fn run_with_storage<S: Storage>(storage: S, client: OpenTriviaClient) -> Result<(), QuizError> {
    let (ticker, ticks) = IntervalTicker::new(TICK_PERIOD);
    tracing::debug!(endpoint = client.endpoint(), "trivia source");
    let store = SessionStore::restore(storage, ticker);
    let mut app = App::new(store);

    let mut session = terminal::TerminalSession::enter()?;
    let result = run_event_loop(session.terminal(), &mut app, ticks, client).await;
    drop(session);

    tracing::info!(screen = ?app.store().screen(), "exiting");
    result
}

/// Applies one event at a time: key presses, countdown ticks and fetch results.
async fn run_event_loop<S: Storage>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<S, IntervalTicker>,
    mut ticks: mpsc::UnboundedReceiver<Tick>,
    client: OpenTriviaClient,
) -> Result<(), QuizError> {
    let mut events = EventStream::new();
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchResult>();

    loop {
        terminal.draw(|frame| ui::render(frame, &app.view()))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.handle_key(key) {
                        Command::Quit => break,
                        Command::Fetch(request) => {
                            spawn_fetch(client.clone(), request, fetch_tx.clone());
                        }
                        Command::None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(Tick) = ticks.recv() => app.on_tick(),
            Some((request, result)) = fetch_rx.recv() => app.on_fetch(request, result),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn spawn_fetch(
    client: OpenTriviaClient,
    request: FetchRequest,
    results: mpsc::UnboundedSender<FetchResult>,
) {
    tokio::spawn(async move {
        let result = client.fetch(QUESTION_COUNT).await;
        // The loop may already be gone if the user quit while loading.
        let _ = results.send((request, result));
    });
}
