//! Session state machine: who is logged in, which screen is shown, and the quiz in progress.
//!
//! Every mutation of an active quiz is written to storage before the method
//! returns, and every way out of the quiz screen stops the ticker.

use rand::Rng;
use thiserror::Error;

use crate::data::{
    check_questions, load_json, FetchError, RawQuestion, Storage, StorageError, TriviaSource,
};
use crate::engine::{build_questions, compute_summary, Summary};
use crate::models::{QuizSession, Screen, User, QUESTION_COUNT};
use crate::timer::Ticker;

pub const USER_KEY: &str = "user";
pub const QUIZ_STATE_KEY: &str = "quizState";

pub const EMPTY_CREDENTIALS_MESSAGE: &str = "Username dan password harus diisi!";
pub const FETCH_FAILED_MESSAGE: &str = "Gagal mengambil data kuis. Silakan coba lagi.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Username dan password harus diisi!")]
    EmptyCredentials,
    #[error("already logged in")]
    AlreadyLoggedIn,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no quiz is in progress")]
    NotInQuiz,
    #[error("a quiz can only be started from the home screen")]
    NotOnHome,
    #[error("results are not being shown")]
    NotOnResults,
    #[error("questions are already being fetched")]
    AlreadyLoading,
    #[error("fetch result arrived after the screen changed")]
    StaleFetch,
    #[error("answer {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Why a quiz left the quiz screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Completed,
    TimedOut,
    Stopped,
}

/// Result of one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub finished: bool,
}

/// Token tying a fetch result to the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest(u64);

/// Read-only view of the store for rendering.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub screen: Screen,
    pub user: Option<&'a User>,
    pub session: Option<&'a QuizSession>,
    pub error_message: Option<&'a str>,
    pub is_loading: bool,
    pub end_reason: Option<EndReason>,
}

pub struct SessionStore<S, T> {
    storage: S,
    ticker: T,
    screen: Screen,
    user: Option<User>,
    session: Option<QuizSession>,
    error_message: Option<String>,
    pending_fetch: Option<u64>,
    next_request: u64,
    end_reason: Option<EndReason>,
}

impl<S: Storage, T: Ticker> SessionStore<S, T> {
    /// A logged-out store that ignores whatever is saved in `storage`.
    pub fn new(storage: S, ticker: T) -> Self {
        Self {
            storage,
            ticker,
            screen: Screen::Login,
            user: None,
            session: None,
            error_message: None,
            pending_fetch: None,
            next_request: 0,
            end_reason: None,
        }
    }

    /// Resumes whatever was saved: a user lands on home, a user with a quiz
    /// resumes the quiz with the countdown running from the saved time.
    pub fn restore(storage: S, ticker: T) -> Self {
        let mut store = Self::new(storage, ticker);

        let user = match load_json::<User, _>(&mut store.storage, USER_KEY) {
            Some(user) if user.logged_in => Some(user),
            Some(_) => {
                store.remove_key(USER_KEY);
                None
            }
            None => None,
        };
        let Some(user) = user else {
            store.remove_key(QUIZ_STATE_KEY);
            tracing::info!("no saved user, starting at login");
            return store;
        };

        tracing::info!(username = %user.username, "restored saved user");
        store.user = Some(user);
        store.screen = Screen::Home;

        let Some(session) = load_json::<QuizSession, _>(&mut store.storage, QUIZ_STATE_KEY) else {
            return store;
        };

        if let Err(error) = session.validate() {
            tracing::warn!(%error, "discarding inconsistent saved quiz");
            store.remove_key(QUIZ_STATE_KEY);
            return store;
        }

        tracing::info!(
            current = session.current_index,
            answered = session.answered,
            remaining = session.remaining_seconds,
            "resuming saved quiz"
        );
        let out_of_time = session.remaining_seconds == 0;
        store.session = Some(session);
        store.screen = Screen::Quiz;

        if out_of_time {
            store.end_quiz(EndReason::TimedOut);
        } else {
            store.ticker.start();
        }
        store
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), LoginError> {
        if self.screen != Screen::Login {
            return Err(LoginError::AlreadyLoggedIn);
        }

        if username.is_empty() || password.is_empty() {
            self.error_message = Some(EMPTY_CREDENTIALS_MESSAGE.to_string());
            return Err(LoginError::EmptyCredentials);
        }

        let user = User::new(username);
        self.write_json(USER_KEY, &user);
        tracing::info!(username, "logged in");

        self.user = Some(user);
        self.error_message = None;
        self.screen = Screen::Home;
        Ok(())
    }

    /// Leaves from any screen, dropping the user and any quiz.
    pub fn logout(&mut self) {
        self.ticker.stop();

        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "logged out");
        }
        self.session = None;
        self.end_reason = None;
        self.pending_fetch = None;
        self.error_message = None;
        self.screen = Screen::Login;

        self.remove_key(USER_KEY);
        self.remove_key(QUIZ_STATE_KEY);
    }

    /// Marks a question fetch as in flight. Only valid on the home screen.
    pub fn begin_fetch(&mut self) -> Result<FetchRequest, SessionError> {
        if self.screen != Screen::Home {
            return Err(SessionError::NotOnHome);
        }
        if self.pending_fetch.is_some() {
            return Err(SessionError::AlreadyLoading);
        }

        self.next_request += 1;
        self.pending_fetch = Some(self.next_request);
        self.error_message = None;
        Ok(FetchRequest(self.next_request))
    }

    /// Applies the outcome of a fetch started with [`begin_fetch`](Self::begin_fetch).
    ///
    /// Results for a request that is no longer pending are dropped.
    pub fn finish_fetch<R>(
        &mut self,
        request: FetchRequest,
        result: Result<Vec<RawQuestion>, FetchError>,
        rng: &mut R,
    ) -> Result<(), SessionError>
    where
        R: Rng + ?Sized,
    {
        if self.pending_fetch != Some(request.0) || self.screen != Screen::Home {
            tracing::debug!(request = request.0, "ignoring stale fetch result");
            return Err(SessionError::StaleFetch);
        }
        self.pending_fetch = None;

        let checked = result.and_then(|raw| {
            check_questions(&raw, QUESTION_COUNT)?;
            Ok(raw)
        });
        let raw = match checked {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%error, "failed to fetch quiz");
                self.error_message = Some(FETCH_FAILED_MESSAGE.to_string());
                return Err(error.into());
            }
        };

        let questions = build_questions(&raw, rng);

        tracing::info!(questions = questions.len(), "quiz started");
        self.session = Some(QuizSession::new(questions));
        self.end_reason = None;
        self.error_message = None;
        self.screen = Screen::Quiz;
        self.persist_session();
        self.ticker.start();
        Ok(())
    }

    /// Fetches questions from `source` and enters the quiz.
    pub async fn start_quiz<Src, R>(&mut self, source: &Src, rng: &mut R) -> Result<(), SessionError>
    where
        Src: TriviaSource,
        R: Rng + ?Sized,
    {
        let request = self.begin_fetch()?;
        let result = source.fetch(QUESTION_COUNT).await;
        self.finish_fetch(request, result, rng)
    }

    pub fn submit_answer(&mut self, answer_index: usize) -> Result<AnswerOutcome, SessionError> {
        let session = self.active_session_mut()?;
        let Some(question) = session.current_question() else {
            return Err(SessionError::NotInQuiz);
        };
        let Some(answer) = question.answers.get(answer_index) else {
            return Err(SessionError::AnswerOutOfRange {
                index: answer_index,
                len: question.answers.len(),
            });
        };

        let correct = answer.is_correct;
        session.answered += 1;
        if correct {
            session.score += 1;
        }

        let finished = session.is_last_question();
        if finished {
            self.end_quiz(EndReason::Completed);
        } else {
            session.current_index += 1;
            self.persist_session();
        }

        Ok(AnswerOutcome { correct, finished })
    }

    /// Ends the quiz early, keeping the counts as they are.
    pub fn stop_quiz(&mut self) -> Result<(), SessionError> {
        self.active_session_mut()?;
        self.end_quiz(EndReason::Stopped);
        Ok(())
    }

    /// One second passes. Returns true if this tick ran the clock out.
    pub fn tick(&mut self) -> bool {
        let Ok(session) = self.active_session_mut() else {
            return false;
        };
        if session.remaining_seconds == 0 {
            return false;
        }

        session.remaining_seconds -= 1;
        if session.remaining_seconds == 0 {
            self.end_quiz(EndReason::TimedOut);
            true
        } else {
            self.persist_session();
            false
        }
    }

    /// Leaves the results screen for home.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.screen != Screen::Results {
            return Err(SessionError::NotOnResults);
        }

        self.session = None;
        self.end_reason = None;
        self.screen = Screen::Home;
        Ok(())
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            screen: self.screen,
            user: self.user.as_ref(),
            session: self.session.as_ref(),
            error_message: self.error_message.as_deref(),
            is_loading: self.pending_fetch.is_some(),
            end_reason: self.end_reason,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_fetch.is_some()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Tally of the current or just-finished quiz.
    pub fn summary(&self) -> Option<Summary> {
        self.session.as_ref().map(compute_summary)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    fn active_session_mut(&mut self) -> Result<&mut QuizSession, SessionError> {
        if self.screen != Screen::Quiz {
            return Err(SessionError::NotInQuiz);
        }
        match self.session.as_mut() {
            Some(session) if !session.ended => Ok(session),
            _ => Err(SessionError::NotInQuiz),
        }
    }

    fn end_quiz(&mut self, reason: EndReason) {
        self.ticker.stop();
        if let Some(session) = self.session.as_mut() {
            session.ended = true;
            tracing::info!(
                ?reason,
                score = session.score,
                answered = session.answered,
                total = session.total(),
                "quiz ended"
            );
        }
        self.end_reason = Some(reason);
        self.screen = Screen::Results;
        self.remove_key(QUIZ_STATE_KEY);
    }

    fn persist_session(&mut self) {
        let Some(session) = self.session.as_ref().filter(|session| !session.ended) else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(json) => {
                if let Err(error) = self.storage.set(QUIZ_STATE_KEY, &json) {
                    tracing::warn!(%error, "failed to save quiz progress");
                }
            }
            Err(error) => tracing::warn!(%error, "failed to encode quiz progress"),
        }
    }

    fn write_json<V: serde::Serialize>(&mut self, key: &str, value: &V) {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(key, &json));
        if let Err(error) = result {
            tracing::warn!(%error, key, "failed to save state");
        }
    }

    fn remove_key(&mut self, key: &str) {
        if let Err(error) = self.storage.remove(key) {
            tracing::warn!(%error, key, "failed to clear saved state");
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::data::MemoryStorage;
    use crate::models::{Difficulty, TIME_LIMIT_SECS};
    use crate::timer::ManualTicker;

    type TestStore = SessionStore<MemoryStorage, ManualTicker>;

    fn raw_questions() -> Vec<RawQuestion> {
        (0..QUESTION_COUNT)
            .map(|n| RawQuestion {
                question: format!("Question {n}"),
                correct_answer: format!("right {n}"),
                incorrect_answers: vec!["x".into(), "y".into(), "z".into()],
                category: "Science".to_string(),
                difficulty: Difficulty::Easy,
            })
            .collect()
    }

    fn home_store() -> TestStore {
        let mut store = SessionStore::new(MemoryStorage::new(), ManualTicker::new());
        store.login("alice", "pw").unwrap();
        store
    }

    fn quiz_store() -> TestStore {
        let mut store = home_store();
        let request = store.begin_fetch().unwrap();
        store
            .finish_fetch(request, Ok(raw_questions()), &mut StdRng::seed_from_u64(9))
            .unwrap();
        store
    }

    fn correct_index(store: &TestStore) -> usize {
        store
            .session()
            .and_then(|s| s.current_question())
            .and_then(|q| q.correct_index())
            .unwrap()
    }

    fn wrong_index(store: &TestStore) -> usize {
        (correct_index(store) + 1) % 4
    }

    fn assert_invariants(store: &TestStore) {
        if let Some(session) = store.session() {
            assert!(session.score <= session.answered);
            assert!(session.answered <= session.total());
            assert!(session.remaining_seconds <= TIME_LIMIT_SECS);
            if !session.ended {
                assert!(session.current_index < session.total());
            }
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut store = SessionStore::new(MemoryStorage::new(), ManualTicker::new());

        assert_eq!(store.login("alice", ""), Err(LoginError::EmptyCredentials));
        assert_eq!(store.screen(), Screen::Login);
        assert_eq!(store.error_message(), Some(EMPTY_CREDENTIALS_MESSAGE));
        assert!(!store.storage().contains(USER_KEY));

        store.login("alice", "pw").unwrap();
        assert_eq!(store.screen(), Screen::Home);
        assert_eq!(store.error_message(), None);
        assert!(store.storage().contains(USER_KEY));
        assert_eq!(store.login("bob", "pw"), Err(LoginError::AlreadyLoggedIn));
    }

    #[test]
    fn test_fetch_success_enters_quiz_and_starts_timer() {
        let store = quiz_store();

        assert_eq!(store.screen(), Screen::Quiz);
        assert!(store.ticker().is_running());
        assert!(!store.is_loading());
        let session = store.session().unwrap();
        assert_eq!(session.total(), QUESTION_COUNT);
        assert_eq!(session.remaining_seconds, TIME_LIMIT_SECS);
        assert!(store.storage().contains(QUIZ_STATE_KEY));
    }

    #[test]
    fn test_fetch_failure_stays_home() {
        let mut store = home_store();
        let request = store.begin_fetch().unwrap();
        assert!(store.is_loading());

        let result = store.finish_fetch(
            request,
            Err(FetchError::BadResponse(1)),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(
            result,
            Err(SessionError::Fetch(FetchError::BadResponse(1)))
        ));
        assert_eq!(store.screen(), Screen::Home);
        assert_eq!(store.error_message(), Some(FETCH_FAILED_MESSAGE));
        assert!(!store.is_loading());
        assert!(!store.ticker().is_running());

        // A retry is allowed and clears the message.
        store.begin_fetch().unwrap();
        assert_eq!(store.error_message(), None);
    }

    #[test]
    fn test_stale_fetch_is_ignored_after_logout() {
        let mut store = home_store();
        let request = store.begin_fetch().unwrap();
        store.logout();

        let result = store.finish_fetch(request, Ok(raw_questions()), &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(SessionError::StaleFetch)));
        assert_eq!(store.screen(), Screen::Login);
        assert!(store.session().is_none());
    }

    #[test]
    fn test_fetch_with_wrong_shape_stays_home() {
        let mut store = home_store();
        let request = store.begin_fetch().unwrap();
        let mut short = raw_questions();
        short.truncate(4);

        let result = store.finish_fetch(request, Ok(short), &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(SessionError::Fetch(FetchError::Malformed(_)))
        ));
        assert_eq!(store.screen(), Screen::Home);
        assert_eq!(store.error_message(), Some(FETCH_FAILED_MESSAGE));
        assert!(!store.ticker().is_running());

        let request = store.begin_fetch().unwrap();
        let mut five_answers = raw_questions();
        five_answers[7].incorrect_answers.push("w".into());
        let result = store.finish_fetch(request, Ok(five_answers), &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(SessionError::Fetch(FetchError::Malformed(_)))
        ));
        assert!(store.session().is_none());
        assert!(!store.storage().contains(QUIZ_STATE_KEY));
    }

    #[test]
    fn test_only_one_fetch_in_flight() {
        let mut store = home_store();
        store.begin_fetch().unwrap();
        assert!(matches!(store.begin_fetch(), Err(SessionError::AlreadyLoading)));
    }

    #[test]
    fn test_submit_answer_scores_and_advances() {
        let mut store = quiz_store();

        let idx = correct_index(&store);
        let outcome = store.submit_answer(idx).unwrap();
        assert_eq!(outcome, AnswerOutcome { correct: true, finished: false });

        let idx = wrong_index(&store);
        let outcome = store.submit_answer(idx).unwrap();
        assert!(!outcome.correct);

        let session = store.session().unwrap();
        assert_eq!((session.score, session.answered, session.current_index), (1, 2, 2));
        assert_invariants(&store);

        let saved: QuizSession =
            serde_json::from_str(&store.storage().get(QUIZ_STATE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.current_index, 2);
        assert_eq!(saved.score, 1);
    }

    #[test]
    fn test_out_of_range_answer_changes_nothing() {
        let mut store = quiz_store();
        assert!(matches!(
            store.submit_answer(4),
            Err(SessionError::AnswerOutOfRange { index: 4, len: 4 })
        ));
        assert_eq!(store.session().unwrap().answered, 0);
    }

    #[test]
    fn test_answering_last_question_completes() {
        let mut store = quiz_store();
        for _ in 0..QUESTION_COUNT {
            let idx = correct_index(&store);
            store.submit_answer(idx).unwrap();
            assert_invariants(&store);
        }

        assert_eq!(store.screen(), Screen::Results);
        assert_eq!(store.end_reason(), Some(EndReason::Completed));
        assert!(!store.ticker().is_running());
        assert!(!store.storage().contains(QUIZ_STATE_KEY));
        assert_eq!(store.summary().unwrap().percentage, 100);

        // Further answers are no-ops.
        assert!(matches!(store.submit_answer(0), Err(SessionError::NotInQuiz)));
        assert_eq!(store.session().unwrap().answered, QUESTION_COUNT);
    }

    #[test]
    fn test_tick_counts_down_and_times_out() {
        let mut store = quiz_store();
        assert!(!store.tick());
        assert_eq!(store.session().unwrap().remaining_seconds, TIME_LIMIT_SECS - 1);

        let mut timed_out = false;
        for _ in 0..TIME_LIMIT_SECS {
            timed_out |= store.tick();
            assert_invariants(&store);
        }

        assert!(timed_out);
        assert_eq!(store.screen(), Screen::Results);
        assert_eq!(store.end_reason(), Some(EndReason::TimedOut));
        assert_eq!(store.session().unwrap().remaining_seconds, 0);
        assert!(!store.ticker().is_running());
        assert!(!store.storage().contains(QUIZ_STATE_KEY));
    }

    #[test]
    fn test_tick_outside_quiz_is_noop() {
        let mut store = home_store();
        assert!(!store.tick());
        assert_eq!(store.screen(), Screen::Home);
    }

    #[test]
    fn test_stop_and_restart() {
        let mut store = quiz_store();
        let idx = correct_index(&store);
        store.submit_answer(idx).unwrap();
        store.stop_quiz().unwrap();

        assert_eq!(store.screen(), Screen::Results);
        assert_eq!(store.end_reason(), Some(EndReason::Stopped));
        assert_eq!(store.ticker().stops, 1);
        let summary = store.summary().unwrap();
        assert_eq!((summary.correct, summary.answered, summary.total), (1, 1, 10));

        assert!(matches!(store.stop_quiz(), Err(SessionError::NotInQuiz)));

        store.restart().unwrap();
        assert_eq!(store.screen(), Screen::Home);
        assert!(store.session().is_none());
        assert!(store.user().is_some());
        assert!(matches!(store.restart(), Err(SessionError::NotOnResults)));
    }

    #[test]
    fn test_logout_mid_quiz_clears_everything() {
        let mut store = quiz_store();
        store.logout();

        assert_eq!(store.screen(), Screen::Login);
        assert!(store.user().is_none());
        assert!(store.session().is_none());
        assert!(!store.ticker().is_running());
        assert!(!store.storage().contains(USER_KEY));
        assert!(!store.storage().contains(QUIZ_STATE_KEY));
    }

    #[test]
    fn test_restore_resumes_quiz() {
        let mut store = quiz_store();
        let idx = wrong_index(&store);
        store.submit_answer(idx).unwrap();
        store.tick();
        let expected = store.session().cloned().unwrap();

        let SessionStore { storage, .. } = store;
        let restored = SessionStore::restore(storage, ManualTicker::new());

        assert_eq!(restored.screen(), Screen::Quiz);
        assert_eq!(restored.session(), Some(&expected));
        assert!(restored.ticker().is_running());
    }

    #[test]
    fn test_restore_with_exhausted_timer_ends_quiz() {
        let store = quiz_store();
        let mut session = store.session().cloned().unwrap();
        session.remaining_seconds = 0;

        let SessionStore { mut storage, .. } = store;
        storage
            .set(QUIZ_STATE_KEY, &serde_json::to_string(&session).unwrap())
            .unwrap();
        let restored = SessionStore::restore(storage, ManualTicker::new());

        assert_eq!(restored.screen(), Screen::Results);
        assert_eq!(restored.end_reason(), Some(EndReason::TimedOut));
        assert!(!restored.ticker().is_running());
        assert!(!restored.storage().contains(QUIZ_STATE_KEY));
    }

    #[test]
    fn test_restore_discards_inconsistent_quiz() {
        let store = quiz_store();
        let mut session = store.session().cloned().unwrap();
        session.score = 5;

        let SessionStore { mut storage, .. } = store;
        storage
            .set(QUIZ_STATE_KEY, &serde_json::to_string(&session).unwrap())
            .unwrap();
        let restored = SessionStore::restore(storage, ManualTicker::new());

        assert_eq!(restored.screen(), Screen::Home);
        assert!(!restored.storage().contains(QUIZ_STATE_KEY));
    }

    #[test]
    fn test_restore_drops_logged_out_user() {
        let mut storage = MemoryStorage::new();
        storage
            .set(USER_KEY, r#"{"username":"alice","loggedIn":false}"#)
            .unwrap();
        storage.set(QUIZ_STATE_KEY, "{}").unwrap();

        let restored = SessionStore::restore(storage, ManualTicker::new());
        assert_eq!(restored.screen(), Screen::Login);
        assert!(restored.user().is_none());
        assert!(!restored.storage().contains(USER_KEY));
        assert!(!restored.storage().contains(QUIZ_STATE_KEY));
    }

    #[test]
    fn test_restore_drops_quiz_without_user() {
        let mut storage = MemoryStorage::new();
        storage.set(QUIZ_STATE_KEY, "{}").unwrap();

        let restored = SessionStore::restore(storage, ManualTicker::new());
        assert_eq!(restored.screen(), Screen::Login);
        assert!(!restored.storage().contains(QUIZ_STATE_KEY));
    }
}
