mod question;
mod session;
mod user;

pub use question::{Answer, Difficulty, Question};
pub use session::{
    format_seconds, QuizSession, SessionInvariantError, ANSWER_COUNT, QUESTION_COUNT,
    TIME_LIMIT_SECS,
};
pub use user::User;

/// Which screen the view layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Home,
    Quiz,
    Results,
}
