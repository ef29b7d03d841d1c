use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Question;

/// Number of questions requested for every quiz.
pub const QUESTION_COUNT: usize = 10;

/// Answers offered per question: one correct, three incorrect.
pub const ANSWER_COUNT: usize = 4;

/// Time allowed for one quiz, in seconds.
pub const TIME_LIMIT_SECS: u32 = 300;

/// Reasons a persisted session cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionInvariantError {
    #[error("session has {0} questions, expected 10")]
    QuestionCount(usize),
    #[error("question {0} does not have 4 answers with exactly one correct")]
    MalformedQuestion(usize),
    #[error("current question {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("score {score} / answered {answered} inconsistent with {len} questions")]
    Counts {
        score: usize,
        answered: usize,
        len: usize,
    },
    #[error("answered count {answered} does not match current question {index}")]
    Progress { answered: usize, index: usize },
    #[error("remaining time {0}s exceeds the limit")]
    Timer(u32),
}

/// An in-progress quiz. Serialized with the field names of the `quizState` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSession {
    #[serde(rename = "quizData")]
    pub questions: Vec<Question>,
    #[serde(rename = "currentQuestion")]
    pub current_index: usize,
    pub score: usize,
    pub answered: usize,
    #[serde(rename = "timer")]
    pub remaining_seconds: u32,
    #[serde(skip)]
    pub ended: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            answered: 0,
            remaining_seconds: TIME_LIMIT_SECS,
            ended: false,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Checks every structural invariant of a live session.
    pub fn validate(&self) -> Result<(), SessionInvariantError> {
        let len = self.questions.len();
        if len != QUESTION_COUNT {
            return Err(SessionInvariantError::QuestionCount(len));
        }

        if let Some(index) = self.questions.iter().position(|question| {
            question.answers.len() != ANSWER_COUNT || question.correct_index().is_none()
        })
        {
            return Err(SessionInvariantError::MalformedQuestion(index));
        }

        if self.current_index >= len {
            return Err(SessionInvariantError::IndexOutOfRange {
                index: self.current_index,
                len,
            });
        }

        if self.score > self.answered || self.answered > len {
            return Err(SessionInvariantError::Counts {
                score: self.score,
                answered: self.answered,
                len,
            });
        }

        if self.answered != self.current_index {
            return Err(SessionInvariantError::Progress {
                answered: self.answered,
                index: self.current_index,
            });
        }

        if self.remaining_seconds > TIME_LIMIT_SECS {
            return Err(SessionInvariantError::Timer(self.remaining_seconds));
        }

        Ok(())
    }

    /// Remaining time as `m:ss`.
    pub fn format_time(&self) -> String {
        format_seconds(self.remaining_seconds)
    }
}

pub fn format_seconds(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
