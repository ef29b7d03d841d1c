//! Client for the Open Trivia Database question API.

use std::future::Future;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Difficulty, ANSWER_COUNT};

pub const DEFAULT_ENDPOINT: &str = "https://opentdb.com/api.php";

/// Errors raised while fetching questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("trivia request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("trivia source answered with response code {0}")]
    BadResponse(i64),
    #[error("trivia source returned no questions")]
    Empty,
    #[error("trivia source returned a malformed response: {0}")]
    Malformed(String),
}

/// One question exactly as the trivia source sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    pub difficulty: Difficulty,
}

/// Envelope of the trivia API response.
#[derive(Debug, Clone, Deserialize)]
pub struct TriviaResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

impl TriviaResponse {
    /// Applies the response-code contract: anything but 0 is a failed request.
    pub fn into_questions(self, amount: usize) -> Result<Vec<RawQuestion>, FetchError> {
        if self.response_code != 0 {
            return Err(FetchError::BadResponse(self.response_code));
        }
        check_questions(&self.results, amount)?;
        Ok(self.results)
    }
}

/// Requires exactly `amount` questions, each with one correct and three incorrect answers.
pub fn check_questions(questions: &[RawQuestion], amount: usize) -> Result<(), FetchError> {
    if questions.is_empty() {
        return Err(FetchError::Empty);
    }
    if questions.len() != amount {
        return Err(FetchError::Malformed(format!(
            "{} questions instead of {amount}",
            questions.len()
        )));
    }
    if let Some(index) = questions
        .iter()
        .position(|question| question.incorrect_answers.len() != ANSWER_COUNT - 1)
    {
        return Err(FetchError::Malformed(format!(
            "question {index} has {} incorrect answers",
            questions[index].incorrect_answers.len()
        )));
    }
    Ok(())
}

/// Something that can hand out raw multiple-choice questions.
pub trait TriviaSource {
    fn fetch(
        &self,
        amount: usize,
    ) -> impl Future<Output = Result<Vec<RawQuestion>, FetchError>> + Send;
}

#[derive(Clone)]
pub struct OpenTriviaClient {
    client: Client,
    endpoint: String,
}

impl OpenTriviaClient {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    #[must_use]
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for OpenTriviaClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl TriviaSource for OpenTriviaClient {
    /// Single attempt, no retry. Non-success HTTP statuses count as network failures.
    async fn fetch(&self, amount: usize) -> Result<Vec<RawQuestion>, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, amount, "fetching trivia questions");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("amount", amount.to_string()), ("type", "multiple".to_string())])
            .send()
            .await?
            .error_for_status()?;

        let body: TriviaResponse = response.json().await?;
        let questions = body.into_questions(amount)?;

        tracing::info!(count = questions.len(), "fetched trivia questions");
        Ok(questions)
    }
}
