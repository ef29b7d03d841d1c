//! Pure quiz logic: turning raw trivia into questions, and scoring.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::RawQuestion;
use crate::models::{Answer, Question, QuizSession};

/// Puts the correct answer and the incorrect ones into a uniformly random order.
pub fn shuffle_answers<R>(correct: &str, incorrect: &[String], rng: &mut R) -> Vec<Answer>
where
    R: Rng + ?Sized,
{
    let mut answers: Vec<Answer> = std::iter::once(Answer {
        text: correct.to_string(),
        is_correct: true,
    })
    .chain(incorrect.iter().map(|text| Answer {
        text: text.clone(),
        is_correct: false,
    }))
    .collect();

    answers.shuffle(rng);
    answers
}

pub fn build_question<R>(raw: &RawQuestion, rng: &mut R) -> Question
where
    R: Rng + ?Sized,
{
    Question {
        text: raw.question.clone(),
        category: raw.category.clone(),
        difficulty: raw.difficulty,
        answers: shuffle_answers(&raw.correct_answer, &raw.incorrect_answers, rng),
        correct_answer: raw.correct_answer.clone(),
    }
}

pub fn build_questions<R>(raw: &[RawQuestion], rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    raw.iter().map(|question| build_question(question, rng)).collect()
}

/// Colour band for a result percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Final tally of a quiz. `total` is always the full question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub correct: usize,
    pub incorrect: usize,
    pub answered: usize,
    pub total: usize,
    pub percentage: u32,
}

impl Summary {
    pub fn grade(&self) -> Grade {
        match self.percentage {
            90.. => Grade::Excellent,
            70..=89 => Grade::Good,
            50..=69 => Grade::Fair,
            _ => Grade::Poor,
        }
    }

    pub fn unanswered(&self) -> usize {
        self.total - self.answered
    }
}

pub fn compute_summary(session: &QuizSession) -> Summary {
    let total = session.total();
    let answered = session.answered.min(total);
    let correct = session.score.min(answered);

    Summary {
        correct,
        incorrect: answered - correct,
        answered,
        total,
        percentage: calculate_percentage(correct, total),
    }
}

fn calculate_percentage(score: usize, total: usize) -> u32 {
    if total > 0 {
        ((score as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    }
}
