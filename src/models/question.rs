use serde::{Deserialize, Serialize};

use crate::data::decode_entities;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// One answer option. `text` keeps the source's HTML entity encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
}

impl Answer {
    pub fn display_text(&self) -> String {
        decode_entities(&self.text)
    }
}

/// A multiple-choice question with its answers already in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub answers: Vec<Answer>,
    pub correct_answer: String,
}

impl Question {
    pub fn display_text(&self) -> String {
        decode_entities(&self.text)
    }

    /// Position of the correct answer, if the question is well formed.
    pub fn correct_index(&self) -> Option<usize> {
        let mut correct = self
            .answers
            .iter()
            .enumerate()
            .filter(|(_, answer)| answer.is_correct);

        match (correct.next(), correct.next()) {
            (Some((index, answer)), None) if answer.text == self.correct_answer => Some(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question {
            text: "Who wrote &quot;Dune&quot;?".to_string(),
            category: "Entertainment: Books".to_string(),
            difficulty: Difficulty::Medium,
            answers: vec![
                Answer { text: "Asimov".to_string(), is_correct: false },
                Answer { text: "Herbert".to_string(), is_correct: true },
                Answer { text: "Clarke".to_string(), is_correct: false },
                Answer { text: "Le Guin".to_string(), is_correct: false },
            ],
            correct_answer: "Herbert".to_string(),
        }
    }

    #[test]
    fn test_correct_index() {
        assert_eq!(sample().correct_index(), Some(1));

        let mut two_correct = sample();
        two_correct.answers[0].is_correct = true;
        assert_eq!(two_correct.correct_index(), None);

        let mut mismatched = sample();
        mismatched.correct_answer = "Clarke".to_string();
        assert_eq!(mismatched.correct_index(), None);
    }

    #[test]
    fn test_display_text_decodes_entities() {
        assert_eq!(sample().display_text(), "Who wrote \"Dune\"?");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["question"], "Who wrote &quot;Dune&quot;?");
        assert_eq!(json["difficulty"], "medium");
        assert_eq!(json["answers"][1]["isCorrect"], true);
        assert_eq!(json["correct_answer"], "Herbert");
    }
}
