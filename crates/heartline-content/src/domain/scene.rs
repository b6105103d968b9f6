//! Scenes and the questions they carry.
//!
//! Field names on the wire follow the content files written by authors
//! (`sceneName`, `dialogueLines`, `correctAnswerIndex`, ...).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Affection change applied when a question of the scene is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardParams {
    /// Added to the score for a correct answer.
    #[serde(rename = "perfectAffectionBonus", default)]
    pub correct_bonus: u32,
    /// Subtracted from the score for a wrong answer.
    #[serde(rename = "wrongAnswerPenalty", default)]
    pub wrong_penalty: u32,
}

/// An authoring defect in a question. Defective questions are tolerated at
/// runtime and only reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentDefect {
    #[error("question has no choices")]
    NoChoices,
    #[error("question has a single choice")]
    SingleChoice,
    #[error("correct index {index} is out of range for {len} choices")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

/// A recall question about the dialogue of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "questionText")]
    pub prompt: String,
    #[serde(default)]
    pub choices: Vec<String>,
    /// Zero-based index into `choices`.
    #[serde(rename = "correctAnswerIndex", default)]
    pub correct_index: usize,
    #[serde(rename = "correctResponse", default, skip_serializing_if = "Option::is_none")]
    pub correct_response: Option<String>,
    #[serde(rename = "wrongResponse", default, skip_serializing_if = "Option::is_none")]
    pub wrong_response: Option<String>,
}

impl Question {
    /// Creates a question without response texts.
    #[must_use]
    pub fn new<S: Into<String>>(prompt: S, choices: Vec<String>, correct_index: usize) -> Self {
        Self {
            prompt: prompt.into(),
            choices,
            correct_index,
            correct_response: None,
            wrong_response: None,
        }
    }

    /// Sets the feedback texts shown after a correct or a wrong answer.
    #[must_use]
    pub fn with_responses<S: Into<String>>(mut self, correct: S, wrong: S) -> Self {
        self.correct_response = Some(correct.into());
        self.wrong_response = Some(wrong.into());
        self
    }

    /// Whether `chosen` is the correct answer. Indices outside the choice
    /// list are never correct, including when the authored correct index is
    /// itself out of range.
    #[must_use]
    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen < self.choices.len() && chosen == self.correct_index
    }

    /// Feedback text for the given outcome, if authored.
    #[must_use]
    pub fn response_for(&self, correct: bool) -> Option<&str> {
        if correct {
            self.correct_response.as_deref()
        } else {
            self.wrong_response.as_deref()
        }
    }

    /// Returns the first authoring defect of this question, if any.
    #[must_use]
    pub fn defect(&self) -> Option<ContentDefect> {
        match self.choices.len() {
            0 => Some(ContentDefect::NoChoices),
            1 => Some(ContentDefect::SingleChoice),
            len if self.correct_index >= len => Some(ContentDefect::CorrectIndexOutOfRange {
                index: self.correct_index,
                len,
            }),
            _ => None,
        }
    }

    /// A question without choices cannot be presented at all.
    #[must_use]
    pub fn is_presentable(&self) -> bool {
        !self.choices.is_empty()
    }
}

/// One authored unit of dialogue, questions, and reward parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(rename = "sceneName")]
    pub id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "dialogueLines", default)]
    pub dialogue_lines: Vec<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub rewards: RewardParams,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new<S: Into<String>>(id: S, display_name: S) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            dialogue_lines: Vec::new(),
            questions: Vec::new(),
            rewards: RewardParams::default(),
        }
    }

    #[must_use]
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dialogue_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    #[must_use]
    pub fn with_rewards(mut self, correct_bonus: u32, wrong_penalty: u32) -> Self {
        self.rewards = RewardParams {
            correct_bonus,
            wrong_penalty,
        };
        self
    }

    /// Lists `(question index, defect)` for every defective question.
    #[must_use]
    pub fn defects(&self) -> Vec<(usize, ContentDefect)> {
        self.questions
            .iter()
            .enumerate()
            .filter_map(|(index, question)| question.defect().map(|defect| (index, defect)))
            .collect()
    }
}
