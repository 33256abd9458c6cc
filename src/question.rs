use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four answer slots of a multiple-choice question.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

impl AnswerLabel {
    pub const ALL: [AnswerLabel; 4] = [
        AnswerLabel::A,
        AnswerLabel::B,
        AnswerLabel::C,
        AnswerLabel::D,
    ];

    /// Parse a label the way the generator boundary normalizes them:
    /// whitespace-trimmed, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(AnswerLabel::A),
            "B" => Some(AnswerLabel::B),
            "C" => Some(AnswerLabel::C),
            "D" => Some(AnswerLabel::D),
            _ => None,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn index(self) -> usize {
        match self {
            AnswerLabel::A => 0,
            AnswerLabel::B => 1,
            AnswerLabel::C => 2,
            AnswerLabel::D => 3,
        }
    }
}

/// Question as delivered by a generator: structure unchecked, text unnormalized.
///
/// This is the wire shape of the external AI generator and of question-set
/// files on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
}

/// Question accepted into a session: exactly four options, a valid label.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub text: String,
    pub options: [String; 4],
    pub correct: AnswerLabel,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("question set is empty")]
    EmptySet,
    #[error("question {index} has no text")]
    BlankQuestion { index: usize },
    #[error("question {index} has {found} options, expected 4")]
    WrongOptionCount { index: usize, found: usize },
    #[error("question {index} has invalid correct-answer label {label:?}")]
    BadLabel { index: usize, label: String },
}

/// Normalize generator text: trimmed, literal `\n` sequences unescaped,
/// stray backslashes dropped.
fn clean_text(s: &str) -> String {
    s.trim().replace("\\n", "\n").replace('\\', "")
}

impl Question {
    /// Convert one raw question, rejecting structural problems. `index` is
    /// only used to point error messages at the offending entry.
    pub fn from_raw(index: usize, raw: &RawQuestion) -> Result<Self, ValidationError> {
        let text = clean_text(&raw.question);
        if text.is_empty() {
            return Err(ValidationError::BlankQuestion { index });
        }
        if raw.options.len() != 4 {
            return Err(ValidationError::WrongOptionCount {
                index,
                found: raw.options.len(),
            });
        }
        let correct = AnswerLabel::parse(&raw.correct_answer).ok_or_else(|| {
            ValidationError::BadLabel {
                index,
                label: raw.correct_answer.clone(),
            }
        })?;

        let mut options: [String; 4] = Default::default();
        for (slot, opt) in options.iter_mut().zip(raw.options.iter()) {
            *slot = clean_text(opt);
        }

        Ok(Question {
            text,
            options,
            correct,
        })
    }

    pub fn option(&self, label: AnswerLabel) -> &str {
        &self.options[label.index()]
    }
}

/// Validate a whole set. Any malformed entry rejects the set wholesale;
/// no partial repair is attempted.
pub fn build_set(raw: &[RawQuestion]) -> Result<Vec<Question>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptySet);
    }
    raw.iter()
        .enumerate()
        .map(|(i, r)| Question::from_raw(i, r))
        .collect()
}
