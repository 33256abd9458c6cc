use serde::{Deserialize, Serialize};

use crate::question::{AnswerLabel, Question};
use crate::util::percentage;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Bank file stem for the embedded question banks.
    pub fn bank_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Immutable settings for one quiz run, supplied by the caller at session
/// start. The core never reads ambient state; course and difficulty travel
/// through here into the history record and the hand-off payload.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub number_of_questions: usize,
    pub difficulty: Difficulty,
    pub seconds_per_question: u64,
    pub course: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            number_of_questions: 5,
            difficulty: Difficulty::Medium,
            seconds_per_question: 30,
            course: "general".to_string(),
        }
    }
}

/// One line of the final breakdown: the question zipped with what the user did.
#[derive(Debug, Clone, PartialEq)]
pub struct PerQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: AnswerLabel,
    pub user_answer: Option<AnswerLabel>,
    pub is_correct: bool,
}

impl PerQuestion {
    pub fn new(question: &Question, user_answer: Option<AnswerLabel>) -> Self {
        Self {
            question: question.text.clone(),
            options: question.options.clone(),
            correct_answer: question.correct,
            user_answer,
            is_correct: user_answer == Some(question.correct),
        }
    }
}

/// Read-only snapshot computed exactly once when a session completes.
/// Downstream consumers (results view, history store, assist hand-off)
/// receive clones, never a live reference into session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub score: usize,
    pub total_questions: usize,
    pub per_question: Vec<PerQuestion>,
    pub time_spent_ms: u64,
    pub difficulty: Difficulty,
    pub course: String,
}

impl SessionResult {
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_questions)
    }

    pub fn summary_message(&self) -> &'static str {
        match self.percentage() {
            90..=100 => "Outstanding! You've mastered this topic!",
            80..=89 => "Excellent work! You have a strong grasp of the material!",
            70..=79 => "Good job! Keep up the great work!",
            60..=69 => "Nice effort! A bit more practice will help you improve!",
            _ => "Keep learning! Every attempt brings you closer to mastery!",
        }
    }
}

/// Coarse grade used in the history view's latest-performance row.
pub fn performance_level(pct: u32) -> &'static str {
    match pct {
        80..=100 => "Excellent",
        60..=79 => "Good",
        40..=59 => "Fair",
        _ => "Needs Improvement",
    }
}
