//! Completed-session hand-off: persists the attempt to history and writes
//! the AI-assist context document a downstream tutoring chat consumes.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::history::HistoryDb;
use crate::question::AnswerLabel;
use crate::session::SessionResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffOption {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffQuestion {
    pub question: String,
    pub options: Vec<HandoffOption>,
    pub correct_answer: String,
    pub user_answer: Option<String>,
    pub is_correct: bool,
}

/// Stable wire shape consumed by the AI-assist view. Field names are part of
/// the contract; do not rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffPayload {
    pub questions: Vec<HandoffQuestion>,
    pub score: usize,
    pub total_questions: usize,
    pub course_name: String,
    pub difficulty: String,
    pub timestamp: String,
}

impl HandoffPayload {
    pub fn from_result(result: &SessionResult) -> Self {
        let questions = result
            .per_question
            .iter()
            .map(|pq| HandoffQuestion {
                question: pq.question.clone(),
                options: pq
                    .options
                    .iter()
                    .zip(AnswerLabel::ALL)
                    .map(|(text, label)| HandoffOption {
                        text: text.clone(),
                        label: label.to_string(),
                    })
                    .collect(),
                correct_answer: pq.correct_answer.to_string(),
                user_answer: pq.user_answer.map(|a| a.to_string()),
                is_correct: pq.is_correct,
            })
            .collect();

        Self {
            questions,
            score: result.score,
            total_questions: result.total_questions,
            course_name: result.course.clone(),
            difficulty: result.difficulty.to_string(),
            timestamp: Local::now().to_rfc3339(),
        }
    }

    /// Plain-text seed for the tutoring conversation, referencing each
    /// question as "your answer" vs "correct answer".
    pub fn conversation_seed(&self) -> String {
        let mut out = format!(
            "The student just finished a {} quiz on \"{}\" and scored {}/{}.\n\
             Help them review the questions below.\n",
            self.difficulty, self.course_name, self.score, self.total_questions
        );
        for (i, q) in self.questions.iter().enumerate() {
            out.push_str(&format!("\nQ{}: {}\n", i + 1, q.question));
            let correct_text = q
                .options
                .iter()
                .find(|o| o.label == q.correct_answer)
                .map(|o| o.text.as_str())
                .unwrap_or("");
            match &q.user_answer {
                Some(label) => {
                    let answer_text = q
                        .options
                        .iter()
                        .find(|o| o.label == *label)
                        .map(|o| o.text.as_str())
                        .unwrap_or("");
                    out.push_str(&format!("  Your answer: {}) {}\n", label, answer_text));
                }
                None => out.push_str("  Your answer: none (time expired)\n"),
            }
            out.push_str(&format!(
                "  Correct answer: {}) {}\n",
                q.correct_answer, correct_text
            ));
        }
        out
    }
}

/// Durable file store for the hand-off document.
#[derive(Debug, Clone)]
pub struct HandoffStore {
    path: PathBuf,
}

impl HandoffStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::handoff_path().unwrap_or_else(|| PathBuf::from("swot_handoff.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn save(&self, payload: &HandoffPayload) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(payload)?;
        fs::write(&self.path, data)
    }

    pub fn load(&self) -> Option<HandoffPayload> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// What actually landed when a result was published; drives the non-blocking
/// notice on the results screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitReport {
    pub history_saved: bool,
    pub handoff_saved: bool,
}

/// Publishes a completed session to its two external consumers. Both writes
/// are fire-and-forget: failures are logged and reported, never propagated,
/// and the in-memory result stays the source of truth for the results view.
#[derive(Debug)]
pub struct ResultEmitter {
    history: Option<HistoryDb>,
    store: HandoffStore,
}

impl ResultEmitter {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let history = HistoryDb::new()
            .map_err(|e| log::warn!("history database unavailable: {e}"))
            .ok();
        Self {
            history,
            store: HandoffStore::new(),
        }
    }

    pub fn with_parts(history: Option<HistoryDb>, store: HandoffStore) -> Self {
        Self { history, store }
    }

    pub fn history(&self) -> Option<&HistoryDb> {
        self.history.as_ref()
    }

    pub fn publish(&mut self, result: &SessionResult, seconds_per_question: u64) -> EmitReport {
        let mut report = EmitReport::default();

        match self.history.as_mut() {
            Some(db) => match db.record_attempt(result, seconds_per_question) {
                Ok(id) => {
                    log::debug!("attempt {id} recorded");
                    report.history_saved = true;
                }
                Err(e) => log::warn!("failed to save quiz attempt: {e}"),
            },
            None => log::warn!("history database unavailable, attempt not saved"),
        }

        let payload = HandoffPayload::from_result(result);
        match self.store.save(&payload) {
            Ok(()) => report.handoff_saved = true,
            Err(e) => log::warn!("failed to write ai-assist handoff: {e}"),
        }

        report
    }
}
