use crate::question::RawQuestion;
use crate::session::Difficulty;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use std::path::PathBuf;
use thiserror::Error;

static BANK_DIR: Dir = include_dir!("src/banks");

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("no embedded question bank named {0:?}")]
    MissingBank(String),
    #[error("response text contains no JSON array")]
    NoJsonPayload,
    #[error("could not parse question set: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read question set: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for question-set acquisition
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub number_of_questions: usize,
    pub difficulty: Difficulty,
    /// Externally generated set (a file holding an AI response or a plain
    /// JSON array). When absent, questions are sampled from the embedded
    /// banks.
    pub questions_file: Option<PathBuf>,
}

/// Handles all question-set acquisition ahead of session start. Output is
/// raw: structural validation is the session's acceptance gate, not ours.
pub struct QuestionGenerator {
    config: GeneratorConfig,
}

impl QuestionGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> Result<Vec<RawQuestion>, GeneratorError> {
        if let Some(ref path) = self.config.questions_file {
            log::debug!("loading question set from {}", path.display());
            let text = std::fs::read_to_string(path)?;
            return parse_response(&text);
        }
        self.sample_bank()
    }

    fn sample_bank(&self) -> Result<Vec<RawQuestion>, GeneratorError> {
        let bank = load_bank(self.config.difficulty)?;
        let mut rng = rand::thread_rng();
        let picked: Vec<RawQuestion> = bank
            .choose_multiple(&mut rng, self.config.number_of_questions)
            .cloned()
            .collect();
        if picked.len() < self.config.number_of_questions {
            log::debug!(
                "bank {:?} holds only {} questions, requested {}",
                self.config.difficulty.bank_name(),
                picked.len(),
                self.config.number_of_questions
            );
        }
        Ok(picked)
    }
}

/// Full embedded bank for a difficulty level.
pub fn load_bank(difficulty: Difficulty) -> Result<Vec<RawQuestion>, GeneratorError> {
    let name = format!("{}.json", difficulty.bank_name());
    let file = BANK_DIR
        .get_file(&name)
        .ok_or(GeneratorError::MissingBank(name))?;
    let bank = serde_json::from_slice(file.contents())?;
    Ok(bank)
}

/// Pull a question array out of free-form generator output. LLM responses
/// wrap the payload in prose and markdown fences; everything outside the
/// outermost array is discarded. Malformed questions inside the array are
/// NOT repaired here; the session start gate rejects such sets wholesale.
pub fn parse_response(text: &str) -> Result<Vec<RawQuestion>, GeneratorError> {
    let payload = extract_json_array(text).ok_or(GeneratorError::NoJsonPayload)?;
    let set = serde_json::from_str(payload)?;
    Ok(set)
}

/// Slice out the first top-level JSON array, tracking string literals so
/// brackets inside question text don't end the scan early.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
