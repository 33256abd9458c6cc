use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::{Difficulty, SessionConfig};

/// Persisted defaults for new sessions. CLI flags override these per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub number_of_questions: usize,
    pub difficulty: Difficulty,
    pub seconds_per_question: u64,
    pub course: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_questions: 5,
            difficulty: Difficulty::Medium,
            seconds_per_question: 30,
            course: "general".to_string(),
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            number_of_questions: cfg.number_of_questions,
            difficulty: cfg.difficulty,
            seconds_per_question: cfg.seconds_per_question,
            course: cfg.course.clone(),
        }
    }
}

impl From<&SessionConfig> for Config {
    fn from(session: &SessionConfig) -> Self {
        Self {
            number_of_questions: session.number_of_questions,
            difficulty: session.difficulty,
            seconds_per_question: session.seconds_per_question,
            course: session.course.clone(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "swot") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("swot_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            number_of_questions: 20,
            difficulty: Difficulty::Hard,
            seconds_per_question: 15,
            course: "distributed systems".into(),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"not json at all").unwrap();
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn session_config_from_config() {
        let cfg = Config {
            number_of_questions: 10,
            difficulty: Difficulty::Easy,
            seconds_per_question: 45,
            course: "networks".into(),
        };
        let session: SessionConfig = (&cfg).into();
        assert_eq!(session.number_of_questions, 10);
        assert_eq!(session.difficulty, Difficulty::Easy);
        assert_eq!(session.seconds_per_question, 45);
        assert_eq!(session.course, "networks");
    }
}
