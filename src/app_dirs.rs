use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// History database under the XDG state dir.
    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.db"))
    }

    /// AI-assist hand-off document, next to the history database.
    pub fn handoff_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("handoff.json"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("swot"),
            )
        } else {
            ProjectDirs::from("", "", "swot")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
