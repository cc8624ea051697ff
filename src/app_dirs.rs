use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const LOG_FILE: &str = "numtap.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory holding the score store and the log file
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("numtap"),
            )
        } else {
            ProjectDirs::from("", "", "numtap")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// `explicit` if given, else the state dir, else the working directory
    pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(Self::state_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_path(data_dir: &Path) -> PathBuf {
        data_dir.join(LOG_FILE)
    }
}
