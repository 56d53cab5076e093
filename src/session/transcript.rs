// ABOUTME: Markdown transcript — resolves the log file path and appends speaker blocks.
// ABOUTME: Files live in <log_dir>/<session>.md or <log_dir>/chat_<YYYYMMDD_HHMMSS>.md and are never truncated.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::error::ChatError;

/// Header line for the human side of a turn.
pub const USER_HEADER: &str = "### You";

/// Compute the transcript path for this run.
///
/// A non-empty session name wins; otherwise the file is named after `now`
/// at second resolution, so two runs started in the same second share a file.
pub fn resolve_log_path<Tz: TimeZone>(
    log_dir: &Path,
    session: Option<&str>,
    now: &DateTime<Tz>,
) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    match session.filter(|name| !name.is_empty()) {
        Some(name) => log_dir.join(format!("{}.md", name)),
        None => log_dir.join(format!("chat_{}.md", now.format("%Y%m%d_%H%M%S"))),
    }
}

/// Create the log directory and any missing parents.
pub fn prepare_log_dir(log_dir: &Path) -> Result<(), ChatError> {
    fs::create_dir_all(log_dir).map_err(|source| ChatError::CreateLogDir {
        path: log_dir.to_path_buf(),
        source,
    })
}

/// Append-only writer for one session's transcript.
///
/// The file is opened in append mode for every block, so each block is on
/// disk before the caller moves on.
#[derive(Debug, Clone)]
pub struct Transcript {
    path: PathBuf,
    assistant_name: String,
}

impl Transcript {
    pub fn new(path: PathBuf, assistant_name: &str) -> Self {
        Self {
            path,
            assistant_name: assistant_name.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Speaker label for replies.
    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    pub fn append_user(&self, text: &str) -> Result<(), ChatError> {
        self.append_block(USER_HEADER, text)
    }

    pub fn append_assistant(&self, text: &str) -> Result<(), ChatError> {
        self.append_block(&format!("### {}", self.assistant_name), text)
    }

    fn append_block(&self, header: &str, text: &str) -> Result<(), ChatError> {
        let to_err = |source| ChatError::WriteLog {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_err)?;
        write!(file, "{}\n{}\n\n", header, text).map_err(to_err)?;
        file.flush().map_err(to_err)
    }
}
