// ABOUTME: App orchestrator — resolves working dir, transcript path, context, and backend.
// ABOUTME: Then hands stdin/stdout to the session driver.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::io::{AsyncBufRead, BufReader};

use crate::backend::{Backend, create_backend};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::ChatError;
use crate::session::{
    InputMode, Session, SessionParams, Transcript, prepare_log_dir, resolve_context,
    resolve_log_path,
};

/// Top-level application for one invocation.
pub struct App {
    config: Config,
    cli: Cli,
}

impl App {
    pub fn new(config: Config, cli: Cli) -> Self {
        Self { config, cli }
    }

    /// Run against the real terminal: change directory if asked, build the
    /// command backend, and drive the session over stdin/stdout.
    pub async fn run(self) -> anyhow::Result<()> {
        let dir = self.cli.checked_dir()?;
        let workdir = enter_workdir(dir.as_deref())?;

        // Load local .env if present, then the user-level secrets file. The
        // backend inherits whatever token variables these define.
        let _ = dotenvy::from_path(workdir.join(".env"));
        let _ = dotenvy::from_path(Config::secrets_env_path());

        let backend = create_backend(&self.config.backend, &workdir)?;
        let input = BufReader::new(tokio::io::stdin());
        let mut out = std::io::stdout();
        self.run_in(&workdir, backend, InputMode::detect(), input, &mut out)
            .await?;
        Ok(())
    }

    /// Run with an explicit working directory, backend, and I/O.
    pub async fn run_in<R, W>(
        self,
        workdir: &Path,
        backend: Arc<dyn Backend>,
        mode: InputMode,
        input: R,
        out: &mut W,
    ) -> Result<(), ChatError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        // Nothing is written until the arguments are known to be valid.
        self.cli.checked_dir()?;

        let session_name = self.cli.session_name();
        if let (Some(raw), Some("")) = (self.cli.session.as_deref(), session_name.as_deref()) {
            log::warn!(
                "session name {:?} has no usable characters; using a timestamped log file",
                raw
            );
        }

        prepare_log_dir(&self.config.log_dir)?;
        let log_path = resolve_log_path(&self.config.log_dir, session_name.as_deref(), &Local::now());
        log::debug!("transcript: {}", log_path.display());

        let context = resolve_context(workdir);

        let session = Session::new(SessionParams {
            transcript: Transcript::new(log_path, &self.config.assistant_name),
            backend,
            context,
            token: self.cli.token.clone(),
        });

        session
            .run(mode, self.cli.initial_message(), input, out)
            .await
    }
}

/// Change the process directory to `dir` (if given) and return the directory
/// the session runs in.
pub fn enter_workdir(dir: Option<&Path>) -> Result<PathBuf, ChatError> {
    if let Some(dir) = dir {
        std::env::set_current_dir(dir).map_err(|source| ChatError::ChangeDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::env::current_dir().map_err(|source| ChatError::ChangeDirectory {
        path: dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(".")),
        source,
    })
}
