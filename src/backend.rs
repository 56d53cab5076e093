// ABOUTME: Chat backend seam — the external AI command-line tool each turn is sent to.
// ABOUTME: CommandBackend runs the configured command and captures its stdout as the reply.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::BackendConfig;

/// Anything that can turn a message into a reply.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one message. `context` and `token` are forwarded when present.
    async fn send(
        &self,
        message: &str,
        context: Option<&Path>,
        token: Option<&str>,
    ) -> anyhow::Result<String>;
}

/// Runs an external command once per message.
///
/// Invocation shape: `<command> <args...> [<context_flag> <path>] [<token_flag> <token>] <message>`.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    config: BackendConfig,
    workdir: PathBuf,
}

impl CommandBackend {
    pub fn new(config: BackendConfig, workdir: PathBuf) -> Self {
        Self { config, workdir }
    }

    /// Arguments for one call, in order, without the program name.
    pub fn arguments(&self, message: &str, context: Option<&Path>, token: Option<&str>) -> Vec<String> {
        let mut args = self.config.args.clone();
        if let Some(context) = context {
            args.push(self.config.context_flag.clone());
            args.push(context.to_string_lossy().to_string());
        }
        if let Some(token) = token {
            args.push(self.config.token_flag.clone());
            args.push(token.to_string());
        }
        args.push(message.to_string());
        args
    }
}

#[async_trait]
impl Backend for CommandBackend {
    async fn send(
        &self,
        message: &str,
        context: Option<&Path>,
        token: Option<&str>,
    ) -> anyhow::Result<String> {
        let output = Command::new(&self.config.command)
            .args(self.arguments(message, context, token))
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("failed to run '{}': {}", self.config.command, e))?;

        if !output.status.success() {
            log::warn!("backend '{}' exited with {}", self.config.command, output.status);
        }

        let reply = String::from_utf8_lossy(&output.stdout);
        Ok(strip_trailing_newlines(&reply).to_string())
    }
}

/// Drop trailing line breaks, the way shell command substitution does.
pub fn strip_trailing_newlines(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

/// Create the backend described by config, rooted at `workdir`.
pub fn create_backend(config: &BackendConfig, workdir: &Path) -> anyhow::Result<Arc<dyn Backend>> {
    if config.command.trim().is_empty() {
        anyhow::bail!("backend command is empty; set [backend].command in the config file");
    }
    Ok(Arc::new(CommandBackend::new(
        config.clone(),
        workdir.to_path_buf(),
    )))
}
