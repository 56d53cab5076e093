// ABOUTME: Session driver — one-shot piped mode or the interactive prompt loop.
// ABOUTME: Each turn logs the user block, calls the backend, logs the reply, then echoes it.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::backend::{Backend, strip_trailing_newlines};
use crate::error::ChatError;
use crate::session::transcript::Transcript;

/// Typing this (surrounding whitespace ignored) at the prompt ends the session.
pub const EXIT_COMMAND: &str = "exit";

/// Prompt shown before each interactive line.
pub const PROMPT: &str = "You: ";

/// How the session reads its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Stdin is a pipe or file: read it whole, do at most one exchange.
    Piped,
    /// Stdin is a terminal: prompt line by line until `exit` or end of input.
    Interactive,
}

impl InputMode {
    /// Piped unless standard input is attached to a terminal.
    pub fn detect() -> Self {
        if std::io::stdin().is_terminal() {
            InputMode::Interactive
        } else {
            InputMode::Piped
        }
    }
}

/// Bundled parameters for a session.
pub struct SessionParams {
    pub transcript: Transcript,
    pub backend: Arc<dyn Backend>,
    pub context: Option<PathBuf>,
    pub token: Option<String>,
}

/// A single run of the tool: one transcript, one backend, fixed context and token.
pub struct Session {
    transcript: Transcript,
    backend: Arc<dyn Backend>,
    context: Option<PathBuf>,
    token: Option<String>,
}

impl Session {
    pub fn new(params: SessionParams) -> Self {
        Self {
            transcript: params.transcript,
            backend: params.backend,
            context: params.context,
            token: params.token,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run one turn and return the reply.
    ///
    /// The user block is written before the backend is called, so a hung or
    /// killed backend still leaves the message in the transcript. A backend
    /// that cannot be started is reported on stderr and yields an empty reply.
    pub async fn exchange<W: Write>(&self, message: &str, out: &mut W) -> Result<String, ChatError> {
        self.transcript.append_user(message)?;

        let reply = match self
            .backend
            .send(message, self.context.as_deref(), self.token.as_deref())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("{:#}", e);
                String::new()
            }
        };

        self.transcript.append_assistant(&reply)?;

        writeln!(out, "{}: {}", self.transcript.assistant_name(), reply)?;
        writeln!(out)?;
        out.flush()?;
        Ok(reply)
    }

    /// Drive the session to completion.
    ///
    /// `initial` is the message assembled from positional arguments.
    pub async fn run<R, W>(
        &self,
        mode: InputMode,
        initial: Option<String>,
        input: R,
        out: &mut W,
    ) -> Result<(), ChatError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let initial = initial.filter(|m| !m.is_empty());
        match mode {
            InputMode::Piped => self.run_piped(initial, input, out).await,
            InputMode::Interactive => {
                if let Some(message) = initial {
                    self.exchange(&message, out).await?;
                }
                self.run_interactive(input, out).await
            }
        }
    }

    async fn run_piped<R, W>(&self, initial: Option<String>, mut input: R, out: &mut W) -> Result<(), ChatError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes).await?;
        let piped = String::from_utf8_lossy(&bytes);

        let message = merge_piped(initial.as_deref(), strip_trailing_newlines(&piped));
        if message.is_empty() {
            log::debug!("nothing to send");
            return Ok(());
        }
        self.exchange(&message, out).await?;
        Ok(())
    }

    async fn run_interactive<R, W>(&self, mut input: R, out: &mut W) -> Result<(), ChatError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(
            out,
            "=== Chat session started (logging to {}) ===",
            self.transcript.path().display()
        )?;
        writeln!(out, "Type '{}' to quit.", EXIT_COMMAND)?;
        writeln!(out)?;

        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = read_line(&mut input).await? else {
                // End of input behaves like `exit`.
                writeln!(out)?;
                break;
            };
            if line.trim() == EXIT_COMMAND {
                break;
            }
            self.exchange(&line, out).await?;
        }

        writeln!(out, "=== Chat session ended ===")?;
        out.flush()?;
        Ok(())
    }
}

/// Read one line without its line ending. Invalid UTF-8 is replaced, not fatal.
/// Returns `None` at end of input.
async fn read_line<R: AsyncBufRead + Unpin>(input: &mut R) -> Result<Option<String>, ChatError> {
    let mut bytes = Vec::new();
    if input.read_until(b'\n', &mut bytes).await? == 0 {
        return Ok(None);
    }
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Combine the argument message with piped input: argument first, a single
/// space between them only when both are non-empty.
pub fn merge_piped(initial: Option<&str>, piped: &str) -> String {
    match initial.filter(|m| !m.is_empty()) {
        Some(initial) if !piped.is_empty() => format!("{} {}", initial, piped),
        Some(initial) => initial.to_string(),
        None => piped.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_argument_then_piped() {
        assert_eq!(merge_piped(Some("hello"), "world"), "hello world");
    }

    #[test]
    fn merge_with_one_side_empty() {
        assert_eq!(merge_piped(Some("hello"), ""), "hello");
        assert_eq!(merge_piped(None, "world"), "world");
        assert_eq!(merge_piped(Some(""), "world"), "world");
    }

    #[test]
    fn merge_nothing_is_empty() {
        assert_eq!(merge_piped(None, ""), "");
        assert_eq!(merge_piped(Some(""), ""), "");
    }

    #[tokio::test]
    async fn read_line_strips_endings_and_replaces_bad_bytes() {
        let mut input = tokio::io::BufReader::new(&b"one\r\ncaf\xe9\nlast"[..]);
        assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("one"));
        assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("caf\u{fffd}"));
        assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("last"));
        assert_eq!(read_line(&mut input).await.unwrap(), None);
    }

    #[test]
    fn merge_keeps_multiline_piped_text() {
        assert_eq!(merge_piped(Some("review:"), "a\nb"), "review: a\nb");
    }
}
