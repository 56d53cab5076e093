// ABOUTME: Command-line surface — flags, positional message fragments, session name sanitizing.
// ABOUTME: Parse failures other than --help/--version become configuration errors.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;

use crate::error::ChatError;

/// Chat with an AI command-line tool and keep a Markdown transcript of every turn.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "chatlog", version, about, long_about = None)]
pub struct Cli {
    /// Change to this directory before starting (must exist)
    #[arg(short = 'C', long = "dir", value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Name the transcript <log_dir>/<name>.md instead of a timestamped file
    #[arg(long, value_name = "NAME")]
    pub session: Option<String>,

    /// Token passed to the backend on every call
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Initial message; fragments are joined with single spaces
    #[arg(value_name = "MESSAGE")]
    pub message: Vec<String>,
}

/// What to do after looking at the command line.
#[derive(Debug)]
pub enum Invocation {
    Run(Cli),
    /// `--help` or `--version`: print the rendered text and exit successfully.
    Print(String),
}

impl Cli {
    /// Parse from an explicit argument list (first item is the program name).
    ///
    /// Only `-C/--dir`, `--session`, `--token`, help and version are flags.
    /// Every other token, including ones starting with `-`, is message text.
    pub fn parse_args<I, T>(args: I) -> Result<Invocation, ChatError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(separate_message(args)?) {
            Ok(cli) => Ok(Invocation::Run(cli)),
            Err(e) => match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                    Ok(Invocation::Print(e.render().to_string()))
                }
                _ => {
                    let rendered = e.render().to_string();
                    let message = rendered.trim_start_matches("error: ").trim_end();
                    Err(ChatError::InvalidArguments(message.to_string()))
                }
            },
        }
    }

    /// The positional fragments joined once with single spaces, if any were given.
    pub fn initial_message(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(self.message.join(" "))
        }
    }

    /// The sanitized `--session` value. May be `Some("")` when nothing survives.
    pub fn session_name(&self) -> Option<String> {
        self.session.as_deref().map(sanitize_session_name)
    }

    /// The `--dir` target, checked to exist as a directory.
    pub fn checked_dir(&self) -> Result<Option<PathBuf>, ChatError> {
        match &self.dir {
            Some(dir) if !dir.is_dir() => Err(ChatError::DirectoryNotFound(dir.clone())),
            other => Ok(other.clone()),
        }
    }
}

/// Flags that take the following token as their value.
const VALUE_FLAGS: [(&str, &str); 4] = [
    ("-C", "--dir"),
    ("--dir", "--dir"),
    ("--session", "--session"),
    ("--token", "--token"),
];

const INFO_FLAGS: [&str; 4] = ["-h", "--help", "-V", "--version"];

/// Reorder arguments so clap sees the known flags first and every message
/// fragment after a `--` separator.
///
/// A value flag always consumes the next token verbatim, passed on as
/// `--flag=<value>` so clap never mistakes it for another flag.
fn separate_message<I, T>(args: I) -> Result<Vec<OsString>, ChatError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut flags: Vec<OsString> = args.next().into_iter().collect();
    let mut message: Vec<OsString> = Vec::new();

    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy().into_owned();
        if let Some((_, long)) = VALUE_FLAGS.iter().find(|(name, _)| *name == text) {
            let value = args.next().ok_or_else(|| {
                ChatError::InvalidArguments(format!("missing value for '{}'", text))
            })?;
            let mut joined = OsString::from(format!("{}=", long));
            joined.push(value);
            flags.push(joined);
        } else if INFO_FLAGS.contains(&text.as_str())
            || VALUE_FLAGS
                .iter()
                .any(|(_, long)| text.starts_with(&format!("{}=", long)))
        {
            flags.push(arg);
        } else {
            message.push(arg);
        }
    }

    flags.push(OsString::from("--"));
    flags.extend(message);
    Ok(flags)
}

/// Reduce a session name to `[a-z0-9_-]`: ASCII letters are lowercased,
/// digits, `-` and `_` are kept, everything else is dropped.
pub fn sanitize_session_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
