// ABOUTME: Entry point for chatlog — a transcript-keeping wrapper around an AI chat CLI.
// ABOUTME: Parses CLI args, loads config, and runs one session; fatal errors exit with code 1.

use std::process::ExitCode;

use chatlog::app::App;
use chatlog::cli::{Cli, Invocation};
use chatlog::config::Config;
use chatlog::error::{ChatError, ErrorKind};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("CHATLOG_LOG", "warn"))
        .format_timestamp(None)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let chat_error = e.downcast_ref::<ChatError>();
            let label = match chat_error.map(ChatError::kind) {
                Some(ErrorKind::Configuration) => "configuration error",
                Some(ErrorKind::Environment) => "environment error",
                None => "error",
            };
            eprintln!("chatlog: {}: {:#}", label, e);
            ExitCode::from(chat_error.map_or(1, ChatError::exit_code))
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = match Cli::parse_args(std::env::args_os())? {
        Invocation::Run(cli) => cli,
        Invocation::Print(text) => {
            print!("{}", text);
            return Ok(());
        }
    };
    let config = Config::load()?;
    App::new(config, cli).run().await
}
