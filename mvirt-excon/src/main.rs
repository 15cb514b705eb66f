//! mvirt-excon - External containerizer helper.
//!
//! Invoked by the Mesos slave once per container operation. Logs go to
//! stderr, stdout carries nothing but the reply frame.

use clap::{CommandFactory, Parser};
use mvirt_excon::command::Command;
use mvirt_excon::{Config, Dispatcher, Invocation, Outcome, ProstCodec};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncWriteExt;
use tracing::error;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// External containerizer helper for the Mesos slave.
#[derive(Parser)]
#[command(name = "mvirt-excon")]
#[command(version = VERSION)]
#[command(about = "External containerizer helper for the Mesos slave")]
#[command(after_help = "Valid commands: launch, update, usage, wait, destroy")]
struct Args {
    /// Executor started for tasks without an executor of their own
    #[arg(long, env = "MVIRT_EXCON_EXECUTOR_PATH")]
    executor_path: Option<PathBuf>,

    /// Command, container id and the arguments passed on to the command.
    /// Everything after the command is taken verbatim, flags included.
    #[arg(
        value_name = "COMMAND CONTAINER_ID [ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    words: Vec<String>,
}

impl Args {
    /// Split the positional words into command, container id and the rest.
    fn into_parts(self) -> (Option<String>, Option<String>, Vec<String>) {
        let mut words = self.words.into_iter();
        let command = words.next();
        let container_id = words.next();
        (command, container_id, words.collect())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mvirt_excon=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse();
    let executor_path = args.executor_path.clone();
    let (command, container_id, arguments) = args.into_parts();

    let invocation = match Invocation::new(command.as_deref(), container_id.as_deref(), arguments)
    {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", Args::command().render_usage());
            eprintln!("Valid commands: {}", Command::valid_names());
            return ExitCode::from(e.exit_code());
        }
    };

    let config = Config {
        default_executor_path: executor_path,
        ..Config::default()
    };
    let dispatcher = Dispatcher::new(ProstCodec, config);

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();

    let outcome = dispatcher.dispatch(&invocation, &mut stdin, &mut stdout).await;

    // The slave reads until EOF; fd 1 is closed on exit, make sure nothing
    // is left buffered before that.
    if let Err(e) = stdout.shutdown().await {
        error!("Failed to close stdout: {e}");
        return ExitCode::from(Outcome::LocalFailure.exit_code());
    }

    ExitCode::from(outcome.exit_code())
}
