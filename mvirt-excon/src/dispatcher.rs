//! Dispatcher - Routes an invocation to its handler.

use crate::codec::Codec;
use crate::command::{Command, Invocation, Outcome};
use crate::error::{HandlerError, TransportError};
use crate::{Config, worker};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info, warn};

/// Runs one invocation against the injected codec and configuration.
pub struct Dispatcher<C> {
    codec: C,
    config: Config,
}

impl<C: Codec> Dispatcher<C> {
    pub fn new(codec: C, config: Config) -> Self {
        Self { codec, config }
    }

    /// Run the handler bound to the invocation's command.
    ///
    /// Handler errors never escape: they are logged and reported as
    /// [`Outcome::LocalFailure`]. `output` only ever sees complete frames.
    pub async fn dispatch<R, W>(
        &self,
        invocation: &Invocation,
        input: &mut R,
        output: &mut W,
    ) -> Outcome
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let command = invocation.command();
        let container_id = invocation.container_id();

        info!(
            %command,
            container_id,
            arguments = ?invocation.arguments(),
            input = ?command.input(),
            fallback = ?command.fallback(),
            "Dispatching command"
        );

        let result = match command {
            Command::Launch => {
                worker::handle_launch(&self.codec, &self.config, invocation, input, output).await
            }
            Command::Update => {
                worker::handle_update(&self.codec, &self.config, invocation, input, output).await
            }
            Command::Usage => worker::handle_usage(&self.codec, invocation, output).await,
            Command::Wait | Command::Destroy => Ok(worker::request_fallback(invocation)),
        };

        match result {
            Ok(outcome) => outcome,
            Err(HandlerError::Transport(TransportError::EmptyFrame)) => {
                warn!(%command, container_id, "{}", TransportError::EmptyFrame);
                Outcome::LocalFailure
            }
            Err(e) => {
                error!(%command, container_id, "{e}");
                Outcome::LocalFailure
            }
        }
    }
}
