//! Slave side of the protocol: run the helper and interpret its result.
//!
//! Mirrors what the Mesos external containerizer does for every command:
//! start the helper, hand it the request frame, close its stdin, collect
//! stdout until EOF and look at the exit status.

use crate::codec::Codec;
use crate::command::Command;
use crate::error::{CodecError, TransportError};
use crate::proto::ProtocolMessage;
use crate::transport;
use std::ffi::OsString;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The helper implemented the command and replied with this payload.
    Implemented(Vec<u8>),
    /// Exit 0 without output: the slave should use its built-in handling.
    FallbackRequested,
}

impl Reply {
    /// Decode the reply payload. `None` when a fallback was requested.
    pub fn decode<C, M>(&self, codec: &C) -> Result<Option<M>, CodecError>
    where
        C: Codec,
        M: ProtocolMessage,
    {
        match self {
            Reply::Implemented(payload) => codec.decode(payload).map(Some),
            Reply::FallbackRequested => Ok(None),
        }
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Failed to spawn external containerizer: {0}")]
    Spawn(#[source] io::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("External containerizer terminated by signal {0}")]
    Signaled(String),

    #[error("External containerizer failed (exit: {code})")]
    Failed { code: i32 },

    #[error("No exit-code available")]
    NoExitCode,

    #[error("Could not receive any result: {0}")]
    Malformed(#[from] TransportError),

    #[error("Result carries {0} bytes after the reply frame")]
    TrailingBytes(usize),
}

/// Runs the helper binary once per command.
#[derive(Debug, Clone)]
pub struct Invoker {
    helper: PathBuf,
    envs: Vec<(OsString, OsString)>,
}

impl Invoker {
    pub fn new(helper: impl Into<PathBuf>) -> Self {
        Self {
            helper: helper.into(),
            envs: Vec::new(),
        }
    }

    /// Extra environment for the helper, on top of the inherited one.
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Run `helper <command> <container_id>` and interpret the result.
    pub async fn invoke(
        &self,
        command: Command,
        container_id: &str,
        request: Option<&[u8]>,
    ) -> Result<Reply, InvokeError> {
        debug!(%command, container_id, helper = %self.helper.display(), "Invoking helper");

        let mut child = tokio::process::Command::new(&self.helper)
            .arg(command.as_str())
            .arg(container_id)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(InvokeError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Some(request) = request {
                match transport::send_frame(&mut stdin, request).await {
                    Ok(()) => {}
                    // The helper may exit before reading; its exit status tells why.
                    Err(TransportError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                        debug!(%command, container_id, "Helper closed stdin early");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            // Dropping stdin closes the pipe so the helper sees EOF.
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut output).await?;
        }
        let status = child.wait().await?;

        interpret(command, status, output).await
    }
}

async fn interpret(
    command: Command,
    status: ExitStatus,
    output: Vec<u8>,
) -> Result<Reply, InvokeError> {
    if let Some(signal) = status.signal() {
        let name = nix::sys::signal::Signal::try_from(signal)
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|_| signal.to_string());
        return Err(InvokeError::Signaled(name));
    }

    match status.code() {
        Some(0) => {}
        Some(code) => return Err(InvokeError::Failed { code }),
        None => return Err(InvokeError::NoExitCode),
    }

    if output.is_empty() {
        info!(
            %command,
            "External containerizer exited 0 and had no output, which requests the default implementation"
        );
        return Ok(Reply::FallbackRequested);
    }

    let mut remaining = output.as_slice();
    let payload = transport::receive_frame(&mut remaining).await?;
    if !remaining.is_empty() {
        return Err(InvokeError::TrailingBytes(remaining.len()));
    }

    Ok(Reply::Implemented(payload))
}
