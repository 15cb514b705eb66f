//! Command handlers.
//!
//! Each handler owns one command's I/O: it reads the request frame (if the
//! command takes one), does the work and writes the reply frame. Errors are
//! returned to the dispatcher, which turns them into exit code 1.

use crate::codec::Codec;
use crate::command::{Invocation, Outcome};
use crate::error::HandlerError;
use crate::proto::{ExternalStatus, ExternalTask, ResourceArray, ResourceStatistics};
use crate::{Config, transport};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

/// Sample values reported by `usage`.
pub const SAMPLE_MEM_BYTES: u64 = 1024 * 1024 * 1024;
pub const SAMPLE_CPUS_LIMIT: f64 = 2.0;
pub const SAMPLE_CPUS_USER_TIME_SECS: f64 = 0.12;
pub const SAMPLE_CPUS_SYSTEM_TIME_SECS: f64 = 0.5;

/// Where the launched command line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorSource {
    /// The task embeds its own executor.
    Embedded,
    /// No executor in the task: the default executor wraps the task command.
    Default,
}

/// Command line started by `launch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub source: ExecutorSource,
}

impl LaunchPlan {
    /// Pick the executor for a launch request.
    ///
    /// An embedded executor runs as `sh -c <executor command>`. Otherwise the
    /// default executor runs `sh -c <task command>`; the configured path
    /// takes precedence over the one sent by the slave.
    pub fn select(external: &ExternalTask, config: &Config) -> Result<Self, HandlerError> {
        let task = external
            .task
            .as_ref()
            .ok_or_else(|| HandlerError::InvalidValue("launch request carries no task".into()))?;

        if let Some(executor) = &task.executor {
            let value = shell_command(
                executor.command.as_ref().and_then(|c| c.value.as_deref()),
                "executor command",
            )?;
            return Ok(Self {
                program: PathBuf::from("sh"),
                args: vec!["-c".to_string(), value],
                source: ExecutorSource::Embedded,
            });
        }

        let program = config
            .default_executor_path
            .clone()
            .or_else(|| {
                (!external.mesos_executor_path.is_empty())
                    .then(|| PathBuf::from(&external.mesos_executor_path))
            })
            .ok_or_else(|| HandlerError::InvalidValue("no default executor path".into()))?;

        let value = shell_command(
            task.command.as_ref().and_then(|c| c.value.as_deref()),
            "task command",
        )?;

        Ok(Self {
            program,
            args: vec!["sh".to_string(), "-c".to_string(), value],
            source: ExecutorSource::Default,
        })
    }

    /// Program followed by its arguments.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Start the command and return its pid.
    ///
    /// The child inherits the environment and stderr. Its stdout goes to our
    /// stderr so it can never corrupt the reply frame. The child is not
    /// waited for: once the status reply is out it belongs to the slave.
    pub fn spawn(&self) -> Result<u32, HandlerError> {
        let child = std::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .spawn()
            .map_err(|source| HandlerError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        Ok(child.id())
    }
}

fn shell_command(value: Option<&str>, what: &str) -> Result<String, HandlerError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(HandlerError::InvalidValue(format!("{what} is empty"))),
    }
}

/// Human readable status reply. The slave reads an empty reply as "not
/// implemented", so the message must carry text.
pub fn status_reply(
    config: &Config,
    command: &str,
    pid: Option<u32>,
) -> Result<ExternalStatus, HandlerError> {
    let label = config.status_label.trim();
    if label.is_empty() {
        return Err(HandlerError::InvalidValue("status label is empty".into()));
    }

    Ok(ExternalStatus {
        message: format!("{label} reports on {command}."),
        pid,
    })
}

/// Handle `launch`: start the task's executor and report its pid.
pub async fn handle_launch<C, R, W>(
    codec: &C,
    config: &Config,
    invocation: &Invocation,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome, HandlerError>
where
    C: Codec,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let container_id = invocation.container_id();

    let payload = transport::receive_frame(input).await?;
    let external: ExternalTask = codec.decode(&payload)?;

    let plan = LaunchPlan::select(&external, config)?;
    if plan.source == ExecutorSource::Default {
        warn!(
            container_id,
            executor = %plan.program.display(),
            "No executor passed; using default executor"
        );
    }

    debug!(container_id, command_line = ?plan.command_line(), "Starting executor");
    let pid = plan.spawn()?;
    info!(container_id, pid, "Executor started");

    let status = status_reply(config, "launch", Some(pid))?;
    let reply = codec.encode(&status)?;
    transport::send_frame(output, &reply).await?;

    Ok(Outcome::Success)
}

/// Handle `update`: acknowledge the new resource set.
pub async fn handle_update<C, R, W>(
    codec: &C,
    config: &Config,
    invocation: &Invocation,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome, HandlerError>
where
    C: Codec,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let payload = transport::receive_frame(input).await?;
    let resources: ResourceArray = codec.decode(&payload)?;

    info!(
        container_id = invocation.container_id(),
        count = resources.resource.len(),
        "Received resource elements"
    );

    let status = status_reply(config, "update", None)?;
    let reply = codec.encode(&status)?;
    transport::send_frame(output, &reply).await?;

    Ok(Outcome::Success)
}

/// Point-in-time statistics with sample values.
pub fn sample_statistics() -> Result<ResourceStatistics, HandlerError> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| HandlerError::InvalidValue(format!("system clock before epoch: {e}")))?
        .as_secs_f64();

    Ok(ResourceStatistics {
        timestamp,
        mem_rss_bytes: Some(SAMPLE_MEM_BYTES),
        mem_limit_bytes: Some(SAMPLE_MEM_BYTES),
        cpus_limit: Some(SAMPLE_CPUS_LIMIT),
        cpus_user_time_secs: Some(SAMPLE_CPUS_USER_TIME_SECS),
        cpus_system_time_secs: Some(SAMPLE_CPUS_SYSTEM_TIME_SECS),
        ..Default::default()
    })
}

/// Handle `usage`: report resource statistics. Reads nothing from stdin.
pub async fn handle_usage<C, W>(
    codec: &C,
    invocation: &Invocation,
    output: &mut W,
) -> Result<Outcome, HandlerError>
where
    C: Codec,
    W: AsyncWrite + Unpin,
{
    let statistics = sample_statistics()?;
    let reply = codec.encode(&statistics)?;
    transport::send_frame(output, &reply).await?;

    debug!(container_id = invocation.container_id(), "Reported usage");
    Ok(Outcome::Success)
}

/// Handle `wait` and `destroy`: no I/O at all, the clean exit without a
/// reply makes the slave use its own implementation.
pub fn request_fallback(invocation: &Invocation) -> Outcome {
    debug!(
        container_id = invocation.container_id(),
        command = %invocation.command(),
        "Requesting built-in fallback"
    );
    Outcome::FallbackRequested
}
