//! Commands, invocation context and handler outcomes.

use crate::error::DispatchError;
use crate::proto::{
    ExternalStatus, ExternalTask, ProtocolMessage, ResourceArray, ResourceStatistics, Termination,
};
use std::fmt;
use std::str::FromStr;

/// The closed set of commands the slave may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Launch,
    Update,
    Usage,
    Wait,
    Destroy,
}

/// What the slave does when a handler performs no real work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// No fallback exists; the helper must implement the command.
    Required,
    /// The slave silently ignores a missing implementation.
    Ignored,
    /// No fallback is declared for the command.
    Undeclared,
    /// Success without a reply makes the slave run its built-in handling.
    BuiltIn,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Launch,
        Command::Update,
        Command::Usage,
        Command::Wait,
        Command::Destroy,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Command::Launch => "launch",
            Command::Update => "update",
            Command::Usage => "usage",
            Command::Wait => "wait",
            Command::Destroy => "destroy",
        }
    }

    /// Message type expected as a frame on stdin, if any.
    pub const fn input(&self) -> Option<&'static str> {
        match self {
            Command::Launch => Some(ExternalTask::NAME),
            Command::Update => Some(ResourceArray::NAME),
            Command::Usage | Command::Wait | Command::Destroy => None,
        }
    }

    /// Message type written as a frame on stdout by a complete implementation.
    pub const fn output(&self) -> &'static str {
        match self {
            Command::Launch | Command::Update | Command::Destroy => ExternalStatus::NAME,
            Command::Usage => ResourceStatistics::NAME,
            Command::Wait => Termination::NAME,
        }
    }

    pub const fn fallback(&self) -> FallbackPolicy {
        match self {
            Command::Launch => FallbackPolicy::Required,
            Command::Update => FallbackPolicy::Ignored,
            Command::Usage => FallbackPolicy::Undeclared,
            Command::Wait | Command::Destroy => FallbackPolicy::BuiltIn,
        }
    }

    /// Comma separated list of valid command names, for usage text.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(Command::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownCommand(s.to_string()))
    }
}

/// Result of running a handler, before it becomes an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    LocalFailure,
    /// Exited cleanly without a reply so the slave applies its fallback.
    FallbackRequested,
}

impl Outcome {
    pub const fn exit_code(self) -> u8 {
        match self {
            Outcome::Success | Outcome::FallbackRequested => 0,
            Outcome::LocalFailure => 1,
        }
    }
}

/// Arguments of a single helper process: built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    command: Command,
    container_id: String,
    arguments: Vec<String>,
}

impl Invocation {
    /// Validate raw startup arguments.
    ///
    /// The command name is checked before the container id, so an unknown
    /// command is reported even when the id is missing as well.
    pub fn new(
        command: Option<&str>,
        container_id: Option<&str>,
        arguments: Vec<String>,
    ) -> Result<Self, DispatchError> {
        let command: Command = command.ok_or(DispatchError::MissingCommand)?.parse()?;

        let container_id =
            container_id.ok_or_else(|| DispatchError::MissingContainerId(command.to_string()))?;

        Ok(Self {
            command,
            container_id: container_id.to_string(),
            arguments,
        })
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_roundtrip() {
        for command in Command::ALL {
            let parsed: Command = command.as_str().parse().unwrap();
            assert_eq!(parsed, command);
        }
    }

    #[test]
    fn test_unknown_command() {
        for name in ["", "Launch", "LAUNCH", "kill", "recover", "launch ", "containers"] {
            let err = name.parse::<Command>().unwrap_err();
            assert_eq!(err, DispatchError::UnknownCommand(name.to_string()));
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_contract_table() {
        assert_eq!(Command::Launch.input(), Some("ExternalTask"));
        assert_eq!(Command::Update.input(), Some("ResourceArray"));
        assert_eq!(Command::Usage.input(), None);
        assert_eq!(Command::Wait.input(), None);
        assert_eq!(Command::Destroy.input(), None);

        assert_eq!(Command::Launch.output(), "ExternalStatus");
        assert_eq!(Command::Usage.output(), "ResourceStatistics");
        assert_eq!(Command::Wait.output(), "Termination");

        assert_eq!(Command::Launch.fallback(), FallbackPolicy::Required);
        assert_eq!(Command::Update.fallback(), FallbackPolicy::Ignored);
        assert_eq!(Command::Usage.fallback(), FallbackPolicy::Undeclared);
        assert_eq!(Command::Wait.fallback(), FallbackPolicy::BuiltIn);
        assert_eq!(Command::Destroy.fallback(), FallbackPolicy::BuiltIn);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::FallbackRequested.exit_code(), 0);
        assert_eq!(Outcome::LocalFailure.exit_code(), 1);
    }

    #[test]
    fn test_invocation_valid() {
        let invocation = Invocation::new(
            Some("launch"),
            Some("c-1"),
            vec!["--foo".to_string(), "bar".to_string()],
        )
        .unwrap();

        assert_eq!(invocation.command(), Command::Launch);
        assert_eq!(invocation.container_id(), "c-1");
        assert_eq!(invocation.arguments(), ["--foo", "bar"]);
    }

    #[test]
    fn test_invocation_missing_arguments() {
        assert_eq!(
            Invocation::new(None, None, vec![]).unwrap_err(),
            DispatchError::MissingCommand
        );
        assert_eq!(
            Invocation::new(Some("wait"), None, vec![]).unwrap_err(),
            DispatchError::MissingContainerId("wait".to_string())
        );
    }

    #[test]
    fn test_invocation_empty_container_id() {
        // Present but empty still counts as passed.
        let invocation = Invocation::new(Some("wait"), Some(""), vec![]).unwrap();
        assert_eq!(invocation.command(), Command::Wait);
        assert_eq!(invocation.container_id(), "");
    }

    #[test]
    fn test_unknown_command_wins_over_missing_id() {
        assert_eq!(
            Invocation::new(Some("kill"), None, vec![]).unwrap_err(),
            DispatchError::UnknownCommand("kill".to_string())
        );
    }

    #[test]
    fn test_valid_names() {
        assert_eq!(
            Command::valid_names(),
            "launch, update, usage, wait, destroy"
        );
    }
}
