//! Error types for excon.

use std::io;
use thiserror::Error;

/// Framing errors on the stdio transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Expected an 8 byte frame header, received {actual} bytes")]
    ShortHeader { actual: usize },

    /// Declared length of zero. Callers treat this as "nothing to process".
    #[error("Expected protobuf size over stdin. Received 0 bytes")]
    EmptyFrame,

    #[error("Expected {expected} bytes protobuf over stdin. Received {actual} bytes")]
    ShortPayload { expected: u64, actual: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Protobuf (de)serialization errors, tagged with the message type.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Could not serialise {message} protobuf: {reason}")]
    Encode {
        message: &'static str,
        reason: String,
    },

    #[error("Could not deserialise {message} protobuf: {reason}")]
    Decode {
        message: &'static str,
        reason: String,
    },
}

/// Failures inside a command handler. All of them end the invocation with
/// exit code 1.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Value is invalid: {0}")]
    InvalidValue(String),
}

/// Usage errors detected before any handler runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Please pass a command and a container-id")]
    MissingCommand,

    #[error("No valid command passed: '{0}'")]
    UnknownCommand(String),

    #[error("Please pass a container-id for command '{0}'")]
    MissingContainerId(String),
}

impl DispatchError {
    /// Exit code reported for every usage error.
    pub const EXIT_CODE: u8 = 2;

    pub const fn exit_code(&self) -> u8 {
        Self::EXIT_CODE
    }
}
