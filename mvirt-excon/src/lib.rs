//! mvirt-excon - External containerizer helper for the Mesos slave.
//!
//! The slave runs the helper once per container operation:
//!
//! ```text
//! mvirt-excon <command> <container-id> [arguments...] < request > reply
//! ```
//!
//! Requests and replies are single length-prefixed protobuf frames. The
//! exit code tells the slave how the command went:
//!
//! - `0`: success, or "no implementation here, use your built-in fallback"
//!   when no reply was written (`wait`, `destroy`)
//! - `1`: local failure
//! - `2`: usage error
//!
//! ## Architecture
//!
//! - **transport**: frame reader/writer over any async byte stream
//! - **codec**: injected message codec (prost)
//! - **dispatcher**: command contract, handler selection, exit codes
//! - **worker**: the per-command handlers
//! - **client**: the slave side, runs the helper and interprets its result

pub mod client;
pub mod codec;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod proto;
pub mod transport;
pub mod worker;

pub use codec::{Codec, ProstCodec};
pub use command::{Command, FallbackPolicy, Invocation, Outcome};
pub use dispatcher::Dispatcher;

use std::path::PathBuf;

/// Configuration for the dispatcher.
#[derive(Debug, Clone)]
pub struct Config {
    /// Executor started for tasks that carry no executor of their own.
    /// Falls back to the path sent by the slave in the launch request.
    pub default_executor_path: Option<PathBuf>,
    /// Name used in human readable status replies.
    pub status_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_executor_path: None,
            status_label: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}
