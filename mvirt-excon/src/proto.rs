//! Protobuf messages exchanged with the Mesos slave.
//!
//! Only the subset of the Mesos schema the helper reads or writes is
//! mirrored here. Field tags follow `mesos.proto` and `containerizer.proto`
//! so the encoded bytes are wire compatible with the slave.

#![allow(clippy::derive_partial_eq_without_eq)]

/// A prost message that travels over the frame transport.
///
/// `NAME` is used in diagnostics ("Could not deserialise ExternalTask ...").
pub trait ProtocolMessage: prost::Message + Default {
    const NAME: &'static str;
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TaskId {
    #[prost(string, required, tag = "1")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SlaveId {
    #[prost(string, required, tag = "1")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecutorId {
    #[prost(string, required, tag = "1")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FrameworkId {
    #[prost(string, required, tag = "1")]
    pub value: String,
}

/// Typed resource values.
pub mod value {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Scalar = 0,
        Ranges = 1,
        Set = 2,
        Text = 3,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Scalar {
        #[prost(double, required, tag = "1")]
        pub value: f64,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Range {
        #[prost(uint64, required, tag = "1")]
        pub begin: u64,
        #[prost(uint64, required, tag = "2")]
        pub end: u64,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Ranges {
        #[prost(message, repeated, tag = "1")]
        pub range: Vec<Range>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Set {
        #[prost(string, repeated, tag = "1")]
        pub item: Vec<String>,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Resource {
    #[prost(string, required, tag = "1")]
    pub name: String,
    #[prost(enumeration = "value::Type", required, tag = "2")]
    pub r#type: i32,
    #[prost(message, optional, tag = "3")]
    pub scalar: Option<value::Scalar>,
    #[prost(message, optional, tag = "4")]
    pub ranges: Option<value::Ranges>,
    #[prost(message, optional, tag = "5")]
    pub set: Option<value::Set>,
    #[prost(string, optional, tag = "6", default = "*")]
    pub role: Option<String>,
}

impl Resource {
    /// Scalar resource such as `cpus` or `mem`.
    pub fn scalar(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            r#type: value::Type::Scalar as i32,
            scalar: Some(value::Scalar { value: amount }),
            ..Default::default()
        }
    }
}

/// Environment handed to a command.
pub mod environment {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Variable {
        #[prost(string, required, tag = "1")]
        pub name: String,
        #[prost(string, required, tag = "2")]
        pub value: String,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Environment {
    #[prost(message, repeated, tag = "1")]
    pub variables: Vec<environment::Variable>,
}

pub mod command_info {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Uri {
        #[prost(string, required, tag = "1")]
        pub value: String,
        #[prost(bool, optional, tag = "2")]
        pub executable: Option<bool>,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommandInfo {
    #[prost(message, repeated, tag = "1")]
    pub uris: Vec<command_info::Uri>,
    #[prost(message, optional, tag = "2")]
    pub environment: Option<Environment>,
    #[prost(string, optional, tag = "3")]
    pub value: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub user: Option<String>,
}

impl CommandInfo {
    /// Shell command line with no URIs or environment.
    pub fn shell(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecutorInfo {
    #[prost(message, optional, tag = "1")]
    pub executor_id: Option<ExecutorId>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub data: Option<Vec<u8>>,
    #[prost(message, repeated, tag = "5")]
    pub resources: Vec<Resource>,
    #[prost(message, optional, tag = "7")]
    pub command: Option<CommandInfo>,
    #[prost(message, optional, tag = "8")]
    pub framework_id: Option<FrameworkId>,
    #[prost(string, optional, tag = "9")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "10")]
    pub source: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TaskInfo {
    #[prost(string, required, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub task_id: Option<TaskId>,
    #[prost(message, optional, tag = "3")]
    pub slave_id: Option<SlaveId>,
    #[prost(message, repeated, tag = "4")]
    pub resources: Vec<Resource>,
    #[prost(message, optional, tag = "5")]
    pub executor: Option<ExecutorInfo>,
    #[prost(bytes = "vec", optional, tag = "6")]
    pub data: Option<Vec<u8>>,
    #[prost(message, optional, tag = "7")]
    pub command: Option<CommandInfo>,
}

/// Request for `launch`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExternalTask {
    #[prost(message, optional, tag = "1")]
    pub task: Option<TaskInfo>,
    #[prost(string, required, tag = "2")]
    pub mesos_executor_path: String,
}

/// Reply for `launch`, `update` and `destroy`. The slave treats an empty
/// result as "not implemented", so `message` must never be empty.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExternalStatus {
    #[prost(string, required, tag = "1")]
    pub message: String,
    #[prost(uint32, optional, tag = "2")]
    pub pid: Option<u32>,
}

/// Request for `update`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceArray {
    #[prost(message, repeated, tag = "1")]
    pub resource: Vec<Resource>,
}

/// Reply for `usage`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceStatistics {
    #[prost(double, required, tag = "1")]
    pub timestamp: f64,
    #[prost(double, optional, tag = "2")]
    pub cpus_user_time_secs: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub cpus_system_time_secs: Option<f64>,
    #[prost(double, optional, tag = "4")]
    pub cpus_limit: Option<f64>,
    #[prost(uint64, optional, tag = "5")]
    pub mem_rss_bytes: Option<u64>,
    #[prost(uint64, optional, tag = "6")]
    pub mem_limit_bytes: Option<u64>,
    #[prost(uint32, optional, tag = "7")]
    pub cpus_nr_periods: Option<u32>,
    #[prost(uint32, optional, tag = "8")]
    pub cpus_nr_throttled: Option<u32>,
    #[prost(double, optional, tag = "9")]
    pub cpus_throttled_time_secs: Option<f64>,
    #[prost(uint64, optional, tag = "10")]
    pub mem_file_bytes: Option<u64>,
    #[prost(uint64, optional, tag = "11")]
    pub mem_anon_bytes: Option<u64>,
    #[prost(uint64, optional, tag = "12")]
    pub mem_mapped_file_bytes: Option<u64>,
}

/// Reply for `wait`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Termination {
    #[prost(bool, required, tag = "1")]
    pub killed: bool,
    #[prost(string, required, tag = "2")]
    pub message: String,
    #[prost(int32, optional, tag = "3")]
    pub status: Option<i32>,
}

macro_rules! protocol_messages {
    ($($ty:ident),* $(,)?) => {
        $(
            impl ProtocolMessage for $ty {
                const NAME: &'static str = stringify!($ty);
            }
        )*
    };
}

protocol_messages!(
    ExternalTask,
    ExternalStatus,
    ResourceArray,
    ResourceStatistics,
    Termination,
);
