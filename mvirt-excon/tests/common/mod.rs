//! Test helpers for mvirt-excon integration tests.

#![allow(dead_code)]

use mvirt_excon::client::Invoker;
use mvirt_excon::proto::{CommandInfo, ExecutorId, ExecutorInfo, ExternalTask, TaskId, TaskInfo};
use mvirt_excon::{Codec, ProstCodec};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

/// Path to the helper binary under test.
pub const HELPER: &str = env!("CARGO_BIN_EXE_mvirt-excon");

/// Invoker for the helper with debug logging enabled.
pub fn invoker() -> Invoker {
    Invoker::new(HELPER).env("RUST_LOG", "mvirt_excon=debug")
}

/// Run the helper directly with raw arguments and empty stdin.
pub fn run_raw(args: &[&str]) -> Output {
    Command::new(HELPER)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run helper")
}

/// Run the helper directly with one request frame on stdin.
pub fn run_with_request(args: &[&str], envs: &[(&str, &str)], payload: &[u8]) -> Output {
    let mut child = Command::new(HELPER)
        .args(args)
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run helper");

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(&(payload.len() as u64).to_ne_bytes())
        .unwrap();
    stdin.write_all(payload).unwrap();
    drop(stdin);

    child.wait_with_output().expect("Failed to collect helper output")
}

/// Split helper stdout into the single reply frame it must contain.
pub fn single_frame(stdout: &[u8]) -> &[u8] {
    assert!(stdout.len() >= 8, "no frame header: {stdout:?}");
    let (header, payload) = stdout.split_at(8);
    let len = u64::from_ne_bytes(header.try_into().unwrap());
    assert_eq!(len, payload.len() as u64, "stdout must hold exactly one frame");
    payload
}

/// Encoded launch request for a task with an embedded executor.
pub fn launch_with_executor(command: &str) -> Vec<u8> {
    let external = ExternalTask {
        task: Some(TaskInfo {
            name: "integration".to_string(),
            task_id: Some(TaskId {
                value: "task-1".to_string(),
            }),
            executor: Some(ExecutorInfo {
                executor_id: Some(ExecutorId {
                    value: "executor-1".to_string(),
                }),
                command: Some(CommandInfo::shell(command)),
                ..Default::default()
            }),
            ..Default::default()
        }),
        mesos_executor_path: String::new(),
    };
    ProstCodec.encode(&external).expect("Failed to encode ExternalTask")
}

/// Encoded launch request for a task without executor.
pub fn launch_with_command(command: &str, executor_path: &str) -> Vec<u8> {
    let external = ExternalTask {
        task: Some(TaskInfo {
            name: "integration".to_string(),
            task_id: Some(TaskId {
                value: "task-2".to_string(),
            }),
            command: Some(CommandInfo::shell(command)),
            ..Default::default()
        }),
        mesos_executor_path: executor_path.to_string(),
    };
    ProstCodec.encode(&external).expect("Failed to encode ExternalTask")
}

/// Wait up to 5 seconds for a file written by a detached child.
pub async fn wait_for_file(path: &Path) -> Option<String> {
    for _ in 0..50 {
        if let Ok(contents) = std::fs::read_to_string(path) {
            if !contents.is_empty() {
                return Some(contents);
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    None
}
