use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::IpcBenchError;

/// IPC mechanism under test; each one maps to a `<name>_thr` executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpcMethod {
    Pipe,
    #[value(name = "named_pipe")]
    NamedPipe,
    Unix,
    Msgq,
    Tcp,
}

impl IpcMethod {
    /// All methods in report order.
    pub const ALL: [IpcMethod; 5] = [
        IpcMethod::Pipe,
        IpcMethod::NamedPipe,
        IpcMethod::Unix,
        IpcMethod::Msgq,
        IpcMethod::Tcp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IpcMethod::Pipe => "pipe",
            IpcMethod::NamedPipe => "named_pipe",
            IpcMethod::Unix => "unix",
            IpcMethod::Msgq => "msgq",
            IpcMethod::Tcp => "tcp",
        }
    }

    pub fn default_program(self) -> &'static str {
        match self {
            IpcMethod::Pipe => "pipe_thr",
            IpcMethod::NamedPipe => "named_pipe_thr",
            IpcMethod::Unix => "unix_thr",
            IpcMethod::Msgq => "msgq_thr",
            IpcMethod::Tcp => "tcp_thr",
        }
    }
}

impl fmt::Display for IpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One benchmark invocation's parsed output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestResult {
    pub message_size: u64,
    pub message_count: u64,
    pub avg_throughput_msgs: u64,
    pub avg_throughput_mbs: u64,
}

/// Input parameters shared by every run of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchParams {
    pub message_size: u64,
    pub message_count: u64,
    pub test_count: u64,
}

/// Per-method averages across a batch. Size, count and test count are echoed
/// from `BatchParams`, never taken from the runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResult {
    pub message_size: u64,
    pub message_count: u64,
    pub test_count: u64,
    pub avg_throughput_msgs: f64,
    pub avg_throughput_mbs: f64,
}

/// Outcome of one method's batch, kept in report order.
#[derive(Debug)]
pub struct MethodOutcome {
    pub method: IpcMethod,
    pub result: Result<AggregatedResult, IpcBenchError>,
}

/// Host facts shown in the report header, as read from the system files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    pub os: String,
    pub cpu_name: String,
    pub cpu_cache_size: String,
    pub cpu_cores: String,
    pub system_memory: String,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Default,
    Short,
}
