use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::errors::IpcBenchError;
use crate::parse;
use crate::types::{AggregatedResult, BatchParams, TestResult};

/// Executes a single benchmark run.
pub trait TestRunner {
    fn run_test(&self, message_size: u64, message_count: u64) -> Result<TestResult, IpcBenchError>;
}

/// Runs an external `*_thr` executable as `program <message_size> <message_count>`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl TestRunner for ProcessRunner {
    fn run_test(&self, message_size: u64, message_count: u64) -> Result<TestResult, IpcBenchError> {
        run_test(&self.program, message_size, message_count)
    }
}

/// Spawn the benchmark once and parse its stdout.
///
/// Blocks until the child exits; no timeout is applied. The child's stderr is
/// captured but only logged, and a non-zero exit status is not an error.
pub fn run_test(
    program: &Path,
    message_size: u64,
    message_count: u64,
) -> Result<TestResult, IpcBenchError> {
    let start = Instant::now();
    let output = Command::new(program)
        .arg(message_size.to_string())
        .arg(message_count.to_string())
        .output()
        .map_err(|source| IpcBenchError::ProcessLaunch {
            program: program.to_path_buf(),
            source,
        })?;

    debug!(
        program = %program.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "benchmark run finished"
    );

    if !output.stderr.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            program = %program.display(),
            stderr = %stderr.trim_end(),
            "benchmark wrote to stderr"
        );
    }

    if !output.status.success() {
        warn!(
            program = %program.display(),
            status = %output.status,
            "benchmark exited unsuccessfully"
        );
    }

    let result = parse::parse_output(output.stdout.as_slice())?;

    if result.message_size != message_size || result.message_count != message_count {
        warn!(
            program = %program.display(),
            requested_size = message_size,
            reported_size = result.message_size,
            requested_count = message_count,
            reported_count = result.message_count,
            "benchmark reported different parameters than requested"
        );
    }

    Ok(result)
}

/// Run a batch of `test_count` sequential runs and average them.
///
/// The first failing run fails the whole batch.
pub fn run_tests<R: TestRunner + ?Sized>(
    runner: &R,
    params: BatchParams,
) -> Result<AggregatedResult, IpcBenchError> {
    if params.test_count == 0 {
        return Err(IpcBenchError::NoData);
    }

    let mut results = Vec::new();
    for run in 1..=params.test_count {
        debug!(run, of = params.test_count, "starting benchmark run");
        results.push(runner.run_test(params.message_size, params.message_count)?);
    }

    let aggregated = aggregate(&results, params)?;
    info!(
        runs = params.test_count,
        avg_msgs = aggregated.avg_throughput_msgs,
        avg_mbs = aggregated.avg_throughput_mbs,
        "batch complete"
    );
    Ok(aggregated)
}

/// Arithmetic means of both throughput figures; parameters are echoed verbatim.
pub fn aggregate(
    results: &[TestResult],
    params: BatchParams,
) -> Result<AggregatedResult, IpcBenchError> {
    if results.is_empty() {
        return Err(IpcBenchError::NoData);
    }

    let n = results.len() as f64;
    let sum_msgs: f64 = results.iter().map(|r| r.avg_throughput_msgs as f64).sum();
    let sum_mbs: f64 = results.iter().map(|r| r.avg_throughput_mbs as f64).sum();

    Ok(AggregatedResult {
        message_size: params.message_size,
        message_count: params.message_count,
        test_count: params.test_count,
        avg_throughput_msgs: sum_msgs / n,
        avg_throughput_mbs: sum_mbs / n,
    })
}
