use std::io::BufRead;

use crate::errors::IpcBenchError;
use crate::types::TestResult;

const LABEL_MESSAGE_SIZE: &str = "message size";
const LABEL_MESSAGE_COUNT: &str = "message count";
const LABEL_THROUGHPUT: &str = "average throughput";

const UNIT_MSGS: &str = "msg/s";
const UNIT_MBS: &str = "Mb/s";

/// A single line of benchmark output, split on its first colon.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    LabelValue { label: &'a str, value: &'a str },
    Malformed(&'a str),
}

/// The four values a well-formed benchmark run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    MessageSize,
    MessageCount,
    ThroughputMsgs,
    ThroughputMbs,
}

impl Metric {
    const ALL: [Metric; 4] = [
        Metric::MessageSize,
        Metric::MessageCount,
        Metric::ThroughputMsgs,
        Metric::ThroughputMbs,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn describe(self) -> &'static str {
        match self {
            Metric::MessageSize => "message size",
            Metric::MessageCount => "message count",
            Metric::ThroughputMsgs => "average throughput (msg/s)",
            Metric::ThroughputMbs => "average throughput (Mb/s)",
        }
    }
}

pub fn split_line(raw: &str) -> Line<'_> {
    match raw.split_once(':') {
        Some((label, value)) => Line::LabelValue {
            label: label.trim(),
            value: value.trim(),
        },
        None => Line::Malformed(raw.trim()),
    }
}

/// Map a label and its value text to the metric it reports.
///
/// Throughput lines are disambiguated by their trailing unit suffix.
pub fn classify(label: &str, value: &str) -> Option<Metric> {
    match label {
        LABEL_MESSAGE_SIZE => Some(Metric::MessageSize),
        LABEL_MESSAGE_COUNT => Some(Metric::MessageCount),
        LABEL_THROUGHPUT => {
            if value.ends_with(UNIT_MSGS) {
                Some(Metric::ThroughputMsgs)
            } else if value.ends_with(UNIT_MBS) {
                Some(Metric::ThroughputMbs)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Parse the leading integer token of a value such as `"5000 msg/s"`.
pub fn leading_integer(value: &str) -> Option<u64> {
    value.split_whitespace().next()?.parse().ok()
}

/// Parse one run's stdout into a `TestResult`.
///
/// Blank lines are skipped. Every other line must be one of the four known
/// metrics, each reported exactly once.
pub fn parse_output<R: BufRead>(reader: R) -> Result<TestResult, IpcBenchError> {
    let mut values: [Option<u64>; 4] = [None; 4];

    for (idx, line_result) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let raw = line_result.map_err(|e| IpcBenchError::UnknownData {
            line: line_no,
            detail: format!("unreadable output: {}", e),
        })?;

        if raw.trim().is_empty() {
            continue;
        }

        let (label, value) = match split_line(&raw) {
            Line::LabelValue { label, value } => (label, value),
            Line::Malformed(text) => {
                return Err(IpcBenchError::UnknownData {
                    line: line_no,
                    detail: format!("expected 'label: value', got '{}'", text),
                });
            }
        };

        let metric = classify(label, value).ok_or_else(|| IpcBenchError::UnknownData {
            line: line_no,
            detail: format!("unrecognized '{}: {}'", label, value),
        })?;

        let number = leading_integer(value).ok_or_else(|| IpcBenchError::UnknownData {
            line: line_no,
            detail: format!("no integer value in '{}'", value),
        })?;

        let slot = &mut values[metric.index()];
        if slot.is_some() {
            return Err(IpcBenchError::UnknownData {
                line: line_no,
                detail: format!("{} reported more than once", metric.describe()),
            });
        }
        *slot = Some(number);
    }

    match values {
        [Some(message_size), Some(message_count), Some(avg_throughput_msgs), Some(avg_throughput_mbs)] => {
            Ok(TestResult {
                message_size,
                message_count,
                avg_throughput_msgs,
                avg_throughput_mbs,
            })
        }
        _ => {
            let missing: Vec<&str> = Metric::ALL
                .iter()
                .filter(|m| values[m.index()].is_none())
                .map(|m| m.describe())
                .collect();
            Err(IpcBenchError::IncompleteData {
                missing: missing.join(", "),
            })
        }
    }
}
