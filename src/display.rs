use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;

use crate::types::{AggregatedResult, EnvironmentInfo, MethodOutcome};

const RULE_WIDTH: usize = 80;

// Style constants
fn style_method() -> Style {
    Style::new().cyan().bold()
}

fn style_failure() -> Style {
    Style::new().red().bold()
}

fn rule(c: char) -> String {
    let line: String = std::iter::repeat_n(c, RULE_WIDTH).collect();
    line.if_supports_color(Stream::Stdout, |s| s.dimmed())
        .to_string()
}

/// Format a throughput average with two decimals, e.g. `6000.00`.
pub fn format_throughput(value: f64) -> String {
    format!("{:.2}", value)
}

/// Environment banner shown above the per-method blocks.
pub fn format_environment(env: &EnvironmentInfo, now: DateTime<Utc>) -> String {
    format!(
        "Date: {}\nOS: {}\nCPU-Name: {}\nCPU-Cores: {}\nCPU-Cache: {}\nSystem-Memory: {}\n",
        now.format("%Y-%m-%d %H:%M:%S UTC"),
        env.os,
        env.cpu_name,
        env.cpu_cores,
        env.cpu_cache_size,
        env.system_memory
    )
}

fn format_result_block(result: &AggregatedResult) -> String {
    format!(
        "Tests: {}, Messages sent for each test: {}, Message size: {} Byte\n\
         Average Throughput: {} Msg/s\n\
         Average Throughput: {} Mb/s\n",
        result.test_count,
        result.message_count,
        result.message_size,
        format_throughput(result.avg_throughput_msgs),
        format_throughput(result.avg_throughput_mbs),
    )
}

/// Full report: environment banner, then one block per method in order.
pub fn format_default(
    outcomes: &[MethodOutcome],
    env: &EnvironmentInfo,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str(&rule('='));
    out.push('\n');
    out.push_str(&format_environment(env, now));
    out.push_str(&rule('='));
    out.push('\n');

    let method_style = style_method();
    let failure_style = style_failure();

    for outcome in outcomes {
        let name = outcome
            .method
            .name()
            .if_supports_color(Stream::Stdout, |s| s.style(method_style))
            .to_string();
        out.push_str(&format!("IPC-Method: {}\n", name));

        match &outcome.result {
            Ok(result) => out.push_str(&format_result_block(result)),
            Err(err) => {
                let label = "Failed:"
                    .if_supports_color(Stream::Stdout, |s| s.style(failure_style))
                    .to_string();
                out.push_str(&format!("{} {}\n", label, err));
            }
        }

        out.push_str(&rule('-'));
        out.push('\n');
    }

    out
}

/// Short format: one line per method, no banner.
pub fn format_short(outcomes: &[MethodOutcome]) -> String {
    let name_width = outcomes
        .iter()
        .map(|o| o.method.name().len())
        .max()
        .unwrap_or(0);

    let method_style = style_method();
    let failure_style = style_failure();

    let mut out = String::new();
    for outcome in outcomes {
        let name_padded = format!("{:<width$}", outcome.method.name(), width = name_width);
        let name_colored = name_padded
            .if_supports_color(Stream::Stdout, |s| s.style(method_style))
            .to_string();

        let body = match &outcome.result {
            Ok(result) => {
                let msgs = format!("{:>14} msg/s", format_throughput(result.avg_throughput_msgs));
                let mbs = format!("{:>10} Mb/s", format_throughput(result.avg_throughput_mbs));
                format!(
                    "{}  {}",
                    msgs.if_supports_color(Stream::Stdout, |s| s.yellow()),
                    mbs.if_supports_color(Stream::Stdout, |s| s.green())
                )
            }
            Err(err) => format!("failed: {}", err)
                .if_supports_color(Stream::Stdout, |s| s.style(failure_style))
                .to_string(),
        };

        out.push_str(&format!("{}  {}\n", name_colored, body));
    }

    out
}

/// JSON output format.
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    environment: &'a EnvironmentInfo,
    results: Vec<JsonMethod<'a>>,
}

#[derive(Serialize)]
struct JsonMethod<'a> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a AggregatedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn format_json(
    outcomes: &[MethodOutcome],
    env: &EnvironmentInfo,
    now: DateTime<Utc>,
) -> String {
    let report = JsonReport {
        generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        environment: env,
        results: outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(result) => JsonMethod {
                    method: outcome.method.name(),
                    result: Some(result),
                    error: None,
                },
                Err(err) => JsonMethod {
                    method: outcome.method.name(),
                    result: None,
                    error: Some(err.to_string()),
                },
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}
