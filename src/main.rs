use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipcbench::config::Config;
use ipcbench::display;
use ipcbench::errors::IpcBenchError;
use ipcbench::export;
use ipcbench::runner::{self, ProcessRunner};
use ipcbench::types::{BatchParams, EnvironmentInfo, IpcMethod, MethodOutcome, OutputFormat};

#[derive(Parser)]
#[command(name = "ipcbench", version, about = "Run IPC throughput benchmarks and report averaged results")]
struct Cli {
    /// Size of each message in bytes
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    message_size: u64,

    /// Messages sent per test run
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    message_count: u64,

    /// Number of runs averaged per IPC method
    test_count: u64,

    /// Write the averaged results as CSV instead of printing the report
    #[arg(long)]
    ipc_test: bool,

    /// CSV destination for --ipc-test (defaults to stdout)
    #[arg(short, long, requires = "ipc_test")]
    output: Option<PathBuf>,

    #[arg(long, default_value = "default")]
    format: OutputFormat,

    #[arg(long)]
    json: bool,

    /// IPC method to run (repeatable; defaults to all)
    #[arg(short, long = "method", value_name = "METHOD")]
    methods: Vec<IpcMethod>,

    /// Directory containing the *_thr benchmark executables
    #[arg(long)]
    bin_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ipcbench={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns the exit code of the first failing method, or 0.
fn run(cli: Cli) -> Result<i32> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(dir) = cli.bin_dir {
        config.bin_dir = dir;
    }
    if !cli.methods.is_empty() {
        config.methods = Some(cli.methods);
    }

    let env = if cli.ipc_test {
        None
    } else {
        Some(EnvironmentInfo::collect(&config.environment)?)
    };

    // Opened before any batch runs.
    let csv_file = match &cli.output {
        Some(path) => Some(File::create(path).map_err(|source| IpcBenchError::ExportCreate {
            path: path.clone(),
            source,
        })?),
        None => None,
    };

    let params = BatchParams {
        message_size: cli.message_size,
        message_count: cli.message_count,
        test_count: cli.test_count,
    };

    let outcomes: Vec<MethodOutcome> = config
        .selected_methods()
        .into_iter()
        .map(|method| {
            let runner = ProcessRunner::new(config.program_for(method));
            info!(%method, program = %runner.program().display(), "running batch");
            MethodOutcome {
                method,
                result: runner::run_tests(&runner, params),
            }
        })
        .collect();

    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            eprintln!("error: {}: {}", outcome.method, err);
        }
    }

    if cli.ipc_test {
        match csv_file {
            Some(file) => export::write_csv(&outcomes, BufWriter::new(file))?,
            None => export::write_csv(&outcomes, io::stdout().lock())?,
        }
    } else if let Some(env) = &env {
        let now = Utc::now();
        let output = if cli.json {
            display::format_json(&outcomes, env, now)
        } else {
            match cli.format {
                OutputFormat::Short => display::format_short(&outcomes),
                OutputFormat::Default => display::format_default(&outcomes, env, now),
            }
        };

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", output.trim_end())?;
    }

    Ok(outcomes
        .iter()
        .find_map(|o| o.result.as_ref().err())
        .map_or(0, IpcBenchError::exit_code))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{}", err);
            let code = err
                .downcast_ref::<IpcBenchError>()
                .map_or(1, IpcBenchError::exit_code);
            process::exit(code);
        }
    }
}
