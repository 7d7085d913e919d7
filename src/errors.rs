use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum IpcBenchError {
    #[error("Failed to launch benchmark {program}: {source}")]
    ProcessLaunch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Unrecognized benchmark output on line {line}: {detail}")]
    UnknownData { line: usize, detail: String },

    #[error("Benchmark output is incomplete, missing: {missing}")]
    IncompleteData { missing: String },

    #[error("No test results to average (test count is 0)")]
    NoData,

    #[error("Field '{field}' not found in {path}")]
    FieldNotFound { field: String, path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    InfoRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {detail}")]
    Config { path: PathBuf, detail: String },

    #[error("Failed to create CSV output {path}: {source}")]
    ExportCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write CSV output: {0}")]
    Export(#[from] csv::Error),
}

impl IpcBenchError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            IpcBenchError::ProcessLaunch { .. } => 3,
            IpcBenchError::UnknownData { .. } | IpcBenchError::IncompleteData { .. } => 4,
            IpcBenchError::NoData => 5,
            IpcBenchError::FieldNotFound { .. } | IpcBenchError::InfoRead { .. } => 6,
            IpcBenchError::Config { .. } => 7,
            IpcBenchError::ExportCreate { .. } | IpcBenchError::Export(_) => 8,
        }
    }
}
