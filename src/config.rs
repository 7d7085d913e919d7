use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::IpcBenchError;
use crate::sysinfo::EnvironmentSources;
use crate::types::IpcMethod;

/// Settings loaded from `config.toml`; every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the `*_thr` benchmark executables.
    pub bin_dir: PathBuf,
    /// Methods to run when none are given on the command line.
    pub methods: Option<Vec<IpcMethod>>,
    pub programs: ProgramsConfig,
    pub environment: EnvironmentSources,
}

/// Per-method executable overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgramsConfig {
    pub pipe: Option<PathBuf>,
    pub named_pipe: Option<PathBuf>,
    pub unix: Option<PathBuf>,
    pub msgq: Option<PathBuf>,
    pub tcp: Option<PathBuf>,
}

impl ProgramsConfig {
    fn get(&self, method: IpcMethod) -> Option<&Path> {
        let entry = match method {
            IpcMethod::Pipe => &self.pipe,
            IpcMethod::NamedPipe => &self.named_pipe,
            IpcMethod::Unix => &self.unix,
            IpcMethod::Msgq => &self.msgq,
            IpcMethod::Tcp => &self.tcp,
        };
        entry.as_deref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("."),
            methods: None,
            programs: ProgramsConfig::default(),
            environment: EnvironmentSources::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, IpcBenchError> {
        let content = std::fs::read_to_string(path).map_err(|e| IpcBenchError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_toml(path, &content)
    }

    pub fn from_toml(path: &Path, content: &str) -> Result<Self, IpcBenchError> {
        let config: Self = toml::from_str(content).map_err(|e| IpcBenchError::Config {
            path: path.to_path_buf(),
            detail: e.message().to_string(),
        })?;

        if config.methods.as_ref().is_some_and(Vec::is_empty) {
            return Err(IpcBenchError::Config {
                path: path.to_path_buf(),
                detail: "methods must name at least one IPC method".to_string(),
            });
        }
        Ok(config)
    }

    /// `<config_dir>/ipcbench/config.toml`, e.g. `~/.config/ipcbench/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ipcbench").join("config.toml"))
    }

    /// An explicit path must exist; the default location is used only if present.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, IpcBenchError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Executable for `method`. Relative names resolve against `bin_dir`.
    pub fn program_for(&self, method: IpcMethod) -> PathBuf {
        match self.programs.get(method) {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.bin_dir.join(path),
            None => self.bin_dir.join(method.default_program()),
        }
    }

    /// Configured methods in order, each at most once; all methods if unset.
    pub fn selected_methods(&self) -> Vec<IpcMethod> {
        let requested: &[IpcMethod] = self.methods.as_deref().unwrap_or(&IpcMethod::ALL);

        let mut selected = Vec::with_capacity(requested.len());
        for &method in requested {
            if !selected.contains(&method) {
                selected.push(method);
            }
        }
        selected
    }
}
