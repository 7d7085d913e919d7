use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::IpcBenchError;
use crate::types::EnvironmentInfo;

/// Fields the report reads from the host's info files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoField {
    ModelName,
    CacheSize,
    CpuCores,
    MemTotal,
}

impl InfoField {
    /// Label of the field as it appears in `/proc/cpuinfo` or `/proc/meminfo`.
    pub fn key(self) -> &'static str {
        match self {
            InfoField::ModelName => "model name",
            InfoField::CacheSize => "cache size",
            InfoField::CpuCores => "cpu cores",
            InfoField::MemTotal => "MemTotal",
        }
    }
}

/// A parsed `label: value` file.
#[derive(Debug, Clone)]
pub struct InfoFile {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl InfoFile {
    pub fn read(path: &Path) -> Result<Self, IpcBenchError> {
        let text = std::fs::read_to_string(path).map_err(|source| IpcBenchError::InfoRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(path, &text))
    }

    /// Lines without a colon are skipped; a repeated label keeps its last value.
    pub fn parse(path: &Path, text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(label, value)| (label.trim().to_string(), value.trim().to_string()))
            .collect();

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn get(&self, field_name: &str) -> Result<&str, IpcBenchError> {
        self.entries
            .get(field_name)
            .map(String::as_str)
            .ok_or_else(|| IpcBenchError::FieldNotFound {
                field: field_name.to_string(),
                path: self.path.clone(),
            })
    }

    pub fn field(&self, field: InfoField) -> Result<&str, IpcBenchError> {
        self.get(field.key())
    }
}

/// Where environment facts are read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnvironmentSources {
    pub cpuinfo: PathBuf,
    pub meminfo: PathBuf,
    pub ostype: PathBuf,
    pub osrelease: PathBuf,
}

impl Default for EnvironmentSources {
    fn default() -> Self {
        Self {
            cpuinfo: PathBuf::from("/proc/cpuinfo"),
            meminfo: PathBuf::from("/proc/meminfo"),
            ostype: PathBuf::from("/proc/sys/kernel/ostype"),
            osrelease: PathBuf::from("/proc/sys/kernel/osrelease"),
        }
    }
}

impl EnvironmentInfo {
    pub fn collect(sources: &EnvironmentSources) -> Result<Self, IpcBenchError> {
        let cpuinfo = InfoFile::read(&sources.cpuinfo)?;
        let meminfo = InfoFile::read(&sources.meminfo)?;

        Ok(EnvironmentInfo {
            os: os_description(&sources.ostype, &sources.osrelease),
            cpu_name: cpuinfo.field(InfoField::ModelName)?.to_string(),
            cpu_cache_size: cpuinfo.field(InfoField::CacheSize)?.to_string(),
            cpu_cores: cpuinfo.field(InfoField::CpuCores)?.to_string(),
            system_memory: meminfo.field(InfoField::MemTotal)?.to_string(),
        })
    }
}

/// `<ostype>-<osrelease>-<arch>`, e.g. `Linux-6.1.0-13-amd64-x86_64`.
///
/// Falls back to the compile-time OS name when the kernel files are missing.
pub fn os_description(ostype: &Path, osrelease: &Path) -> String {
    let read = |p: &Path| {
        std::fs::read_to_string(p)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    match (read(ostype), read(osrelease)) {
        (Some(kind), Some(release)) => {
            format!("{}-{}-{}", kind, release, std::env::consts::ARCH)
        }
        _ => format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
    }
}
