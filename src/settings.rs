use std::fs;
use std::path::Path;

use clap::ValueEnum;
use parquet::basic::{Compression, ZstdLevel};
use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

pub const SETTINGS_FILE: &str = "dbx-sql-cli.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub connection: ConnectionSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub parquet: ParquetSettings,
}

/// Timeouts handed to the ODBC driver; unset means the driver default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default, rename = "login-timeout-secs")]
    pub login_timeout_secs: Option<u32>,
    #[serde(default, rename = "query-timeout-secs")]
    pub query_timeout_secs: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    #[serde(rename = "max-rows-per-batch")]
    pub max_rows_per_batch: usize,
    /// Upper bound for text columns the driver reports as unbounded
    #[serde(rename = "max-text-size")]
    pub max_text_size: usize,
    #[serde(rename = "max-binary-size")]
    pub max_binary_size: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_rows_per_batch: 65_536,
            max_text_size: 65_536,
            max_binary_size: 65_536,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParquetSettings {
    pub compression: CompressionKind,
    #[serde(rename = "max-row-group-size")]
    pub max_row_group_size: usize,
}

impl Default for ParquetSettings {
    fn default() -> Self {
        Self {
            compression: CompressionKind::default(),
            max_row_group_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    #[default]
    Snappy,
    Zstd,
    Uncompressed,
}

impl CompressionKind {
    pub fn to_parquet(self) -> Compression {
        match self {
            CompressionKind::Snappy => Compression::SNAPPY,
            CompressionKind::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionKind::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

impl Settings {
    /// A missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| AppError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| AppError::TomlParse(e.to_string()))
    }
}
