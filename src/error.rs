use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Environment variable {0} is not defined")]
    MissingEnvVar(String),

    #[error("invalid {kind} name: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("failed to connect to endpoint: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    QueryExecution(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read file at {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write file at {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove existing file at {path}: {source}")]
    RemoveFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Parquet error: {0}")]
    Parquet(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
