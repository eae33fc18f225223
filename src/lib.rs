//! Export Databricks SQL warehouse tables to parquet files over ODBC.

pub mod cli;
pub mod commands;
pub mod endpoint;
pub mod error;
pub mod export;
pub mod logging;
#[cfg(feature = "odbc")]
pub mod odbc;
pub mod parquet_writer;
pub mod query;
pub mod settings;
pub mod source;
pub mod stats;

pub use cli::{Cli, Commands, ExportArgs};
#[cfg(feature = "odbc")]
pub use commands::run_export;
pub use commands::run_export_with;
pub use endpoint::{ConnectionString, EndpointInfo, Token};
pub use error::{AppError, Result};
pub use export::TableExporter;
pub use query::{Identifier, TableRef};
pub use settings::Settings;
pub use source::{DataSource, ResultSet, SourceConnection};
pub use stats::{ExportStats, StatsFormat};
