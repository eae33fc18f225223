//! Single-shot table export: query one table and persist it as parquet.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::endpoint::{ConnectionString, EndpointInfo};
use crate::parquet_writer::{remove_existing, write_parquet_file};
use crate::query::TableRef;
use crate::settings::ParquetSettings;
use crate::source::{DataSource, ResultSet, SourceConnection};
use crate::stats::ExportStats;
use crate::{AppError, Result};

/// Progress of one export, strictly linear. Any phase may end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Init,
    ConfigResolved,
    Connected,
    Queried,
    Written,
    Reported,
    Failed,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportPhase::Init => "init",
            ExportPhase::ConfigResolved => "config-resolved",
            ExportPhase::Connected => "connected",
            ExportPhase::Queried => "queried",
            ExportPhase::Written => "written",
            ExportPhase::Reported => "reported",
            ExportPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

pub struct TableExporter<S> {
    source: S,
    connection_string: ConnectionString,
    parquet: ParquetSettings,
}

impl<S: DataSource> TableExporter<S> {
    pub fn new(source: S, endpoint: &EndpointInfo, parquet: ParquetSettings) -> Self {
        Self {
            source,
            connection_string: endpoint.connection_string(),
            parquet,
        }
    }

    /// Export `database.table` to `output_path`, replacing any file already there.
    ///
    /// Names are validated before any connection is attempted.
    pub fn export(&self, database: &str, table: &str, output_path: &Path) -> Result<ExportStats> {
        let table = TableRef::new(database, table)?;
        self.export_table(&table, output_path)
    }

    pub fn export_table(&self, table: &TableRef, output_path: &Path) -> Result<ExportStats> {
        let result = self.run(table, output_path);
        if let Err(e) = &result {
            tracing::debug!(phase = %ExportPhase::Failed, %table, error = %e, "export aborted");
        }
        result
    }

    fn run(&self, table: &TableRef, output_path: &Path) -> Result<ExportStats> {
        let load_start = Instant::now();
        let result_set = self.load(table)?;
        let load_duration = load_start.elapsed();

        let rows = result_set.num_rows();
        tracing::info!(
            phase = %ExportPhase::Queried,
            %table,
            rows,
            columns = result_set.num_columns(),
            load_secs = load_duration.as_secs_f64(),
            "result set loaded"
        );

        if remove_existing(output_path)? {
            tracing::debug!(path = %output_path.display(), "removed existing output file");
        }

        let write_start = Instant::now();
        write_parquet_file(
            output_path,
            &result_set.schema,
            &result_set.batches,
            &self.parquet,
        )?;
        let write_duration = write_start.elapsed();
        drop(result_set);

        let output_size_bytes = fs::metadata(output_path)
            .map_err(|e| AppError::ReadFile {
                path: output_path.display().to_string(),
                source: e,
            })?
            .len();

        tracing::info!(
            phase = %ExportPhase::Written,
            path = %output_path.display(),
            bytes = output_size_bytes,
            write_secs = write_duration.as_secs_f64(),
            "parquet file written"
        );

        Ok(ExportStats {
            rows,
            load_duration,
            write_duration,
            output_size_bytes,
        })
    }

    /// The connection lives only for the duration of this call.
    fn load(&self, table: &TableRef) -> Result<ResultSet> {
        let mut connection = self.source.connect(&self.connection_string)?;
        tracing::debug!(phase = %ExportPhase::Connected, "connection established");
        connection.fetch_all(table)
    }
}
