//! ODBC data source backed by `arrow-odbc`.
//!
//! Results are fetched straight into Arrow record batches, so the exporter
//! never sees driver-specific row buffers.

use arrow::record_batch::{RecordBatch, RecordBatchReader};
use arrow_odbc::OdbcReaderBuilder;
use arrow_odbc::odbc_api::{Connection, ConnectionOptions, Environment};

use crate::endpoint::ConnectionString;
use crate::query::TableRef;
use crate::settings::{ConnectionSettings, FetchSettings, Settings};
use crate::source::{DataSource, ResultSet, SourceConnection};
use crate::{AppError, Result};

pub struct OdbcSource {
    environment: Environment,
    connection_settings: ConnectionSettings,
    fetch: FetchSettings,
}

impl OdbcSource {
    pub fn new(settings: &Settings) -> Result<Self> {
        let environment = Environment::new().map_err(|e| {
            AppError::Connection(format!("failed to create ODBC environment: {}", e))
        })?;

        Ok(Self {
            environment,
            connection_settings: settings.connection.clone(),
            fetch: settings.fetch.clone(),
        })
    }
}

impl DataSource for OdbcSource {
    type Connection<'a> = OdbcConnection<'a>;

    fn connect<'a>(&'a self, connection_string: &ConnectionString) -> Result<OdbcConnection<'a>> {
        tracing::debug!(
            connection_string = %connection_string.redacted(),
            "opening ODBC connection"
        );

        let mut options = ConnectionOptions::default();
        options.login_timeout_sec = self.connection_settings.login_timeout_secs;

        let connection = self
            .environment
            .connect_with_connection_string(&connection_string.expose_secret(), options)
            .map_err(|e| AppError::Connection(e.to_string()))?;

        Ok(OdbcConnection {
            connection,
            query_timeout_secs: self.connection_settings.query_timeout_secs,
            fetch: self.fetch.clone(),
        })
    }
}

/// One autocommit session; closed when dropped
pub struct OdbcConnection<'env> {
    connection: Connection<'env>,
    query_timeout_secs: Option<usize>,
    fetch: FetchSettings,
}

impl SourceConnection for OdbcConnection<'_> {
    fn fetch_all(&mut self, table: &TableRef) -> Result<ResultSet> {
        let query = table.select_all();
        tracing::debug!(%query, "executing query");

        let cursor = self
            .connection
            .execute(&query, (), self.query_timeout_secs)
            .map_err(|e| AppError::QueryExecution(e.to_string()))?
            .ok_or_else(|| {
                AppError::QueryExecution(format!("query produced no result set: {}", query))
            })?;

        let reader = OdbcReaderBuilder::new()
            .with_max_num_rows_per_batch(self.fetch.max_rows_per_batch.max(1))
            .with_max_text_size(self.fetch.max_text_size)
            .with_max_binary_size(self.fetch.max_binary_size)
            .build(cursor)
            .map_err(|e| AppError::QueryExecution(e.to_string()))?;

        let schema = reader.schema();
        let batches = reader
            .collect::<std::result::Result<Vec<RecordBatch>, _>>()
            .map_err(|e| AppError::QueryExecution(e.to_string()))?;

        Ok(ResultSet::new(schema, batches))
    }
}

impl Drop for OdbcConnection<'_> {
    fn drop(&mut self) {
        tracing::debug!("closing ODBC connection");
    }
}
