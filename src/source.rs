//! The tabular data source the exporter reads from.
//!
//! The ODBC implementation lives in [`crate::odbc`]; tests plug in an
//! in-memory source through the same traits.

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::endpoint::ConnectionString;
use crate::query::TableRef;
use crate::Result;

/// Opens connections. One connection is opened per export.
pub trait DataSource {
    type Connection<'a>: SourceConnection
    where
        Self: 'a;

    fn connect<'a>(&'a self, connection_string: &ConnectionString) -> Result<Self::Connection<'a>>;
}

/// An open session. Dropping it releases the underlying handle.
pub trait SourceConnection {
    /// Run `SELECT *` against the table and materialize every row.
    fn fetch_all(&mut self, table: &TableRef) -> Result<ResultSet>;
}

/// A fully materialized query result, rows in the order the server returned them
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl ResultSet {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }
}
