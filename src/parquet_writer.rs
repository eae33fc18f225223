use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::settings::ParquetSettings;
use crate::{AppError, Result};

/// Delete whatever sits at `path`. Returns whether a file was removed.
pub fn remove_existing(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AppError::RemoveFile {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

/// Write all batches to a single parquet file.
///
/// On failure the partially written file is removed.
pub fn write_parquet_file(
    path: &Path,
    schema: &SchemaRef,
    batches: &[RecordBatch],
    settings: &ParquetSettings,
) -> Result<()> {
    let file = File::create(path).map_err(|e| AppError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    let result = write_batches(file, schema, batches, settings);
    if result.is_err()
        && let Err(e) = fs::remove_file(path)
    {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "failed to clean up partial parquet file"
        );
    }
    result
}

fn write_batches(
    file: File,
    schema: &SchemaRef,
    batches: &[RecordBatch],
    settings: &ParquetSettings,
) -> Result<()> {
    let props = WriterProperties::builder()
        .set_compression(settings.compression.to_parquet())
        .set_max_row_group_size(settings.max_row_group_size.max(1))
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))
        .map_err(|e| AppError::Parquet(e.to_string()))?;

    for batch in batches {
        writer
            .write(batch)
            .map_err(|e| AppError::Parquet(e.to_string()))?;
    }

    writer
        .close()
        .map_err(|e| AppError::Parquet(e.to_string()))?;

    Ok(())
}
