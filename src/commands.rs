use std::io::Write;

use crate::Result;
use crate::cli::ExportArgs;
use crate::endpoint::EndpointInfo;
use crate::export::{ExportPhase, TableExporter};
use crate::settings::Settings;
use crate::source::DataSource;
use crate::stats::ExportStats;

/// Resolve configuration from the environment and export through ODBC
#[cfg(feature = "odbc")]
pub fn run_export(args: &ExportArgs) -> Result<()> {
    use crate::odbc::OdbcSource;

    tracing::debug!(phase = %ExportPhase::Init, settings = %args.settings.display(), "starting");
    let mut settings = Settings::load_from(&args.settings)?;
    args.apply_overrides(&mut settings);

    let endpoint = EndpointInfo::from_env()?;
    tracing::debug!(
        phase = %ExportPhase::ConfigResolved,
        connection = %endpoint.connection_string().redacted(),
        "configuration resolved"
    );
    let source = OdbcSource::new(&settings)?;

    run_export_with(source, &endpoint, &settings, args, &mut std::io::stdout().lock())?;
    Ok(())
}

/// Run one export against `source`, writing progress and statistics to `out`
pub fn run_export_with<S, W>(
    source: S,
    endpoint: &EndpointInfo,
    settings: &Settings,
    args: &ExportArgs,
    out: &mut W,
) -> Result<ExportStats>
where
    S: DataSource,
    W: Write,
{
    writeln!(
        out,
        "Starting export of the table {}.{}",
        args.database, args.table
    )?;

    let exporter = TableExporter::new(source, endpoint, settings.parquet.clone());
    let stats = exporter.export(&args.database, &args.table, &args.output_file)?;

    writeln!(
        out,
        "Export of the table {}.{} finished successfully",
        args.database, args.table
    )?;
    writeln!(out, "{}", stats.render(args.stats_format)?)?;
    tracing::info!(phase = %ExportPhase::Reported, rows = stats.rows, "statistics reported");

    Ok(stats)
}
