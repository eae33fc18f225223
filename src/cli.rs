use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::{CompressionKind, SETTINGS_FILE, Settings};
use crate::stats::StatsFormat;

#[derive(Parser)]
#[command(name = "dbx-sql-cli")]
#[command(about = "Export Databricks SQL warehouse tables to parquet files")]
#[command(version)]
pub struct Cli {
    /// Log filter, overrides DBX_SQL_CLI_LOG and RUST_LOG
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a whole table to a parquet file
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Database name
    #[arg(long)]
    pub database: String,

    /// Table name
    #[arg(long)]
    pub table: String,

    /// Output file, replaced if it exists
    #[arg(long)]
    pub output_file: PathBuf,

    /// Settings file; missing means defaults
    #[arg(long, default_value = SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Login timeout in seconds
    #[arg(long)]
    pub login_timeout: Option<u32>,

    /// Query timeout in seconds
    #[arg(long)]
    pub query_timeout: Option<usize>,

    /// Parquet compression codec
    #[arg(long, value_enum)]
    pub compression: Option<CompressionKind>,

    /// Format of the statistics block
    #[arg(long, value_enum, default_value_t = StatsFormat::Text)]
    pub stats_format: StatsFormat,
}

impl ExportArgs {
    /// Flags given on the command line win over the settings file
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(secs) = self.login_timeout {
            settings.connection.login_timeout_secs = Some(secs);
        }
        if let Some(secs) = self.query_timeout {
            settings.connection.query_timeout_secs = Some(secs);
        }
        if let Some(compression) = self.compression {
            settings.parquet.compression = compression;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dbx-sql-cli").chain(args.iter().copied()))
    }

    fn export_args(args: &[&str]) -> ExportArgs {
        match parse(args).unwrap().command {
            Commands::Export(export) => export,
        }
    }

    #[test]
    fn test_parse_export_required_flags() {
        let args = export_args(&[
            "export",
            "--database",
            "sales",
            "--table",
            "orders",
            "--output-file",
            "/tmp/out.parquet",
        ]);

        assert_eq!(args.database, "sales");
        assert_eq!(args.table, "orders");
        assert_eq!(args.output_file, PathBuf::from("/tmp/out.parquet"));
        assert_eq!(args.settings, PathBuf::from(SETTINGS_FILE));
        assert_eq!(args.stats_format, StatsFormat::Text);
        assert!(args.login_timeout.is_none());
        assert!(args.compression.is_none());
    }

    #[test]
    fn test_parse_export_missing_required_flag() {
        for missing in ["--database", "--table", "--output-file"] {
            let mut args = vec![
                "export",
                "--database",
                "sales",
                "--table",
                "orders",
                "--output-file",
                "out.parquet",
            ];
            let idx = args.iter().position(|a| *a == missing).unwrap();
            args.drain(idx..idx + 2);

            assert!(parse(&args).is_err(), "{} should be required", missing);
        }
    }

    #[test]
    fn test_parse_export_options() {
        let args = export_args(&[
            "export",
            "--database",
            "sales",
            "--table",
            "orders",
            "--output-file",
            "out.parquet",
            "--query-timeout",
            "600",
            "--login-timeout",
            "30",
            "--compression",
            "zstd",
            "--stats-format",
            "json",
        ]);

        assert_eq!(args.query_timeout, Some(600));
        assert_eq!(args.login_timeout, Some(30));
        assert_eq!(args.compression, Some(CompressionKind::Zstd));
        assert_eq!(args.stats_format, StatsFormat::Json);
    }

    #[test]
    fn test_parse_global_log_flag() {
        let cli = parse(&[
            "--log",
            "debug",
            "export",
            "--database",
            "a",
            "--table",
            "b",
            "--output-file",
            "c",
        ])
        .unwrap();
        assert_eq!(cli.log.as_deref(), Some("debug"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut args = export_args(&[
            "export",
            "--database",
            "sales",
            "--table",
            "orders",
            "--output-file",
            "out.parquet",
        ]);
        let mut settings = Settings::default();
        settings.connection.login_timeout_secs = Some(10);

        args.apply_overrides(&mut settings);
        assert_eq!(settings.connection.login_timeout_secs, Some(10));
        assert_eq!(settings.parquet.compression, CompressionKind::Snappy);

        args.login_timeout = Some(99);
        args.compression = Some(CompressionKind::Uncompressed);
        args.apply_overrides(&mut settings);
        assert_eq!(settings.connection.login_timeout_secs, Some(99));
        assert_eq!(settings.parquet.compression, CompressionKind::Uncompressed);
    }
}
