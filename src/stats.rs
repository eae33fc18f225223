//! Export statistics and the report printed once an export finishes.

use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use crate::{AppError, Result};

/// Decimal megabytes, not mebibytes. Existing reports depend on this factor.
const BYTES_TO_MB: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportStats {
    pub rows: usize,
    pub load_duration: Duration,
    pub write_duration: Duration,
    pub output_size_bytes: u64,
}

impl ExportStats {
    pub fn total_size_mb(&self) -> f64 {
        self.output_size_bytes as f64 * BYTES_TO_MB
    }

    /// Megabytes per second of load time, `None` when the load took no measurable time
    pub fn throughput_mb_per_sec(&self) -> Option<f64> {
        let secs = self.load_duration.as_secs_f64();
        if secs > 0.0 {
            Some(self.total_size_mb() / secs)
        } else {
            None
        }
    }

    pub fn render(&self, format: StatsFormat) -> Result<String> {
        match format {
            StatsFormat::Text => Ok(self.to_string()),
            StatsFormat::Json => serde_json::to_string(&StatsReport::from(self))
                .map_err(|e| AppError::JsonSerialize(e.to_string())),
        }
    }
}

impl fmt::Display for ExportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let throughput = match self.throughput_mb_per_sec() {
            Some(value) => value.to_string(),
            None => "n/a".to_string(),
        };

        writeln!(f, "Export statistics:")?;
        writeln!(f)?;
        writeln!(
            f,
            "    Loading duration in seconds: {}",
            self.load_duration.as_secs_f64()
        )?;
        writeln!(
            f,
            "    Write duration in seconds:   {}",
            self.write_duration.as_secs_f64()
        )?;
        writeln!(f, "    Total dataset size in Mbs:   {}", self.total_size_mb())?;
        writeln!(f)?;
        write!(f, "    Throughput: {} (Mbs per second)", throughput)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    rows: usize,
    load_duration_secs: f64,
    write_duration_secs: f64,
    output_size_bytes: u64,
    total_size_mb: f64,
    throughput_mb_per_sec: Option<f64>,
}

impl From<&ExportStats> for StatsReport {
    fn from(stats: &ExportStats) -> Self {
        Self {
            rows: stats.rows,
            load_duration_secs: stats.load_duration.as_secs_f64(),
            write_duration_secs: stats.write_duration.as_secs_f64(),
            output_size_bytes: stats.output_size_bytes,
            total_size_mb: stats.total_size_mb(),
            throughput_mb_per_sec: stats.throughput_mb_per_sec(),
        }
    }
}
