use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::LayerTable;
use crate::readers::LayerReader;
use crate::utils::constants::{COL_SOLAR_KWH, COL_SUNSHINE, COL_UV_INDEX, COL_UV_NORM};
use crate::utils::format_float;
use crate::writers::LayerWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Estimated generation for a fixed panel:
/// `solar_kwh = sunshine_hours * panel_area * panel_efficiency * uv_norm`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarModel {
    pub panel_area: f64,
    pub panel_efficiency: f64,
}

impl SolarModel {
    pub fn new(panel_area: f64, panel_efficiency: f64) -> Self {
        Self {
            panel_area,
            panel_efficiency,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.panel_area, config.panel_efficiency)
    }

    /// Divisor for UV normalization. An all-zero (or empty) dataset divides
    /// by 1 so every normalized value is 0.
    pub fn uv_divisor(max_uv: Option<f64>) -> f64 {
        match max_uv {
            Some(max) if max != 0.0 => max,
            _ => 1.0,
        }
    }

    pub fn estimate_kwh(&self, sunshine_hours: f64, uv_norm: f64) -> f64 {
        sunshine_hours * self.panel_area * self.panel_efficiency * uv_norm
    }
}

impl Default for SolarModel {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub rows: usize,
    pub max_uv: Option<f64>,
    pub total_kwh: f64,
    pub incomplete_rows: usize,
    pub destination: PathBuf,
}

impl AnalyticsReport {
    pub fn summary(&self) -> String {
        format!(
            "Estimated {:.1} kWh over {} rows (max UV {}), wrote {}",
            self.total_kwh,
            self.rows,
            self.max_uv
                .map(|v| v.to_string())
                .unwrap_or_else(|| "n/a".to_string()),
            self.destination.display()
        )
    }
}

/// Counters collected while deriving the solar estimate for one table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalyticsStats {
    pub max_uv: Option<f64>,
    pub total_kwh: f64,
    pub incomplete_rows: usize,
}

/// Extends the cleaned layer with `uv_norm` and `solar_kwh`.
pub struct SolarAnalyzer {
    model: SolarModel,
    reader: LayerReader,
    writer: LayerWriter,
}

impl SolarAnalyzer {
    pub fn new(model: SolarModel) -> Self {
        Self {
            model,
            reader: LayerReader::new(),
            writer: LayerWriter::new(),
        }
    }

    pub fn analyze_file(&self, cleaned_layer: &Path, analytics_layer: &Path) -> Result<AnalyticsReport> {
        info!(
            "Deriving solar estimate from {} (area {} m², efficiency {})",
            cleaned_layer.display(),
            self.model.panel_area,
            self.model.panel_efficiency
        );

        let cleaned = self.reader.read(cleaned_layer)?;
        let (analytics, stats) = self.analyze(cleaned)?;
        self.writer.write_table(&analytics, analytics_layer)?;

        let report = AnalyticsReport {
            rows: analytics.len(),
            max_uv: stats.max_uv,
            total_kwh: stats.total_kwh,
            incomplete_rows: stats.incomplete_rows,
            destination: analytics_layer.to_path_buf(),
        };
        info!("{}", report.summary());

        Ok(report)
    }

    /// Append `uv_norm` and `solar_kwh` to a cleaned table. Existing columns
    /// are left as they are.
    pub fn analyze(&self, mut table: LayerTable) -> Result<(LayerTable, AnalyticsStats)> {
        table.require_columns(&[COL_SUNSHINE, COL_UV_INDEX])?;
        let sunshine = table.numeric_column(COL_SUNSHINE)?;
        let uv = table.numeric_column(COL_UV_INDEX)?;
        reject_negative(&table, COL_SUNSHINE, &sunshine)?;
        reject_negative(&table, COL_UV_INDEX, &uv)?;

        let max_uv = uv.iter().flatten().copied().reduce(f64::max);
        let divisor = SolarModel::uv_divisor(max_uv);
        debug!("UV normalization divisor {}", divisor);

        let mut stats = AnalyticsStats {
            max_uv,
            ..Default::default()
        };
        let mut uv_norm_cells = Vec::with_capacity(table.len());
        let mut solar_cells = Vec::with_capacity(table.len());

        for (hours, uv_index) in sunshine.iter().zip(&uv) {
            let uv_norm = uv_index.map(|u| u / divisor);
            let solar_kwh = match (hours, uv_norm) {
                (Some(hours), Some(norm)) => self.model.estimate_kwh(*hours, norm),
                _ => {
                    stats.incomplete_rows += 1;
                    0.0
                }
            };

            stats.total_kwh += solar_kwh;
            uv_norm_cells.push(uv_norm.map(format_float).unwrap_or_default());
            solar_cells.push(format_float(solar_kwh));
        }

        if stats.incomplete_rows > 0 {
            warn!(
                "{} rows lack sunshine or UV readings; their solar estimate is 0",
                stats.incomplete_rows
            );
        }

        table.set_column(COL_UV_NORM, uv_norm_cells)?;
        table.set_column(COL_SOLAR_KWH, solar_cells)?;

        Ok((table, stats))
    }
}

impl Default for SolarAnalyzer {
    fn default() -> Self {
        Self::new(SolarModel::default())
    }
}

fn reject_negative(table: &LayerTable, column: &str, values: &[Option<f64>]) -> Result<()> {
    if let Some(i) = values.iter().position(|v| v.is_some_and(|v| v < 0.0)) {
        return Err(ProcessingError::malformed(
            table.source(),
            format!("column '{}' line {} is negative", column, i + 2),
        ));
    }
    Ok(())
}
