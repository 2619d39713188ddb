use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::LayerTable;
use crate::utils::constants::{
    COL_AVG_TEMP, COL_DATE, COL_PRECIP, COL_SOLAR_KWH, COL_SUNSHINE, COL_UV_INDEX,
    ISO_DATE_FORMAT,
};

/// One day of observations for the station, as read back from the cleaned or
/// analytics layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WeatherRecord {
    pub date: NaiveDate,

    pub avg_temp_c: Option<f64>,

    pub precip_mm: Option<f64>,

    #[validate(range(min = 0.0))]
    pub sunshine_hours: Option<f64>,

    #[validate(range(min = 0.0))]
    pub uv_index: Option<f64>,

    // Only present once Analytics has run
    #[validate(range(min = 0.0))]
    pub solar_kwh: Option<f64>,
}

impl WeatherRecord {
    pub fn new(
        date: NaiveDate,
        avg_temp_c: Option<f64>,
        precip_mm: Option<f64>,
        sunshine_hours: Option<f64>,
        uv_index: Option<f64>,
    ) -> Self {
        Self {
            date,
            avg_temp_c,
            precip_mm,
            sunshine_hours,
            uv_index,
            solar_kwh: None,
        }
    }

    pub fn with_solar_kwh(mut self, solar_kwh: f64) -> Self {
        self.solar_kwh = Some(solar_kwh);
        self
    }

    /// Calendar month (1-12), always derived from `date`.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn has_solar_estimate(&self) -> bool {
        self.solar_kwh.is_some()
    }

    /// Materialize typed records from a cleaned or analytics layer.
    ///
    /// `solar_kwh` is read when the column exists and left `None` otherwise.
    pub fn from_layer(table: &LayerTable) -> Result<Vec<WeatherRecord>> {
        let dates = table.column_values(COL_DATE)?;
        let avg_temps = table.numeric_column(COL_AVG_TEMP)?;
        let precips = table.numeric_column(COL_PRECIP)?;
        let sunshine = table.numeric_column(COL_SUNSHINE)?;
        let uv = table.numeric_column(COL_UV_INDEX)?;
        let solar = if table.has_column(COL_SOLAR_KWH) {
            table.numeric_column(COL_SOLAR_KWH)?
        } else {
            vec![None; table.len()]
        };

        let mut records = Vec::with_capacity(table.len());
        for (i, date_str) in dates.iter().enumerate() {
            let date = NaiveDate::parse_from_str(date_str.trim(), ISO_DATE_FORMAT).map_err(|_| {
                ProcessingError::InvalidDate {
                    value: date_str.to_string(),
                    line: i + 2,
                    path: table.source().to_path_buf(),
                }
            })?;

            let record = WeatherRecord {
                date,
                avg_temp_c: avg_temps[i],
                precip_mm: precips[i],
                sunshine_hours: sunshine[i],
                uv_index: uv[i],
                solar_kwh: solar[i],
            };
            record.validate()?;
            records.push(record);
        }

        Ok(records)
    }
}
