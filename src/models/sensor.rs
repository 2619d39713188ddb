use std::fmt;
use std::str::FromStr;

use crate::models::WeatherRecord;
use crate::utils::constants::{COL_AVG_TEMP, COL_PRECIP, COL_SUNSHINE, COL_UV_INDEX};

/// Sensor columns a consumer can select for aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorColumn {
    AvgTemp,
    Precipitation,
    Sunshine,
    UvIndex,
}

impl SensorColumn {
    pub const ALL: [SensorColumn; 4] = [
        SensorColumn::AvgTemp,
        SensorColumn::Precipitation,
        SensorColumn::Sunshine,
        SensorColumn::UvIndex,
    ];

    /// Canonical column identifier in the layer files
    pub fn column_name(&self) -> &'static str {
        match self {
            SensorColumn::AvgTemp => COL_AVG_TEMP,
            SensorColumn::Precipitation => COL_PRECIP,
            SensorColumn::Sunshine => COL_SUNSHINE,
            SensorColumn::UvIndex => COL_UV_INDEX,
        }
    }

    pub fn value(&self, record: &WeatherRecord) -> Option<f64> {
        match self {
            SensorColumn::AvgTemp => record.avg_temp_c,
            SensorColumn::Precipitation => record.precip_mm,
            SensorColumn::Sunshine => record.sunshine_hours,
            SensorColumn::UvIndex => record.uv_index,
        }
    }
}

impl fmt::Display for SensorColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for SensorColumn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SensorColumn::ALL
            .into_iter()
            .find(|c| c.column_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown sensor column '{}' (expected one of TX01, PP01, SS01, UV01)",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_column_names() {
        assert_eq!("TX01".parse::<SensorColumn>().unwrap(), SensorColumn::AvgTemp);
        assert_eq!("pp01".parse::<SensorColumn>().unwrap(), SensorColumn::Precipitation);
        assert_eq!(" SS01 ".parse::<SensorColumn>().unwrap(), SensorColumn::Sunshine);
        assert!("solar_kwh".parse::<SensorColumn>().is_err());
    }

    #[test]
    fn test_value_selects_field() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let record = WeatherRecord::new(date, Some(21.0), None, Some(6.5), Some(9.0));

        assert_eq!(SensorColumn::AvgTemp.value(&record), Some(21.0));
        assert_eq!(SensorColumn::Precipitation.value(&record), None);
        assert_eq!(SensorColumn::UvIndex.to_string(), "UV01");
    }
}
