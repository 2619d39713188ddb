use crate::models::{SensorColumn, WeatherRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// Headline figures for one sensor column over the whole period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    /// First date on which `max` was observed
    pub max_date: Option<NaiveDate>,
    pub rolling_window: usize,
    /// Rolling mean ending on the last record
    pub latest_rolling_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub total_records: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub total_solar_kwh: f64,
    pub records_with_solar: usize,
}

pub struct WeatherAnalyzer;

impl WeatherAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn overview(&self, records: &[WeatherRecord]) -> DatasetOverview {
        let first = records.iter().map(|r| r.date).min();
        let last = records.iter().map(|r| r.date).max();

        DatasetOverview {
            total_records: records.len(),
            date_range: first.zip(last),
            total_solar_kwh: records.iter().filter_map(|r| r.solar_kwh).sum(),
            records_with_solar: records.iter().filter(|r| r.has_solar_estimate()).count(),
        }
    }

    pub fn summarize(&self, records: &[WeatherRecord], column: SensorColumn, window: usize) -> SeriesSummary {
        let mut count = 0;
        let mut sum = 0.0;
        let mut max: Option<(f64, NaiveDate)> = None;

        for record in records {
            if let Some(value) = column.value(record) {
                count += 1;
                sum += value;
                if max.map_or(true, |(m, _)| value > m) {
                    max = Some((value, record.date));
                }
            }
        }

        SeriesSummary {
            column: column.column_name().to_string(),
            count,
            mean: (count > 0).then(|| sum / count as f64),
            max: max.map(|(value, _)| value),
            max_date: max.map(|(_, date)| date),
            rolling_window: window,
            latest_rolling_mean: self
                .rolling_mean(records, column, window)
                .last()
                .copied()
                .flatten(),
        }
    }

    /// Trailing mean over `window` consecutive records. Positions before a
    /// full window, and windows containing a missing reading, have no value.
    pub fn rolling_mean(
        &self,
        records: &[WeatherRecord],
        column: SensorColumn,
        window: usize,
    ) -> Vec<Option<f64>> {
        if window == 0 {
            return vec![None; records.len()];
        }

        let values: Vec<Option<f64>> = records.iter().map(|r| column.value(r)).collect();

        (0..values.len())
            .map(|end| {
                if end + 1 < window {
                    return None;
                }
                let slice = &values[end + 1 - window..=end];
                let total: Option<f64> = slice.iter().copied().sum();
                total.map(|t| t / window as f64)
            })
            .collect()
    }
}

impl Default for WeatherAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesSummary {
    pub fn summary(&self) -> String {
        let fmt = |v: Option<f64>| {
            v.map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "No valid measurements".to_string())
        };

        format!(
            "Column: {}\n\
            Readings: {}\n\
            Period mean: {}\n\
            Period max: {}{}\n\
            {}-day rolling mean (latest): {}",
            self.column,
            self.count,
            fmt(self.mean),
            fmt(self.max),
            self.max_date
                .map(|d| format!(" on {}", d))
                .unwrap_or_default(),
            self.rolling_window,
            fmt(self.latest_rolling_mean)
        )
    }
}

impl DatasetOverview {
    pub fn summary(&self) -> String {
        let range = match self.date_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "empty".to_string(),
        };

        format!(
            "Records: {}\n\
            Date Range: {}\n\
            Solar estimate: {:.1} kWh over {} days",
            self.total_records, range, self.total_solar_kwh, self.records_with_solar
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(temps: &[Option<f64>]) -> Vec<WeatherRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        temps
            .iter()
            .enumerate()
            .map(|(i, t)| {
                WeatherRecord::new(
                    start + chrono::Duration::days(i as i64),
                    *t,
                    Some(0.0),
                    Some(4.0),
                    Some(6.0),
                )
                .with_solar_kwh(1.0)
            })
            .collect()
    }

    #[test]
    fn test_summarize_reports_first_max_date() {
        let data = records(&[Some(10.0), Some(20.0), None, Some(20.0), Some(14.0)]);
        let summary = WeatherAnalyzer::new().summarize(&data, SensorColumn::AvgTemp, 2);

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(16.0));
        assert_eq!(summary.max, Some(20.0));
        assert_eq!(summary.max_date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(summary.latest_rolling_mean, Some(17.0));
        assert!(summary.summary().contains("on 2024-01-02"));
    }

    #[test]
    fn test_rolling_mean() {
        let data = records(&[Some(1.0), Some(2.0), Some(3.0), None, Some(5.0), Some(7.0)]);
        let rolling = WeatherAnalyzer::new().rolling_mean(&data, SensorColumn::AvgTemp, 2);

        assert_eq!(
            rolling,
            vec![None, Some(1.5), Some(2.5), None, None, Some(6.0)]
        );

        let single = WeatherAnalyzer::new().rolling_mean(&data, SensorColumn::AvgTemp, 1);
        assert_eq!(single[3], None);
        assert_eq!(single[5], Some(7.0));
    }

    #[test]
    fn test_overview() {
        let data = records(&[Some(1.0), Some(2.0), Some(3.0)]);
        let overview = WeatherAnalyzer::new().overview(&data);

        assert_eq!(overview.total_records, 3);
        assert_eq!(overview.total_solar_kwh, 3.0);
        assert_eq!(
            overview.date_range,
            NaiveDate::from_ymd_opt(2024, 1, 1).zip(NaiveDate::from_ymd_opt(2024, 1, 3))
        );
    }

    #[test]
    fn test_empty_series() {
        let summary = WeatherAnalyzer::new().summarize(&[], SensorColumn::UvIndex, 7);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.max_date, None);
        assert_eq!(summary.latest_rolling_mean, None);
        assert!(summary.summary().contains("No valid measurements"));
    }
}
