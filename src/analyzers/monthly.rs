use crate::models::{SensorColumn, WeatherRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-month statistics for one sensor column. Missing readings are skipped,
/// so a month with no readings has no mean/max and a sum of 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub month: u32,
    pub count: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
}

/// Per-month solar generation, with a display label for the month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySolar {
    pub month: u32,
    pub label: String,
    pub days: usize,
    pub mean: Option<f64>,
    pub sum: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    max: Option<f64>,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.count += 1;
            self.sum += v;
            self.max = Some(self.max.map_or(v, |m| m.max(v)));
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Read-only month grouping over analytics-layer records.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Mean, max and sum of `column` for every month present in `records`
    pub fn column_stats(&self, records: &[WeatherRecord], column: SensorColumn) -> Vec<MonthlyStats> {
        self.group(records, |r| column.value(r))
            .into_iter()
            .map(|(month, acc)| MonthlyStats {
                month,
                count: acc.count,
                mean: acc.mean(),
                max: acc.max,
                sum: acc.sum,
            })
            .collect()
    }

    /// Mean and sum of `solar_kwh` per month, labelled with the month number
    pub fn solar_stats(&self, records: &[WeatherRecord]) -> Vec<MonthlySolar> {
        self.solar_stats_with_labels(records, |month| month.to_string())
    }

    /// Mean and sum of `solar_kwh` per month, labelled by `label`
    pub fn solar_stats_with_labels<F>(&self, records: &[WeatherRecord], label: F) -> Vec<MonthlySolar>
    where
        F: Fn(u32) -> String,
    {
        self.group(records, |r| r.solar_kwh)
            .into_iter()
            .map(|(month, acc)| MonthlySolar {
                month,
                label: label(month),
                days: acc.count,
                mean: acc.mean(),
                sum: acc.sum,
            })
            .collect()
    }

    fn group<F>(&self, records: &[WeatherRecord], value: F) -> BTreeMap<u32, Accumulator>
    where
        F: Fn(&WeatherRecord) -> Option<f64>,
    {
        let mut groups: BTreeMap<u32, Accumulator> = BTreeMap::new();
        for record in records {
            groups.entry(record.month()).or_default().push(value(record));
        }
        groups
    }
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_monthly_table(column: SensorColumn, stats: &[MonthlyStats]) -> String {
    let mut out = format!(
        "{:>5} {:>10} {:>10} {:>12}   ({})\n",
        "month", "mean", "max", "sum", column
    );
    for row in stats {
        out.push_str(&format!(
            "{:>5} {:>10} {:>10} {:>12.2}\n",
            row.month,
            format_optional(row.mean),
            format_optional(row.max),
            row.sum
        ));
    }
    out
}

pub fn format_solar_table(stats: &[MonthlySolar]) -> String {
    let mut out = format!(
        "{:>8} {:>14} {:>14}\n",
        "month", "mean kWh/day", "total kWh"
    );
    for row in stats {
        out.push_str(&format!(
            "{:>8} {:>14} {:>14.1}\n",
            row.label,
            row.mean
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string()),
            row.sum
        ));
    }
    out
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(month: u32, day: u32, temp: Option<f64>, solar: f64) -> WeatherRecord {
        let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
        WeatherRecord::new(date, temp, Some(0.0), Some(5.0), Some(8.0)).with_solar_kwh(solar)
    }

    #[test]
    fn test_month_three_mean_max_sum() {
        let records = vec![
            record(3, 1, Some(10.0), 1.0),
            record(3, 2, Some(20.0), 2.0),
            record(4, 1, Some(5.0), 3.0),
        ];

        let stats = MonthlyAggregator::new().column_stats(&records, SensorColumn::AvgTemp);

        assert_eq!(stats.len(), 2);
        assert_eq!(
            stats[0],
            MonthlyStats {
                month: 3,
                count: 2,
                mean: Some(15.0),
                max: Some(20.0),
                sum: 30.0,
            }
        );
        assert_eq!(stats[1].month, 4);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let records = vec![record(1, 1, None, 0.0), record(1, 2, Some(4.0), 0.0), record(2, 1, None, 0.0)];

        let stats = MonthlyAggregator::new().column_stats(&records, SensorColumn::AvgTemp);

        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].mean, Some(4.0));
        assert_eq!(stats[1].mean, None);
        assert_eq!(stats[1].max, None);
        assert_eq!(stats[1].sum, 0.0);
    }

    #[test]
    fn test_solar_stats_with_labels() {
        let records = vec![record(1, 1, None, 9.0), record(1, 2, None, 3.0), record(2, 1, None, 4.0)];
        let labels = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
        let aggregator = MonthlyAggregator::new();

        let stats = aggregator
            .solar_stats_with_labels(&records, |m| labels[(m - 1) as usize].to_string());

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].label, "Jan");
        assert_eq!(stats[0].mean, Some(6.0));
        assert_eq!(stats[0].sum, 12.0);
        assert_eq!(stats[1].label, "Feb");

        // Repeated calls with other selections see the same data
        let plain = aggregator.solar_stats(&records);
        assert_eq!(plain[0].label, "1");
        assert_eq!(plain[0].sum, 12.0);
        let temps = aggregator.column_stats(&records, SensorColumn::Sunshine);
        assert_eq!(temps[0].sum, 10.0);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_format_tables() {
        let records = vec![record(3, 1, Some(10.0), 1.0), record(3, 2, Some(20.0), 2.0)];
        let aggregator = MonthlyAggregator::new();

        let text = format_monthly_table(
            SensorColumn::AvgTemp,
            &aggregator.column_stats(&records, SensorColumn::AvgTemp),
        );
        assert!(text.contains("15.00"));
        assert!(text.contains("30.00"));

        let text = format_solar_table(&aggregator.solar_stats(&records));
        assert!(text.contains("1.5"));
        assert!(text.contains("3.0"));
    }
}
