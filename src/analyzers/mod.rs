pub mod monthly;
pub mod weather_analyzer;

pub use monthly::{
    format_monthly_table, format_solar_table, MonthlyAggregator, MonthlySolar, MonthlyStats,
};
pub use weather_analyzer::{DatasetOverview, SeriesSummary, WeatherAnalyzer};
