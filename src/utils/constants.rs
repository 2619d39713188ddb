/// Raw source column identifiers (station export header contract)
pub const COL_DATE_CODE: &str = "yyyymmdd";
pub const COL_AVG_TEMP: &str = "TX01";
pub const COL_PRECIP: &str = "PP01";
pub const COL_SUNSHINE: &str = "SS01";
pub const COL_UV_INDEX: &str = "UV01";

/// Columns derived by the pipeline
pub const COL_DATE: &str = "date";
pub const COL_MONTH: &str = "month";
pub const COL_UV_NORM: &str = "uv_norm";
pub const COL_SOLAR_KWH: &str = "solar_kwh";

/// Columns Transform requires in the raw layer
pub const RAW_REQUIRED_COLUMNS: [&str; 5] = [
    COL_DATE_CODE,
    COL_AVG_TEMP,
    COL_PRECIP,
    COL_SUNSHINE,
    COL_UV_INDEX,
];

/// Raw encoding of the date column
pub const DATE_CODE_FORMAT: &str = "%Y%m%d";
/// Encoding of the derived `date` column
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Precipitation sentinel used by the weather service for trace rainfall.
///
/// A trace amount is semantically zero for aggregation, so Transform rewrites
/// it to [`PRECIP_TRACE_REPAIRED`]. The source encoding does not distinguish
/// trace rainfall from a sensor fault, so every occurrence is treated as trace.
pub const PRECIP_TRACE_SENTINEL: f64 = -9.8;
pub const PRECIP_TRACE_REPAIRED: &str = "0.0";

/// Solar panel defaults
pub const DEFAULT_PANEL_AREA_M2: f64 = 10.0;
pub const DEFAULT_PANEL_EFFICIENCY: f64 = 0.18;

/// Cell tokens read as a missing reading, in addition to a blank cell.
/// Matched exactly after trimming; any other non-finite number is rejected.
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Layer file defaults
pub const DEFAULT_RAW_SOURCE_PATH: &str = "weather_data.csv";
pub const DEFAULT_RAW_LAYER_PATH: &str = "data/raw/weather_raw.csv";
pub const DEFAULT_CLEANED_LAYER_PATH: &str = "data/processed/weather_clean.csv";
pub const DEFAULT_ANALYTICS_LAYER_PATH: &str = "data/analytics/weather_solar.csv";

/// Configuration sources
pub const DEFAULT_CONFIG_FILE: &str = "solar-pipeline.toml";
pub const ENV_PREFIX: &str = "SOLAR_PIPELINE";

/// Parquet export defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Dashboard summary
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
