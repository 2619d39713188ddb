use pretty_assertions::assert_eq;
use solar_weather_pipeline::analyzers::MonthlyAggregator;
use solar_weather_pipeline::models::{SensorColumn, WeatherRecord};
use solar_weather_pipeline::readers::LayerReader;
use solar_weather_pipeline::writers::ParquetWriter;
use solar_weather_pipeline::{Pipeline, PipelineConfig, ProcessingError, Stage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RAW_SOURCE: &str = "\
yyyymmdd,TX01,PP01,SS01,UV01
20240302,20.0,3.5,2.0,4.0
20240101,15.0,-9.8,5.0,8.0
20240301,10.0,-9.8,6.0,2.0
20240102,,0.5,0.0,0.0
";

fn setup(raw: &str) -> (TempDir, PipelineConfig) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = PipelineConfig::default()
        .with_raw_source(dir.path().join("weather_data.csv"))
        .with_layer_root(&dir.path().join("data"));
    fs::write(&config.raw_source_path, raw).expect("Failed to write raw source");
    (dir, config)
}

fn read_records(path: &Path) -> Vec<WeatherRecord> {
    let table = LayerReader::new().read(path).unwrap();
    WeatherRecord::from_layer(&table).unwrap()
}

#[test]
fn test_end_to_end_reference_row() {
    let (_dir, config) = setup(
        "yyyymmdd,TX01,PP01,SS01,UV01\n\
         20240101,15.0,-9.8,5.0,8.0\n",
    );
    let pipeline = Pipeline::new(config.clone());
    pipeline.run_all(None).unwrap();

    let cleaned = LayerReader::new().read(&config.cleaned_layer_path).unwrap();
    assert_eq!(cleaned.column_values("PP01").unwrap(), vec!["0.0"]);
    assert_eq!(cleaned.column_values("month").unwrap(), vec!["1"]);

    let analytics = LayerReader::new().read(&config.analytics_layer_path).unwrap();
    assert_eq!(analytics.column_values("uv_norm").unwrap(), vec!["1.0"]);
    let solar = analytics.numeric_column("solar_kwh").unwrap()[0].unwrap();
    assert!((solar - 9.0).abs() < 1e-9, "solar_kwh = {}", solar);
}

#[test]
fn test_ingest_preserves_rows_and_columns() {
    let (_dir, config) = setup(RAW_SOURCE);
    let report = Pipeline::new(config.clone()).ingest().unwrap();

    let source = LayerReader::new().read(&config.raw_source_path).unwrap();
    let raw = LayerReader::new().read(&config.raw_layer_path).unwrap();

    assert_eq!(report.rows, 4);
    assert_eq!(raw.len(), source.len());
    assert_eq!(raw.headers(), source.headers());
    assert_eq!(
        fs::read(&config.raw_layer_path).unwrap(),
        RAW_SOURCE.as_bytes()
    );
}

#[test]
fn test_cleaned_layer_invariants() {
    let (_dir, config) = setup(RAW_SOURCE);
    let pipeline = Pipeline::new(config.clone());
    pipeline.ingest().unwrap();
    let report = pipeline.transform().unwrap();

    assert_eq!(report.repaired_precip, 2);

    let records = read_records(&config.cleaned_layer_path);
    assert_eq!(records.len(), 4);
    assert!(records.windows(2).all(|w| w[0].date < w[1].date));
    assert!(records.iter().all(|r| r.precip_mm != Some(-9.8)));
    assert!(records.iter().all(|r| r.solar_kwh.is_none()));

    let precip: Vec<Option<f64>> = records.iter().map(|r| r.precip_mm).collect();
    assert_eq!(precip, vec![Some(0.0), Some(0.5), Some(0.0), Some(3.5)]);

    let cleaned = LayerReader::new().read(&config.cleaned_layer_path).unwrap();
    let months = cleaned.column_values("month").unwrap();
    for (record, month) in records.iter().zip(months) {
        assert_eq!(record.month().to_string(), month);
    }
}

#[test]
fn test_rerun_is_idempotent() {
    let (_dir, config) = setup(RAW_SOURCE);
    let pipeline = Pipeline::new(config.clone());

    pipeline.run_all(None).unwrap();
    let cleaned_first = fs::read(&config.cleaned_layer_path).unwrap();
    let analytics_first = fs::read(&config.analytics_layer_path).unwrap();

    pipeline.run_all(None).unwrap();
    assert_eq!(fs::read(&config.cleaned_layer_path).unwrap(), cleaned_first);
    assert_eq!(fs::read(&config.analytics_layer_path).unwrap(), analytics_first);
}

#[test]
fn test_monthly_aggregation_over_analytics_layer() {
    let (_dir, config) = setup(RAW_SOURCE);
    Pipeline::new(config.clone()).run_all(None).unwrap();

    let records = read_records(&config.analytics_layer_path);
    assert!(records.iter().all(|r| r.solar_kwh.is_some_and(|v| v >= 0.0)));

    let aggregator = MonthlyAggregator::new();
    let temps = aggregator.column_stats(&records, SensorColumn::AvgTemp);
    let march = temps.iter().find(|s| s.month == 3).unwrap();
    assert_eq!(march.mean, Some(15.0));
    assert_eq!(march.max, Some(20.0));
    assert_eq!(march.sum, 30.0);

    let january = temps.iter().find(|s| s.month == 1).unwrap();
    assert_eq!(january.count, 1);

    // Max UV is 8.0: Jan 1 -> 5 * 10 * 0.18 * 1.0, Jan 2 has zero UV
    let solar = aggregator.solar_stats(&records);
    assert_eq!(solar.iter().map(|s| s.month).collect::<Vec<_>>(), vec![1, 3]);
    assert!((solar[0].sum - 9.0).abs() < 1e-9);
}

#[test]
fn test_all_zero_uv_dataset() {
    let (_dir, config) = setup(
        "yyyymmdd,TX01,PP01,SS01,UV01\n\
         20240101,15.0,0.0,5.0,0\n\
         20240102,16.0,0.0,9.0,0.0\n",
    );
    let report = {
        let pipeline = Pipeline::new(config.clone());
        pipeline.ingest().unwrap();
        pipeline.transform().unwrap();
        pipeline.analytics().unwrap()
    };

    assert_eq!(report.max_uv, Some(0.0));
    assert_eq!(report.total_kwh, 0.0);

    let analytics = LayerReader::new().read(&config.analytics_layer_path).unwrap();
    assert_eq!(analytics.column_values("uv_norm").unwrap(), vec!["0.0", "0.0"]);
    assert_eq!(analytics.column_values("solar_kwh").unwrap(), vec!["0.0", "0.0"]);
}

#[test]
fn test_nan_readings_give_zero_solar_estimate() {
    let (_dir, config) = setup(
        "yyyymmdd,TX01,PP01,SS01,UV01\n\
         20240101,15.0,0.0,NaN,8.0\n\
         20240102,NA,0.0,3.0,NaN\n\
         20240103,14.0,0.0,2.5,4.0\n",
    );
    Pipeline::new(config.clone()).run_all(None).unwrap();

    let analytics = LayerReader::new().read(&config.analytics_layer_path).unwrap();
    assert_eq!(analytics.column_values("uv_norm").unwrap(), vec!["1.0", "", "0.5"]);
    assert_eq!(
        analytics.column_values("solar_kwh").unwrap(),
        vec!["0.0", "0.0", "2.25"]
    );

    let records = read_records(&config.analytics_layer_path);
    assert_eq!(records[1].avg_temp_c, None);
    assert!(records
        .iter()
        .all(|r| r.solar_kwh.is_some_and(|v| v.is_finite() && v >= 0.0)));
}

#[test]
fn test_panel_configuration_changes_estimate() {
    let (_dir, config) = setup(RAW_SOURCE);
    let config = config.with_panel(20.0, 0.25);
    Pipeline::new(config.clone()).run_all(None).unwrap();

    let records = read_records(&config.analytics_layer_path);
    let jan_first = records.iter().find(|r| r.date.to_string() == "2024-01-01").unwrap();
    assert!((jan_first.solar_kwh.unwrap() - 25.0).abs() < 1e-9);
}

#[test]
fn test_missing_uv_column_fails_transform_without_output() {
    let (_dir, config) = setup(
        "yyyymmdd,TX01,PP01,SS01\n\
         20240101,15.0,-9.8,5.0\n",
    );
    let pipeline = Pipeline::new(config.clone());

    let err = pipeline.run_all(None).unwrap_err();

    assert_eq!(err.stage, Stage::Transform);
    assert!(matches!(
        err.source,
        ProcessingError::MissingColumn { ref column, .. } if column == "UV01"
    ));
    assert!(config.raw_layer_path.exists());
    assert!(!config.cleaned_layer_path.exists());
    assert!(!config.analytics_layer_path.exists());
}

#[test]
fn test_failed_rerun_keeps_previous_layer() {
    let (_dir, config) = setup(RAW_SOURCE);
    let pipeline = Pipeline::new(config.clone());
    pipeline.run_all(None).unwrap();
    let previous = fs::read(&config.cleaned_layer_path).unwrap();

    fs::write(
        &config.raw_source_path,
        "yyyymmdd,TX01,PP01,SS01,UV01\n2024-01-01,15.0,0.0,5.0,8.0\n",
    )
    .unwrap();
    let err = pipeline.run_all(None).unwrap_err();

    assert_eq!(err.stage, Stage::Transform);
    assert_eq!(err.kind, "InvalidDate");
    assert_eq!(fs::read(&config.cleaned_layer_path).unwrap(), previous);
}

#[test]
fn test_parquet_export_of_analytics_layer() {
    let (dir, config) = setup(RAW_SOURCE);
    Pipeline::new(config.clone()).run_all(None).unwrap();

    let records = read_records(&config.analytics_layer_path);
    let output = dir.path().join("export/weather_solar.parquet");
    let writer = ParquetWriter::new().with_compression("zstd").unwrap();
    writer.write_records(&records, &output).unwrap();

    let info = writer.get_file_info(&output).unwrap();
    assert_eq!(info.total_rows, 4);
}
