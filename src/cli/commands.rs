use crate::analyzers::{format_monthly_table, format_solar_table, MonthlyAggregator, WeatherAnalyzer};
use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigOverrides, PipelineConfig};
use crate::models::WeatherRecord;
use crate::processors::{Pipeline, Stage};
use crate::readers::LayerReader;
use crate::utils::constants::COL_SOLAR_KWH;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;
use anyhow::{bail, Context};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, Level};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let raw_source_path = match &cli.command {
        Commands::Ingest { source } | Commands::Run { source } => source.clone(),
        _ => None,
    };
    let overrides = ConfigOverrides {
        panel_area: cli.panel_area,
        panel_efficiency: cli.panel_efficiency,
        raw_source_path,
    };
    let config = PipelineConfig::load(cli.config.as_deref(), &overrides)
        .context("failed to load configuration")?;
    debug!("Configuration:\n{}", config.summary());

    let pipeline = Pipeline::new(config);

    match cli.command {
        Commands::Ingest { .. } => run_stage(&pipeline, Stage::Ingest, cli.quiet)?,
        Commands::Transform => run_stage(&pipeline, Stage::Transform, cli.quiet)?,
        Commands::Analytics => run_stage(&pipeline, Stage::Analytics, cli.quiet)?,

        Commands::Run { .. } => {
            let progress = ProgressReporter::new_spinner("Running pipeline...", cli.quiet);
            pipeline.run_all(Some(&progress))?;
        }

        Commands::Monthly { column, json } => {
            let records = load_analytics_records(pipeline.config())?;
            let stats = MonthlyAggregator::new().column_stats(&records, column);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", format_monthly_table(column, &stats));
            }
        }

        Commands::Solar { labels, json } => {
            let records = load_analytics_records(pipeline.config())?;
            let aggregator = MonthlyAggregator::new();

            let stats = match labels {
                Some(labels) => {
                    if labels.len() != 12 {
                        bail!(
                            "--labels needs exactly 12 comma-separated values, got {}",
                            labels.len()
                        );
                    }
                    aggregator.solar_stats_with_labels(&records, |month| {
                        labels[(month - 1) as usize].clone()
                    })
                }
                None => aggregator.solar_stats(&records),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", format_solar_table(&stats));
            }
        }

        Commands::Summary {
            column,
            window,
            json,
        } => {
            let records = load_analytics_records(pipeline.config())?;
            let analyzer = WeatherAnalyzer::new();
            let overview = analyzer.overview(&records);
            let summary = analyzer.summarize(&records, column, window);

            if json {
                let value = serde_json::json!({
                    "overview": overview,
                    "series": summary,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}\n\n{}", overview.summary(), summary.summary());
            }
        }

        Commands::Export {
            output,
            compression,
        } => {
            let records = load_analytics_records(pipeline.config())?;
            let progress = ProgressReporter::new_spinner("Writing Parquet file...", cli.quiet);

            let writer = ParquetWriter::new().with_compression(&compression)?;
            writer
                .write_records(&records, &output)
                .with_context(|| format!("failed to export {}", output.display()))?;
            progress.finish_with_message(&format!("Exported {} records", records.len()));

            let file_info = writer.get_file_info(&output)?;
            println!("\n{}", file_info.summary());
        }
    }

    Ok(())
}

fn run_stage(pipeline: &Pipeline, stage: Stage, quiet: bool) -> anyhow::Result<()> {
    let progress = ProgressReporter::new_spinner(&format!("Running {} stage...", stage), quiet);
    let report = pipeline.run_stage(stage, Some(&progress))?;
    progress.finish_with_message(&report.summary());
    Ok(())
}

/// Read the analytics layer into typed records for the aggregation views
fn load_analytics_records(config: &PipelineConfig) -> anyhow::Result<Vec<WeatherRecord>> {
    let path = &config.analytics_layer_path;
    let table = LayerReader::new()
        .read(path)
        .with_context(|| format!("failed to read analytics layer {}", path.display()))?;
    table
        .require_columns(&[COL_SOLAR_KWH])
        .context("analytics layer has no solar estimate; run the analytics stage first")?;

    Ok(WeatherRecord::from_layer(&table)?)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))
}
