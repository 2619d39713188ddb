use crate::models::SensorColumn;
use crate::utils::constants::{COMPRESSION_SNAPPY, DEFAULT_ROLLING_WINDOW};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solar-pipeline")]
#[command(about = "Daily weather ingest, cleaning and solar-generation estimate pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        help = "Configuration file (TOML, JSON or YAML) [default: ./solar-pipeline.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Collector area in m² (overrides config)")]
    pub panel_area: Option<f64>,

    #[arg(long, global = true, help = "Panel conversion ratio in (0, 1] (overrides config)")]
    pub panel_efficiency: Option<f64>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy the raw source file into the raw layer
    Ingest {
        #[arg(short, long, help = "Raw source file (overrides config)")]
        source: Option<PathBuf>,
    },

    /// Clean the raw layer into the cleaned layer
    Transform,

    /// Derive the solar estimate into the analytics layer
    Analytics,

    /// Run ingest, transform and analytics in order
    Run {
        #[arg(short, long, help = "Raw source file (overrides config)")]
        source: Option<PathBuf>,
    },

    /// Per-month mean/max/sum of a sensor column from the analytics layer
    Monthly {
        #[arg(short, long, default_value = "TX01", help = "TX01, PP01, SS01 or UV01")]
        column: SensorColumn,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Per-month solar generation (mean per day and total)
    Solar {
        #[arg(
            long,
            value_delimiter = ',',
            help = "Twelve comma-separated month labels for display"
        )]
        labels: Option<Vec<String>>,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Period mean, maximum (with date) and latest rolling mean of a column
    Summary {
        #[arg(short, long, default_value = "TX01", help = "TX01, PP01, SS01 or UV01")]
        column: SensorColumn,

        #[arg(short, long, default_value_t = DEFAULT_ROLLING_WINDOW)]
        window: usize,

        #[arg(long, help = "Print JSON instead of text")]
        json: bool,
    },

    /// Export the analytics layer as a Parquet file
    Export {
        #[arg(short, long, help = "Output Parquet file path")]
        output: PathBuf,

        #[arg(short, long, default_value = COMPRESSION_SNAPPY)]
        compression: String,
    },
}
