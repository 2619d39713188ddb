//! Pipeline configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional config file, then `SOLAR_PIPELINE_*` environment variables, then
//! explicit overrides from the command line.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_ANALYTICS_LAYER_PATH, DEFAULT_CLEANED_LAYER_PATH, DEFAULT_CONFIG_FILE,
    DEFAULT_PANEL_AREA_M2, DEFAULT_PANEL_EFFICIENCY, DEFAULT_RAW_LAYER_PATH,
    DEFAULT_RAW_SOURCE_PATH, ENV_PREFIX,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Collector area in m²
    #[validate(range(exclusive_min = 0.0))]
    pub panel_area: f64,

    /// Conversion ratio in (0, 1]
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub panel_efficiency: f64,

    pub raw_source_path: PathBuf,
    pub raw_layer_path: PathBuf,
    pub cleaned_layer_path: PathBuf,
    pub analytics_layer_path: PathBuf,
}

/// Command-line values that win over every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub panel_area: Option<f64>,
    pub panel_efficiency: Option<f64>,
    pub raw_source_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            panel_area: DEFAULT_PANEL_AREA_M2,
            panel_efficiency: DEFAULT_PANEL_EFFICIENCY,
            raw_source_path: PathBuf::from(DEFAULT_RAW_SOURCE_PATH),
            raw_layer_path: PathBuf::from(DEFAULT_RAW_LAYER_PATH),
            cleaned_layer_path: PathBuf::from(DEFAULT_CLEANED_LAYER_PATH),
            analytics_layer_path: PathBuf::from(DEFAULT_ANALYTICS_LAYER_PATH),
        }
    }
}

impl PipelineConfig {
    /// Load and validate configuration.
    ///
    /// When `config_file` is `None`, `solar-pipeline.toml` in the working
    /// directory is used if present.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("panel_area", defaults.panel_area)?
            .set_default("panel_efficiency", defaults.panel_efficiency)?
            .set_default("raw_source_path", DEFAULT_RAW_SOURCE_PATH)?
            .set_default("raw_layer_path", DEFAULT_RAW_LAYER_PATH)?
            .set_default("cleaned_layer_path", DEFAULT_CLEANED_LAYER_PATH)?
            .set_default("analytics_layer_path", DEFAULT_ANALYTICS_LAYER_PATH)?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        let raw_source = overrides
            .raw_source_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let config: PipelineConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("panel_area", overrides.panel_area)?
            .set_override_option("panel_efficiency", overrides.panel_efficiency)?
            .set_override_option("raw_source_path", raw_source)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn with_panel(mut self, panel_area: f64, panel_efficiency: f64) -> Self {
        self.panel_area = panel_area;
        self.panel_efficiency = panel_efficiency;
        self
    }

    pub fn with_raw_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_source_path = path.into();
        self
    }

    /// Place the three layer files under `root` using the default layout.
    pub fn with_layer_root(mut self, root: &Path) -> Self {
        let relocate = |default: &str| {
            let relative = Path::new(default)
                .strip_prefix("data")
                .unwrap_or_else(|_| Path::new(default));
            root.join(relative)
        };

        self.raw_layer_path = relocate(DEFAULT_RAW_LAYER_PATH);
        self.cleaned_layer_path = relocate(DEFAULT_CLEANED_LAYER_PATH);
        self.analytics_layer_path = relocate(DEFAULT_ANALYTICS_LAYER_PATH);
        self
    }

    pub fn summary(&self) -> String {
        format!(
            "Panel: {} m² at {:.0}% efficiency\n\
            Raw source: {}\n\
            Raw layer: {}\n\
            Cleaned layer: {}\n\
            Analytics layer: {}",
            self.panel_area,
            self.panel_efficiency * 100.0,
            self.raw_source_path.display(),
            self.raw_layer_path.display(),
            self.cleaned_layer_path.display(),
            self.analytics_layer_path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.panel_area, 10.0);
        assert_eq!(config.panel_efficiency, 0.18);
        assert_eq!(
            config.analytics_layer_path,
            PathBuf::from("data/analytics/weather_solar.csv")
        );
    }

    #[test]
    fn test_efficiency_bounds() {
        let config = PipelineConfig::default().with_panel(10.0, 1.5);
        assert!(config.validate().is_err());

        let config = PipelineConfig::default().with_panel(10.0, 0.0);
        assert!(config.validate().is_err());

        let config = PipelineConfig::default().with_panel(10.0, 1.0);
        assert!(config.validate().is_ok());

        let config = PipelineConfig::default().with_panel(-2.0, 0.2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_file_then_overrides() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("pipeline.toml");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "panel_area = 25.0")?;
        writeln!(file, "panel_efficiency = 0.2")?;
        writeln!(file, "cleaned_layer_path = \"out/clean.csv\"")?;

        let config = PipelineConfig::load(Some(&path), &ConfigOverrides::default())?;
        assert_eq!(config.panel_area, 25.0);
        assert_eq!(config.panel_efficiency, 0.2);
        assert_eq!(config.cleaned_layer_path, PathBuf::from("out/clean.csv"));
        assert_eq!(config.raw_layer_path, PathBuf::from(DEFAULT_RAW_LAYER_PATH));

        let overrides = ConfigOverrides {
            panel_efficiency: Some(0.5),
            ..Default::default()
        };
        let config = PipelineConfig::load(Some(&path), &overrides)?;
        assert_eq!(config.panel_area, 25.0);
        assert_eq!(config.panel_efficiency, 0.5);
        Ok(())
    }

    #[test]
    fn test_load_rejects_invalid_values() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("pipeline.toml");
        std::fs::write(&path, "panel_efficiency = 3.0\n")?;

        let err = PipelineConfig::load(Some(&path), &ConfigOverrides::default()).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let missing = Path::new("/nonexistent/solar-pipeline.toml");
        assert!(PipelineConfig::load(Some(missing), &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_with_layer_root() {
        let config = PipelineConfig::default().with_layer_root(Path::new("/tmp/run1"));
        assert_eq!(
            config.raw_layer_path,
            PathBuf::from("/tmp/run1/raw/weather_raw.csv")
        );
        assert_eq!(
            config.cleaned_layer_path,
            PathBuf::from("/tmp/run1/processed/weather_clean.csv")
        );
    }
}
