use crate::config::PipelineConfig;
use crate::error::StageError;
use crate::processors::{
    AnalyticsReport, IngestReport, Ingester, SolarAnalyzer, SolarModel, TransformReport,
    Transformer,
};
use crate::utils::progress::ProgressReporter;
use std::fmt;
use tracing::{error, info};

/// The three batch stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Ingest,
    Transform,
    Analytics,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Ingest, Stage::Transform, Stage::Analytics];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Ingest => "ingest",
            Stage::Transform => "transform",
            Stage::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageReport {
    Ingest(IngestReport),
    Transform(TransformReport),
    Analytics(AnalyticsReport),
}

impl StageReport {
    pub fn stage(&self) -> Stage {
        match self {
            StageReport::Ingest(_) => Stage::Ingest,
            StageReport::Transform(_) => Stage::Transform,
            StageReport::Analytics(_) => Stage::Analytics,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            StageReport::Ingest(report) => report.summary(),
            StageReport::Transform(report) => report.summary(),
            StageReport::Analytics(report) => report.summary(),
        }
    }
}

/// Runs stages against the layer locations of one configuration. Each stage
/// reads the previous stage's persisted output; nothing is cached in memory
/// between calls.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn ingest(&self) -> Result<IngestReport, StageError> {
        Ingester::new()
            .ingest(&self.config.raw_source_path, &self.config.raw_layer_path)
            .map_err(|e| StageError::new(Stage::Ingest, e))
    }

    pub fn transform(&self) -> Result<TransformReport, StageError> {
        Transformer::new()
            .transform_file(&self.config.raw_layer_path, &self.config.cleaned_layer_path)
            .map_err(|e| StageError::new(Stage::Transform, e))
    }

    pub fn analytics(&self) -> Result<AnalyticsReport, StageError> {
        SolarAnalyzer::new(SolarModel::from_config(&self.config))
            .analyze_file(
                &self.config.cleaned_layer_path,
                &self.config.analytics_layer_path,
            )
            .map_err(|e| StageError::new(Stage::Analytics, e))
    }

    pub fn run_stage(
        &self,
        stage: Stage,
        progress: Option<&ProgressReporter>,
    ) -> Result<StageReport, StageError> {
        if let Some(p) = progress {
            p.set_message(&format!("Running {} stage...", stage));
        }

        let result = match stage {
            Stage::Ingest => self.ingest().map(StageReport::Ingest),
            Stage::Transform => self.transform().map(StageReport::Transform),
            Stage::Analytics => self.analytics().map(StageReport::Analytics),
        };

        if let Err(ref e) = result {
            error!("{}: {}", e, e.source);
            if let Some(p) = progress {
                p.abandon_with_message(&format!("{} stage failed", stage));
            }
        }

        result
    }

    /// Ingest, Transform, then Analytics; stops at the first failing stage.
    pub fn run_all(&self, progress: Option<&ProgressReporter>) -> Result<Vec<StageReport>, StageError> {
        let mut reports = Vec::with_capacity(Stage::ALL.len());

        for stage in Stage::ALL {
            let report = self.run_stage(stage, progress)?;
            if let Some(p) = progress {
                p.println(&report.summary());
            }
            reports.push(report);
        }

        info!("Pipeline complete ({} stages)", reports.len());
        if let Some(p) = progress {
            p.finish_with_message("Pipeline complete");
        }

        Ok(reports)
    }
}
