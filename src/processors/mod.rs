pub mod analytics;
pub mod ingest;
pub mod pipeline;
pub mod transform;

pub use analytics::{AnalyticsReport, AnalyticsStats, SolarAnalyzer, SolarModel};
pub use ingest::{IngestReport, Ingester};
pub use pipeline::{Pipeline, Stage, StageReport};
pub use transform::{TransformReport, TransformStats, Transformer};
