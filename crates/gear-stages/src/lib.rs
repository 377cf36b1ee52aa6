//! gear-stages: stages del pipeline de inspección sobre el contrato de
//! `gear-core`.
//!
//! - `DetectionStage`: imágenes -> heatmap + reporte (mock aleatorio).
//! - `ModelingStage`: grupo + daño -> modelo STEP copiado desde templates.
//! - `SimulationStage`: grupo + daño -> cloudmaps de tensión y vida remanente.

pub mod artifacts;
pub mod heatmap;
pub mod latency;
pub mod params;
pub mod stages;
pub mod templates;

pub use artifacts::{DamageCategory, DetectionFinding, DetectionReport};
pub use latency::LatencyProfile;
pub use params::{DetectionParams, GroupId, ModelingParams, Precision, SimulationParams};
pub use stages::{DetectionStage, ModelingStage, SimulationStage};
pub use templates::TemplateTree;
