//! Detección de daño (mock).
//!
//! - Requiere al menos una imagen; la primera define el heatmap.
//! - Produce exactamente dos artifacts: `heatmap` (PNG) y `report` (JSON).
//! - La clasificación es aleatoria: el contrato garantiza forma y
//!   persistencia, nunca valores concretos. `seed` hace la corrida reproducible.

use chrono::Local;
use gear_core::naming::split_file_name;
use gear_core::{StageContext, StageOutcome, TypedStage, WorkspaceError};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::artifacts::{DamageCategory, DetectionFinding, DetectionReport};
use crate::heatmap;
use crate::latency::LatencyProfile;
use crate::params::{DetectionParams, Precision};

pub const DETECTION_STAGE_ID: &str = "ai-detection";
pub const HEATMAP_KEY: &str = "heatmap";
pub const REPORT_KEY: &str = "report";

#[derive(Debug, Clone, Default)]
pub struct DetectionStage {
    latency: LatencyProfile,
}

impl DetectionStage {
    pub fn new(latency: LatencyProfile) -> Self {
        Self { latency }
    }
}

fn sample_finding<R: Rng>(rng: &mut R, precision: Precision) -> DetectionFinding {
    let damage_type = DamageCategory::ALL[rng.random_range(0..DamageCategory::ALL.len())];
    let is_damage = damage_type.is_damage();
    let damage_area = if is_damage { rng.random_range(1.0..40.0) } else { 0.0 };
    // mayor precisión => confianza más alta
    let floor = match precision {
        Precision::High => 0.85,
        Precision::Medium => 0.75,
        Precision::Low => 0.6,
    };
    DetectionFinding { damage_type,
                       is_damage,
                       damage_area: round2(damage_area),
                       correlation: round2(rng.random_range(0.6..0.99)),
                       confidence: round2(rng.random_range(floor..0.99)),
                       precision }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl TypedStage for DetectionStage {
    type Params = DetectionParams;

    fn id(&self) -> &'static str {
        DETECTION_STAGE_ID
    }

    fn output_keys(&self) -> &'static [&'static str] {
        &[HEATMAP_KEY, REPORT_KEY]
    }

    fn run_typed(&self, ctx: &StageContext<'_>, artifacts: &[String], params: DetectionParams) -> Result<StageOutcome, WorkspaceError> {
        let first = artifacts.first()
                             .ok_or_else(|| WorkspaceError::InvalidInput("images must not be empty".into()))?;
        let mut rng = StdRng::seed_from_u64(params.seed.unwrap_or_else(rand::random));

        self.latency.pause(params.precision.base_latency_ms());

        let source = ctx.store.read_bytes(ctx.workspace, first)?;
        let (w, h) = heatmap::dimensions_for(&source);
        let png = heatmap::render(&mut rng, w, h).map_err(|e| WorkspaceError::StorageFailure(format!("encode heatmap: {e}")))?;

        let (stem, _) = split_file_name(first);
        let heatmap_art = ctx.store.save_as(ctx.workspace, &format!("{stem}_heatmap"), "png", &mut png.as_slice())?;

        let finding = sample_finding(&mut rng, params.precision);
        let description = if finding.is_damage {
            format!("{} detected over {:.2}% of the inspected surface ({} image(s))",
                    finding.damage_type.label(),
                    finding.damage_area,
                    artifacts.len())
        } else {
            format!("no damage detected ({} image(s))", artifacts.len())
        };
        let report = DetectionReport { schema_version: DetectionReport::SCHEMA_VERSION,
                                       finding: finding.clone(),
                                       description,
                                       images: artifacts.to_vec(),
                                       heatmap: heatmap_art.name.clone(),
                                       detected_at: Local::now() };
        // heatmap + reporte, o ninguno
        let saved = serde_json::to_vec_pretty(&report)
            .map_err(|e| WorkspaceError::StorageFailure(format!("encode report: {e}")))
            .and_then(|body| ctx.store.save_as(ctx.workspace, &format!("{stem}_report"), "json", &mut body.as_slice()));
        let report_art = ctx.store.discard_on_error(ctx.workspace, &[&heatmap_art], saved)?;

        info!("detection on {} image(s): {:?}", artifacts.len(), finding.damage_type);
        StageOutcome::new().output(HEATMAP_KEY, heatmap_art)
                           .output(REPORT_KEY, report_art)
                           .summary(&finding)
    }
}
