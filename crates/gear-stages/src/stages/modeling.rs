//! Modelado geométrico (mock): copia el template STEP del grupo al workspace.

use std::path::Path;

use gear_core::{StageContext, StageOutcome, TypedStage, WorkspaceError};
use log::info;
use serde::Serialize;

use crate::artifacts::DetectionReport;
use crate::latency::LatencyProfile;
use crate::params::{require_group, ModelingParams};
use crate::templates::{damage_dir, TemplateTree};

pub const MODELING_STAGE_ID: &str = "geometry-modeling";
pub const MODEL_KEY: &str = "model";
const MODELING_LATENCY_MS: u64 = 1500;

#[derive(Debug, Clone)]
pub struct ModelingStage {
    templates: TemplateTree,
    latency: LatencyProfile,
}

impl ModelingStage {
    pub fn new(templates: TemplateTree, latency: LatencyProfile) -> Self {
        Self { templates, latency }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelingSummary<'a> {
    group_number: &'a str,
    is_damage: bool,
    template: String,
}

impl ModelingStage {
    /// `isDamage` explícito o, en su defecto, el del reporte de detección.
    fn resolve_damage(&self, ctx: &StageContext<'_>, params: &ModelingParams) -> Result<bool, WorkspaceError> {
        if let Some(flag) = params.is_damage {
            return Ok(flag);
        }
        let Some(report_name) = params.detection_report.as_deref() else {
            return Err(WorkspaceError::InvalidInput("isDamage or detectionReport is required".into()));
        };
        let bytes = ctx.store.read_bytes(ctx.workspace, report_name)?;
        let report: DetectionReport = serde_json::from_slice(&bytes).map_err(|e| {
                                                                        WorkspaceError::InvalidInput(format!("{report_name} is not a detection report: {e}"))
                                                                    })?;
        Ok(report.finding.is_damage)
    }
}

impl TypedStage for ModelingStage {
    type Params = ModelingParams;

    fn id(&self) -> &'static str {
        MODELING_STAGE_ID
    }

    fn output_keys(&self) -> &'static [&'static str] {
        &[MODEL_KEY]
    }

    fn run_typed(&self, ctx: &StageContext<'_>, _artifacts: &[String], params: ModelingParams) -> Result<StageOutcome, WorkspaceError> {
        let group = require_group(params.group_number.clone(), "groupNumber")?;
        let damaged = self.resolve_damage(ctx, &params)?;
        let template = self.templates.model(&group, damaged);

        self.latency.pause(MODELING_LATENCY_MS);

        let ext = template.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_default();
        let base = format!("gear_model_group_{group}_{}", damage_dir(damaged));
        let model = ctx.store.copy_external(ctx.workspace, &template, &base, &ext)?;
        info!("model for group {group} ({}) -> {}", damage_dir(damaged), model.name);

        let summary = ModelingSummary { group_number: group.as_str(),
                                        is_damage: damaged,
                                        template: file_name(&template) };
        StageOutcome::new().output(MODEL_KEY, model).summary(&summary)
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
