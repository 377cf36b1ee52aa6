//! Simulación estructural/vida remanente (mock): copia los dos cloudmaps
//! del grupo al workspace.

use gear_core::{StageContext, StageOutcome, TypedStage, WorkspaceError};
use log::info;
use serde::Serialize;

use super::modeling::file_name;
use crate::latency::LatencyProfile;
use crate::params::{require_group, SimulationParams};
use crate::templates::{damage_dir, TemplateTree};

pub const SIMULATION_STAGE_ID: &str = "simulation";
pub const STRESS_KEY: &str = "stress_cloudmap";
pub const REMAIN_LIFE_KEY: &str = "remain_life_cloudmap";
const SIMULATION_LATENCY_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct SimulationStage {
    templates: TemplateTree,
    latency: LatencyProfile,
}

impl SimulationStage {
    pub fn new(templates: TemplateTree, latency: LatencyProfile) -> Self {
        Self { templates, latency }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationSummary<'a> {
    gear_group_number: &'a str,
    is_damage: bool,
    stress_template: String,
    life_template: String,
}

impl TypedStage for SimulationStage {
    type Params = SimulationParams;

    fn id(&self) -> &'static str {
        SIMULATION_STAGE_ID
    }

    fn output_keys(&self) -> &'static [&'static str] {
        &[STRESS_KEY, REMAIN_LIFE_KEY]
    }

    fn run_typed(&self, ctx: &StageContext<'_>, _artifacts: &[String], params: SimulationParams) -> Result<StageOutcome, WorkspaceError> {
        let group = require_group(params.gear_group_number, "gearGroupNumber")?;
        let damaged = params.is_damage
                            .ok_or_else(|| WorkspaceError::InvalidInput("isDamage is required".into()))?;
        let stress = self.templates.stress_cloudmap(&group, damaged);
        let life = self.templates.life_cloudmap(&group, damaged);
        // ambos templates antes de copiar: no dejar un cloudmap huérfano
        for tpl in [&stress, &life] {
            if !tpl.is_file() {
                return Err(WorkspaceError::template_missing(tpl));
            }
        }

        self.latency.pause(SIMULATION_LATENCY_MS);

        let dir = damage_dir(damaged);
        let stress_art = ctx.store
                            .copy_external(ctx.workspace, &stress, &format!("stress_cloudmap_group_{group}_{dir}"), "png")?;
        let life_copy = ctx.store
                           .copy_external(ctx.workspace, &life, &format!("remain_life_cloudmap_group_{group}_{dir}"), "png");
        let life_art = ctx.store.discard_on_error(ctx.workspace, &[&stress_art], life_copy)?;
        info!("simulation for group {group} ({dir}) -> {}, {}", stress_art.name, life_art.name);

        let summary = SimulationSummary { gear_group_number: group.as_str(),
                                          is_damage: damaged,
                                          stress_template: file_name(&stress),
                                          life_template: file_name(&life) };
        StageOutcome::new().output(STRESS_KEY, stress_art)
                           .output(REMAIN_LIFE_KEY, life_art)
                           .summary(&summary)
    }
}
