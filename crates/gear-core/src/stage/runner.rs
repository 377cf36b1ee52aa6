//! Ejecución de un stage con precondiciones y journal.

use log::{info, warn};

use super::{StageContext, StageDefinition};
use crate::errors::WorkspaceError;
use crate::hashing::hash_value;
use crate::journal::{ProjectEventKind, ProjectJournal};
use crate::model::{StageInput, StageResult};

/// Todo artifact referenciado debe existir en el workspace al invocar.
pub fn check_artifacts(ctx: &StageContext<'_>, input: &StageInput) -> Result<(), WorkspaceError> {
    if !ctx.workspace.is_live() {
        return Err(WorkspaceError::StorageFailure(format!("workspace root vanished: {}", ctx.workspace.root().display())));
    }
    for name in &input.artifacts {
        if !ctx.store.exists(ctx.workspace, name) {
            return Err(WorkspaceError::NotFound(name.clone()));
        }
    }
    Ok(())
}

/// Corre `stage` sobre `input` registrando inicio/fin/fallo en el journal.
pub fn run_stage(stage: &dyn StageDefinition,
                 ctx: &StageContext<'_>,
                 input: &StageInput,
                 journal: &dyn ProjectJournal)
                 -> Result<StageResult, WorkspaceError> {
    let project = ctx.workspace.id;
    let stage_id = stage.id().to_string();
    let fingerprint = match serde_json::to_value(input) {
        Ok(v) => hash_value(&v),
        Err(_) => String::new(),
    };
    journal.append(project,
                   ProjectEventKind::StageStarted { stage: stage_id.clone(),
                                                    input_fingerprint: fingerprint });
    info!("stage {stage_id} started in {}", ctx.workspace.root().display());

    let res = check_artifacts(ctx, input).and_then(|_| stage.run(ctx, input))
                                         .and_then(|r| r.ensure_keys(stage.output_keys()).map(|_| r));
    match res {
        Ok(result) => {
            let outputs: Vec<String> = result.outputs.values().map(|a| a.name.clone()).collect();
            info!("stage {stage_id} finished: {}", outputs.join(", "));
            journal.append(project,
                           ProjectEventKind::StageFinished { stage: stage_id,
                                                             outputs });
            Ok(result)
        }
        Err(err) => {
            warn!("stage {stage_id} failed: {err}");
            journal.append(project,
                           ProjectEventKind::StageFailed { stage: stage_id,
                                                           error: err.clone() });
            Err(err)
        }
    }
}
