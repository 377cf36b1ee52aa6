use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{StageContext, StageDefinition};
use crate::errors::WorkspaceError;
use crate::model::{Artifact, StageInput, StageResult};

/// Salida tipada de `TypedStage::run_typed`.
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    pub outputs: Vec<(&'static str, Artifact)>,
    pub summary: Value,
}

impl StageOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(mut self, key: &'static str, artifact: Artifact) -> Self {
        self.outputs.push((key, artifact));
        self
    }

    pub fn summary<S: Serialize>(mut self, summary: &S) -> Result<Self, WorkspaceError> {
        self.summary = serde_json::to_value(summary).map_err(|e| WorkspaceError::StorageFailure(format!("encode summary: {e}")))?;
        Ok(self)
    }
}

/// Interfaz de alto nivel con parámetros fuertemente tipados.
///
/// Implementadores escriben `run_typed`; el adaptador de abajo decodifica los
/// params JSON y arma el `StageResult` neutral.
pub trait TypedStage {
    /// Parámetros deserializables (`Default` cuando llegan como `null`).
    type Params: DeserializeOwned + Serialize + Default;

    fn id(&self) -> &'static str;

    fn output_keys(&self) -> &'static [&'static str];

    fn run_typed(&self, ctx: &StageContext<'_>, artifacts: &[String], params: Self::Params) -> Result<StageOutcome, WorkspaceError>;
}

/// Decodifica params; `null` produce los defaults.
pub fn decode_params<P: DeserializeOwned + Default>(stage: &str, params: &Value) -> Result<P, WorkspaceError> {
    if params.is_null() {
        return Ok(P::default());
    }
    serde_json::from_value(params.clone()).map_err(|e| WorkspaceError::InvalidInput(format!("{stage}: {e}")))
}

// Adaptador: cualquier `TypedStage` implementa `StageDefinition`.
impl<T> StageDefinition for T where T: TypedStage + Send + Sync + 'static
{
    fn id(&self) -> &str {
        <Self as TypedStage>::id(self)
    }

    fn output_keys(&self) -> &[&'static str] {
        <Self as TypedStage>::output_keys(self)
    }

    fn run(&self, ctx: &StageContext<'_>, input: &StageInput) -> Result<StageResult, WorkspaceError> {
        let stage_id = <Self as TypedStage>::id(self);
        let params: T::Params = decode_params(stage_id, &input.params)?;
        let outcome = self.run_typed(ctx, &input.artifacts, params)?;
        let mut result = StageResult::new(stage_id, input.clone()).with_summary(outcome.summary);
        for (key, artifact) in outcome.outputs {
            result = result.with_output(key, artifact);
        }
        Ok(result)
    }
}
