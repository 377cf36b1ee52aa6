//! Entrada y resultado neutrales de un stage.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Artifact;
use crate::errors::WorkspaceError;

/// Secuencia ordenada de artifacts + parámetros escalares del stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageInput {
    #[serde(default)]
    pub artifacts: Vec<String>,
    #[serde(default)]
    pub params: Value,
}

impl StageInput {
    pub fn new(artifacts: Vec<String>, params: Value) -> Self {
        Self { artifacts, params }
    }

    /// Entrada sin artifacts (modeling/simulation).
    pub fn params_only(params: Value) -> Self {
        Self { artifacts: Vec::new(),
               params }
    }
}

/// Resultado de un stage: eco de la entrada y un artifact por clave lógica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: String,
    pub input: StageInput,
    pub outputs: IndexMap<String, Artifact>,
    /// Hallazgos propios del stage (p. ej. la clasificación de detection).
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub summary: Value,
}

impl StageResult {
    pub fn new(stage: impl Into<String>, input: StageInput) -> Self {
        Self { stage: stage.into(),
               input,
               outputs: IndexMap::new(),
               summary: Value::Null }
    }

    pub fn with_output(mut self, key: &str, artifact: Artifact) -> Self {
        self.outputs.insert(key.to_string(), artifact);
        self
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }

    pub fn output(&self, key: &str) -> Option<&Artifact> {
        self.outputs.get(key)
    }

    /// Verifica que se produjeron exactamente las claves declaradas.
    pub fn ensure_keys(&self, expected: &[&str]) -> Result<(), WorkspaceError> {
        let same_len = self.outputs.len() == expected.len();
        if same_len && expected.iter().all(|k| self.outputs.contains_key(*k)) {
            return Ok(());
        }
        let got: Vec<&str> = self.outputs.keys().map(String::as_str).collect();
        Err(WorkspaceError::StorageFailure(format!("stage '{}' produced outputs {:?}, expected {:?}",
                                                   self.stage, got, expected)))
    }
}
