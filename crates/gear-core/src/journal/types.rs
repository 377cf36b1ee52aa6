//! Eventos del journal de proyecto.
//!
//! Cada operación relevante sobre un workspace emite un evento append-only.
//! El journal es el registro de operaciones del proyecto (subidas, borrados y
//! ejecuciones de stages) que el cliente consulta con `project-log`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::WorkspaceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectEventKind {
    /// Primer evento de un proyecto.
    ProjectCreated { name: String, root: String },
    ArtifactStored { name: String, size_bytes: u64 },
    ArtifactDeleted { name: String },
    /// Un stage comenzó; `input_fingerprint` = hash canónico del `StageInput`.
    StageStarted { stage: String, input_fingerprint: String },
    StageFinished { stage: String, outputs: Vec<String> },
    StageFailed { stage: String, error: WorkspaceError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEvent {
    pub seq: u64,
    pub project_id: Uuid,
    pub kind: ProjectEventKind,
    pub ts: DateTime<Utc>,
}
