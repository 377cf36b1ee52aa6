use crate::errors::WorkspaceError;
use crate::model::{StageInput, StageResult};
use crate::store::ArtifactStore;
use crate::workspace::Workspace;

/// Lo único que un stage puede tocar: el workspace capturado y el store.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub workspace: &'a Workspace,
    pub store: &'a ArtifactStore,
}

impl<'a> StageContext<'a> {
    pub fn new(workspace: &'a Workspace, store: &'a ArtifactStore) -> Self {
        Self { workspace, store }
    }
}

/// Interfaz neutral de un stage del pipeline.
///
/// Un stage consume artifacts nombrados del workspace, escribe artifacts
/// nuevos vía `ArtifactStore` y devuelve un `StageResult` con una entrada por
/// cada clave lógica de `output_keys`. Sin estado oculto fuera del workspace.
pub trait StageDefinition: Send + Sync {
    /// Identificador estable (`ai-detection`, `geometry-modeling`, ...).
    fn id(&self) -> &str;

    /// Nombre amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Claves lógicas de salida, fijas por stage.
    fn output_keys(&self) -> &[&'static str];

    fn run(&self, ctx: &StageContext<'_>, input: &StageInput) -> Result<StageResult, WorkspaceError>;
}
